//! Message dispatch: classify a message and answer it from the catalog.

use serde::Serialize;

use crate::catalog::{Catalog, ProgramSummary, TagSet};
use crate::config::QueryConfig;
use crate::intent::{classify, Intent};
use crate::recommend::Recommendation;
use crate::search::SearchHit;

/// Structured answer to one message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum Reply {
    /// The message is not about the programs.
    Offtopic,
    /// Plan requests need an explicit program; list the ones available.
    PlanHint { programs: Vec<String> },
    Compare { programs: Vec<ProgramSummary> },
    Courses { intent: Intent, hits: Vec<SearchHit> },
    Recommendations {
        tags: TagSet,
        items: Vec<Recommendation>,
    },
    /// Nothing left after filtering.
    NoMatch { intent: Intent },
}

impl Reply {
    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Offtopic | Reply::NoMatch { .. })
    }
}

/// Answers messages against one catalog snapshot.
pub struct Assistant<'a> {
    catalog: &'a Catalog,
    query: &'a QueryConfig,
}

impl<'a> Assistant<'a> {
    pub fn new(catalog: &'a Catalog, query: &'a QueryConfig) -> Self {
        Self { catalog, query }
    }

    pub fn respond(&self, text: &str) -> Reply {
        let intent = classify(text);
        match intent {
            Intent::Offtopic => Reply::Offtopic,
            Intent::Plan => Reply::PlanHint {
                programs: self
                    .catalog
                    .programs()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            },
            Intent::Compare => Reply::Compare {
                programs: self.catalog.program_summaries(),
            },
            Intent::Recommend => {
                let (tags, mut items) = self.catalog.recommend_for_background(
                    text,
                    self.query.program.as_deref(),
                    self.query.top_k,
                );
                items.retain(|r| self.in_semester(r.course.semester));
                if items.is_empty() {
                    Reply::NoMatch { intent }
                } else {
                    Reply::Recommendations { tags, items }
                }
            }
            Intent::FindCourse | Intent::Fallback => {
                let mut hits = self.catalog.search(text, &self.query.search_options());
                hits.retain(|h| self.in_semester(h.course.semester));
                if hits.is_empty() {
                    Reply::NoMatch { intent }
                } else {
                    Reply::Courses { intent, hits }
                }
            }
        }
    }

    fn in_semester(&self, semester: Option<u32>) -> bool {
        self.query.semester.is_none_or(|s| semester == Some(s))
    }
}
