//! The course catalog: an immutable table of course records plus the vector
//! space built from it.
//!
//! A [`Catalog`] is built once and never modified. Refreshing the dataset
//! builds a new catalog and swaps it into a [`CatalogHandle`]; readers that
//! already hold a snapshot keep using the old one.

mod handle;
mod loader;
mod record;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::Result;
use crate::recommend::{recommend, Recommendation};
use crate::search::{search, SearchHit, SearchOptions, VectorSpace};
use crate::tags::map_background_to_tags;

pub use handle::CatalogHandle;
pub use loader::{parse_courses, read_dataset, LoadOptions};
pub use record::{
    normalize_tags, parse_optional, parse_semester, parse_tags, CourseRecord, TagSet,
    UNKNOWN_SEMESTER,
};

/// Read-only snapshot of the course table and its TF-IDF space.
#[derive(Debug)]
pub struct Catalog {
    courses: Vec<CourseRecord>,
    space: VectorSpace,
    fingerprint: String,
    loaded_at: DateTime<Utc>,
    source: Option<PathBuf>,
}

/// Per-program overview used when comparing programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramSummary {
    pub program: String,
    pub courses: usize,
    /// Distinct known semesters, ascending.
    pub semesters: Vec<u32>,
    /// Tag frequency across the program's courses.
    pub tags: BTreeMap<String, usize>,
}

/// Catalog statistics.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub courses: usize,
    pub programs: usize,
    pub vocabulary: usize,
    pub untagged: usize,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub source: Option<PathBuf>,
}

impl Catalog {
    /// Build a catalog from records already in memory.
    pub fn from_records(courses: Vec<CourseRecord>) -> Self {
        let mut hasher = blake3::Hasher::new();
        for course in &courses {
            hasher.update(course.program.as_bytes());
            hasher.update(b"\x1f");
            hasher.update(course.corpus_text().as_bytes());
            hasher.update(&course.semester_key().to_le_bytes());
            hasher.update(b"\x1e");
        }
        let fingerprint = hasher.finalize().to_hex().to_string();
        Self::build(courses, fingerprint, None)
    }

    /// Load a CSV dataset. Fails on a missing or malformed file; never
    /// returns a partial catalog.
    pub fn load(path: impl AsRef<Path>, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read_dataset(path)?;
        Self::from_bytes(&bytes, options, Some(path.to_path_buf()))
    }

    /// Build from raw CSV bytes; the fingerprint is the BLAKE3 hash of `bytes`.
    pub fn from_bytes(bytes: &[u8], options: LoadOptions, source: Option<PathBuf>) -> Result<Self> {
        let courses = parse_courses(bytes, options)?;
        let fingerprint = blake3::hash(bytes).to_hex().to_string();
        let catalog = Self::build(courses, fingerprint, source);
        tracing::info!(
            courses = catalog.len(),
            programs = catalog.programs().len(),
            vocabulary = catalog.space.vocabulary_len(),
            "loaded course catalog"
        );
        Ok(catalog)
    }

    fn build(courses: Vec<CourseRecord>, fingerprint: String, source: Option<PathBuf>) -> Self {
        let corpus: Vec<String> = courses.iter().map(CourseRecord::corpus_text).collect();
        let space = VectorSpace::build(&corpus);
        Self {
            courses,
            space,
            fingerprint,
            loaded_at: Utc::now(),
            source,
        }
    }

    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }

    pub fn space(&self) -> &VectorSpace {
        &self.space
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Content fingerprint (hex BLAKE3).
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Similarity search over the whole table.
    pub fn search(&self, query: &str, options: &SearchOptions<'_>) -> Vec<SearchHit> {
        search(&self.space, &self.courses, query, options)
    }

    /// Tag-overlap recommendation.
    pub fn recommend(
        &self,
        tags: &TagSet,
        program: Option<&str>,
        top_k: usize,
    ) -> Vec<Recommendation> {
        recommend(&self.courses, tags, program, top_k)
    }

    /// Map a background description to tags, then recommend.
    pub fn recommend_for_background(
        &self,
        text: &str,
        program: Option<&str>,
        top_k: usize,
    ) -> (TagSet, Vec<Recommendation>) {
        let tags = map_background_to_tags(text);
        let items = self.recommend(&tags, program, top_k);
        (tags, items)
    }

    /// Courses of one program, optionally one semester, in table order.
    pub fn plan(&self, program: &str, semester: Option<u32>, limit: usize) -> Vec<&CourseRecord> {
        self.courses
            .iter()
            .filter(|c| c.program.eq_ignore_ascii_case(program))
            .filter(|c| semester.is_none_or(|s| c.semester == Some(s)))
            .take(limit)
            .collect()
    }

    /// Distinct program codes, sorted.
    pub fn programs(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.courses.iter().map(|c| c.program.as_str()).collect();
        set.into_iter().collect()
    }

    /// Records grouped by program code, table order within each group.
    pub fn by_program(&self) -> BTreeMap<String, Vec<CourseRecord>> {
        let mut grouped: BTreeMap<String, Vec<CourseRecord>> = BTreeMap::new();
        for course in &self.courses {
            grouped
                .entry(course.program.clone())
                .or_default()
                .push(course.clone());
        }
        grouped
    }

    pub fn program_summaries(&self) -> Vec<ProgramSummary> {
        self.by_program()
            .into_iter()
            .map(|(program, courses)| {
                let semesters: BTreeSet<u32> = courses.iter().filter_map(|c| c.semester).collect();
                let mut tags: BTreeMap<String, usize> = BTreeMap::new();
                for tag in courses.iter().flat_map(|c| c.tags.iter()) {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
                ProgramSummary {
                    program,
                    courses: courses.len(),
                    semesters: semesters.into_iter().collect(),
                    tags,
                }
            })
            .collect()
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            courses: self.courses.len(),
            programs: self.programs().len(),
            vocabulary: self.space.vocabulary_len(),
            untagged: self.courses.iter().filter(|c| c.tags.is_empty()).count(),
            fingerprint: self.fingerprint.clone(),
            loaded_at: self.loaded_at,
            source: self.source.clone(),
        }
    }
}
