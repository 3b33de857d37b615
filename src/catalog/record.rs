//! Course record and field coercion helpers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sorted, deduplicated set of lowercase domain tags.
pub type TagSet = BTreeSet<String>;

/// Sort key used for a missing semester, so unknown semesters rank last.
pub const UNKNOWN_SEMESTER: u32 = u32::MAX;

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Course title, never empty.
    pub name: String,
    /// Program code (e.g. `AI`, `AI_PRODUCT`).
    pub program: String,
    /// Semester number, `None` when unknown.
    pub semester: Option<u32>,
    /// Mandatory/elective marker as published.
    pub kind: Option<String>,
    /// Workload as published (hours or credits).
    pub hours: Option<String>,
    pub tags: TagSet,
}

impl CourseRecord {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            semester: None,
            kind: None,
            hours: None,
            tags: TagSet::new(),
        }
    }

    pub fn with_semester(mut self, semester: u32) -> Self {
        self.semester = (semester > 0).then_some(semester);
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_hours(mut self, hours: impl Into<String>) -> Self {
        self.hours = Some(hours.into());
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Text fed to the vectorizer: the name followed by the tags.
    pub fn corpus_text(&self) -> String {
        let mut text = self.name.clone();
        for tag in &self.tags {
            text.push(' ');
            text.push_str(tag);
        }
        text
    }

    /// Semester used for ordering; unknown sorts after every real semester.
    pub fn semester_key(&self) -> u32 {
        self.semester.unwrap_or(UNKNOWN_SEMESTER)
    }

    /// Number of tags shared with `tags`.
    pub fn tag_overlap(&self, tags: &TagSet) -> usize {
        self.tags.intersection(tags).count()
    }
}

/// Lowercase, trim and deduplicate tags, dropping empties.
pub fn normalize_tags<I, T>(tags: I) -> TagSet
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parse a serialized tag list.
///
/// Accepts comma, semicolon or whitespace separators, and the Python list
/// literal form (`['ml', 'cv']`) that pandas writes for list columns.
pub fn parse_tags(raw: &str) -> TagSet {
    let stripped = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']');
    normalize_tags(
        stripped
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .map(|t| t.trim_matches(|c| c == '\'' || c == '"')),
    )
}

/// Parse a semester cell, coercing anything malformed to `None`.
///
/// Whole floats such as `2.0` are accepted since pandas writes integer
/// columns with gaps as floats.
pub fn parse_semester(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(n) = raw.parse::<u32>() {
        return (n > 0).then_some(n);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f >= 1.0 && f <= u32::MAX as f64 => {
            Some(f as u32)
        }
        _ => None,
    }
}

/// Trimmed optional text; blank cells and `NaN` placeholders become `None`.
pub fn parse_optional(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(raw.to_string())
    }
}
