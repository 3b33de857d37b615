//! Substring rules mapping free text onto the canonical tag vocabulary.
//!
//! Unlike intent classification, every rule whose keyword occurs in the text
//! contributes its tag; nothing short-circuits.

use crate::catalog::TagSet;

/// Tag returned when a background description matches no rule.
pub const DEFAULT_TAG: &str = "ml";

/// Canonical tag vocabulary shared by courses and backgrounds.
pub const CANONICAL_TAGS: &[&str] = &["math", "coding", "data", "ml", "dl", "cv", "nlp", "product"];

/// A keyword set contributing one tag.
#[derive(Debug, Clone, Copy)]
pub struct TagRule {
    pub keywords: &'static [&'static str],
    pub tag: &'static str,
}

impl TagRule {
    /// Whether any keyword occurs in already-lowercased text.
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Rules applied to a person's self-description.
pub static BACKGROUND_RULES: &[TagRule] = &[
    TagRule {
        keywords: &["математ", "вероят", "статист", "math"],
        tag: "math",
    },
    TagRule {
        keywords: &["программи", "python", "питон", "разработ"],
        tag: "coding",
    },
    TagRule {
        keywords: &["data", "аналит", "данн"],
        tag: "data",
    },
    TagRule {
        keywords: &["ml", "машин", "machine learning"],
        tag: "ml",
    },
    TagRule {
        keywords: &["deep", "нейрон"],
        tag: "dl",
    },
    TagRule {
        keywords: &["cv", "зрени", "vision"],
        tag: "cv",
    },
    TagRule {
        keywords: &["nlp", "язык", "обработка текста"],
        tag: "nlp",
    },
    TagRule {
        keywords: &["product", "продукт", "менедж"],
        tag: "product",
    },
];

/// Rules applied to course titles when tagging untagged catalog rows.
pub static COURSE_RULES: &[TagRule] = &[
    TagRule {
        keywords: &["nlp", "обработка текста", "язык", "language"],
        tag: "nlp",
    },
    TagRule {
        keywords: &["cv", "computer vision", "компьютерное зрение", "vision"],
        tag: "cv",
    },
    TagRule {
        keywords: &["ml", "машин", "machine learning"],
        tag: "ml",
    },
    TagRule {
        keywords: &["deep", "нейрон", "deep learning"],
        tag: "dl",
    },
    TagRule {
        keywords: &["product", "продукт", "менеджмент"],
        tag: "product",
    },
    TagRule {
        keywords: &["math", "математ", "статист", "вероят"],
        tag: "math",
    },
    TagRule {
        keywords: &["data", "данн", "аналит"],
        tag: "data",
    },
    TagRule {
        keywords: &["python", "программи"],
        tag: "coding",
    },
];

/// Collect the tags of every matching rule.
pub fn apply_rules(rules: &[TagRule], text: &str) -> TagSet {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .filter(|rule| rule.matches(&lowered))
        .map(|rule| rule.tag.to_string())
        .collect()
}

/// Map a background description to a non-empty tag set.
pub fn map_background_to_tags(text: &str) -> TagSet {
    let mut tags = apply_rules(BACKGROUND_RULES, text);
    if tags.is_empty() {
        tags.insert(DEFAULT_TAG.to_string());
    }
    tracing::debug!(?tags, "mapped background to tags");
    tags
}

/// Tag a course from its title. May be empty.
pub fn tag_course_name(name: &str) -> TagSet {
    apply_rules(COURSE_RULES, name)
}
