//! Rule-based intent classification.
//!
//! Rules are evaluated top to bottom and the first match wins. Keyword sets
//! overlap lexically across rules (`план` is both a plan keyword and a
//! relevance keyword), so the order in [`RULES`] is part of the behavior.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Purpose of a user's message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Compare,
    Plan,
    FindCourse,
    Recommend,
    Offtopic,
    Fallback,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Compare,
        Intent::Plan,
        Intent::FindCourse,
        Intent::Recommend,
        Intent::Offtopic,
        Intent::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Compare => "compare",
            Intent::Plan => "plan",
            Intent::FindCourse => "find_course",
            Intent::Recommend => "recommend",
            Intent::Offtopic => "offtopic",
            Intent::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Intent::ALL
            .into_iter()
            .find(|intent| intent.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown intent: {s}"))
    }
}

/// How a rule tests lowercased text.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// At least one keyword occurs.
    AnyOf(&'static [&'static str]),
    /// No keyword occurs.
    NoneOf(&'static [&'static str]),
}

impl Matcher {
    /// The keyword that decided the match, or `None` when the rule fails.
    ///
    /// `NoneOf` has no single deciding keyword and reports `""` on success.
    fn evidence(&self, lowered: &str) -> Option<&'static str> {
        match self {
            Matcher::AnyOf(keywords) => keywords.iter().copied().find(|k| lowered.contains(k)),
            Matcher::NoneOf(keywords) => {
                (!keywords.iter().any(|k| lowered.contains(k))).then_some("")
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub matcher: Matcher,
}

impl IntentRule {
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.evidence(&text.to_lowercase()).is_some()
    }
}

/// Words signalling the message is about the programs at all.
pub const RELEVANCE_KEYWORDS: &[&str] =
    &["ai", "програм", "курс", "магистр", "итмо", "план", "семестр", "поступ"];

/// Ordered rule chain. [`Intent::Fallback`] is the implicit last rule.
pub static RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Compare,
        matcher: Matcher::AnyOf(&["сравни", "чем отличается", "что лучше", "compare"]),
    },
    IntentRule {
        intent: Intent::Plan,
        matcher: Matcher::AnyOf(&["план", "семестр", "curriculum", "учебный план"]),
    },
    IntentRule {
        intent: Intent::FindCourse,
        matcher: Matcher::AnyOf(&["курс", "есть ли", "где изучают", "ищу", "поиск"]),
    },
    IntentRule {
        intent: Intent::Recommend,
        matcher: Matcher::AnyOf(&[
            "бэкграунд",
            "background",
            "я из",
            "мой опыт",
            "посовету",
            "рекоменд",
        ]),
    },
    IntentRule {
        intent: Intent::Offtopic,
        matcher: Matcher::NoneOf(RELEVANCE_KEYWORDS),
    },
];

/// Outcome of classification with the keyword that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub intent: Intent,
    /// Keyword that fired; `None` for offtopic and fallback.
    pub keyword: Option<&'static str>,
}

/// Classify text, reporting which rule fired.
pub fn explain(text: &str) -> Classification {
    let lowered = text.to_lowercase();
    let classification = RULES
        .iter()
        .find_map(|rule| {
            rule.matcher.evidence(&lowered).map(|kw| Classification {
                intent: rule.intent,
                keyword: (!kw.is_empty()).then_some(kw),
            })
        })
        .unwrap_or(Classification {
            intent: Intent::Fallback,
            keyword: None,
        });
    tracing::debug!(intent = %classification.intent, keyword = ?classification.keyword, "classified text");
    classification
}

/// Classify text into exactly one intent.
pub fn classify(text: &str) -> Intent {
    explain(text).intent
}
