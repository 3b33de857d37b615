use proptest::prelude::*;

use coursefinder::catalog::{Catalog, CourseRecord};
use coursefinder::intent::{classify, Intent};
use coursefinder::search::SearchOptions;
use coursefinder::tags::{map_background_to_tags, CANONICAL_TAGS};

const WORDS: &[&str] = &[
    "machine",
    "learning",
    "deep",
    "vision",
    "language",
    "statistics",
    "python",
    "product",
    "данных",
    "анализ",
    "обработка",
    "seminar",
];

const PROGRAMS: &[&str] = &["AI", "AI_PRODUCT", "ROBOTICS"];

fn course_strategy() -> impl Strategy<Value = CourseRecord> {
    (
        prop::collection::vec(prop::sample::select(WORDS), 1..4),
        prop::sample::select(PROGRAMS),
        prop::option::of(1u32..=4),
        prop::sample::subsequence(CANONICAL_TAGS, 0..3),
    )
        .prop_map(|(words, program, semester, tags)| {
            let mut course = CourseRecord::new(words.join(" "), program).with_tags(tags);
            course.semester = semester;
            course
        })
}

fn catalog_strategy() -> impl Strategy<Value = Catalog> {
    prop::collection::vec(course_strategy(), 1..30).prop_map(Catalog::from_records)
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 0..4).prop_map(|w| w.join(" "))
}

// ---------------------------------------------------------------------------
// Similarity search
// ---------------------------------------------------------------------------

proptest! {
    /// Scores come back best first and stay within the cosine range.
    #[test]
    fn search_scores_non_increasing(
        catalog in catalog_strategy(),
        query in query_strategy(),
        top_k in 1usize..10,
    ) {
        let hits = catalog.search(&query, &SearchOptions::top_k(top_k));
        prop_assert_eq!(hits.len(), top_k.min(catalog.len()));
        for pair in hits.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        for hit in &hits {
            prop_assert!((0.0..=1.0 + 1e-6).contains(&hit.score));
        }
    }

    /// The same query against the same catalog yields the same ranking.
    #[test]
    fn search_is_deterministic(catalog in catalog_strategy(), query in query_strategy()) {
        let options = SearchOptions::top_k(5);
        prop_assert_eq!(catalog.search(&query, &options), catalog.search(&query, &options));
    }

    /// With fallback on, a program filter returns every matching row up to top_k.
    #[test]
    fn program_filter_is_exact(
        catalog in catalog_strategy(),
        query in query_strategy(),
        program in prop::sample::select(PROGRAMS),
        top_k in 1usize..10,
    ) {
        let options = SearchOptions::top_k(top_k).with_program(Some(program));
        let hits = catalog.search(&query, &options);
        let available = catalog.courses().iter().filter(|c| c.program == program).count();
        prop_assert_eq!(hits.len(), top_k.min(available));
        prop_assert!(hits.iter().all(|h| h.course.program == program));
    }
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

proptest! {
    /// Overlap never increases; ties go to the earlier semester, unknown last.
    #[test]
    fn recommendations_ordered(
        catalog in catalog_strategy(),
        tags in prop::sample::subsequence(CANONICAL_TAGS, 1..4),
        top_k in 1usize..10,
    ) {
        let tags = coursefinder::catalog::normalize_tags(tags);
        let items = catalog.recommend(&tags, None, top_k);
        prop_assert_eq!(items.len(), top_k.min(catalog.len()));
        for pair in items.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.overlap >= b.overlap);
            if a.overlap == b.overlap {
                prop_assert!(a.course.semester_key() <= b.course.semester_key());
            }
        }
    }

    #[test]
    fn recommendations_respect_program(
        catalog in catalog_strategy(),
        program in prop::sample::select(PROGRAMS),
    ) {
        let tags = map_background_to_tags("machine learning");
        let items = catalog.recommend(&tags, Some(program), 50);
        prop_assert!(items.iter().all(|r| r.course.program == program));
    }
}

// ---------------------------------------------------------------------------
// Classification and tag mapping
// ---------------------------------------------------------------------------

proptest! {
    /// Every string gets exactly one known intent, the same one every time.
    #[test]
    fn classify_is_total(text in "\\PC{0,40}") {
        let intent = classify(&text);
        prop_assert!(Intent::ALL.contains(&intent));
        prop_assert_eq!(intent, classify(&text));
    }

    /// The mapper never returns an empty set and only emits known tags.
    #[test]
    fn tags_never_empty(text in "\\PC{0,40}") {
        let tags = map_background_to_tags(&text);
        prop_assert!(!tags.is_empty());
        prop_assert!(tags.iter().all(|t| CANONICAL_TAGS.contains(&t.as_str())));
        prop_assert_eq!(tags, map_background_to_tags(&text));
    }
}
