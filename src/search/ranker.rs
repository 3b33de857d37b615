//! Cosine-similarity ranking of catalog rows against a query.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::CourseRecord;

use super::tfidf::VectorSpace;

/// Default over-fetch factor for program-filtered searches.
pub const DEFAULT_FETCH_MULTIPLIER: usize = 3;

/// A course with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Cosine similarity (0-1, higher is more similar).
    pub score: f32,
    #[serde(flatten)]
    pub course: CourseRecord,
}

/// Knobs for a single search call.
#[derive(Debug, Clone)]
pub struct SearchOptions<'a> {
    pub top_k: usize,
    /// Keep only rows of this program, applied after ranking.
    pub program: Option<&'a str>,
    /// Ranked candidates inspected per requested result before giving up.
    pub fetch_multiplier: usize,
    /// Keep scanning past the over-fetch window until `top_k` matches are found.
    pub full_scan_fallback: bool,
}

impl Default for SearchOptions<'_> {
    fn default() -> Self {
        Self {
            top_k: 5,
            program: None,
            fetch_multiplier: DEFAULT_FETCH_MULTIPLIER,
            full_scan_fallback: true,
        }
    }
}

impl<'a> SearchOptions<'a> {
    pub fn top_k(top_k: usize) -> Self {
        Self {
            top_k,
            ..Default::default()
        }
    }

    pub fn with_program(mut self, program: Option<&'a str>) -> Self {
        self.program = program;
        self
    }

    /// Number of ranked rows inspected before the fallback decision.
    pub fn fetch_depth(&self) -> usize {
        self.top_k.saturating_mul(self.fetch_multiplier.max(1))
    }
}

/// Score every document and order by descending similarity.
///
/// Equal scores keep corpus order.
pub fn rank(space: &VectorSpace, query: &str) -> Vec<(usize, f32)> {
    let query_vec = space.transform(query);

    let mut scored: Vec<(usize, f32)> = space
        .doc_vectors()
        .par_iter()
        .enumerate()
        .map(|(i, doc_vec)| (i, query_vec.cosine(doc_vec)))
        .collect();

    // sort_by is stable, which gives the table-order tie-break
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

/// Search `courses` (the rows `space` was built from) for `query`.
pub fn search(
    space: &VectorSpace,
    courses: &[CourseRecord],
    query: &str,
    options: &SearchOptions<'_>,
) -> Vec<SearchHit> {
    if options.top_k == 0 || courses.is_empty() {
        return Vec::new();
    }

    let ranked = rank(space, query);
    let to_hit = |&(i, score): &(usize, f32)| SearchHit {
        score,
        course: courses[i].clone(),
    };

    let Some(program) = options.program else {
        return ranked.iter().take(options.top_k).map(to_hit).collect();
    };

    let depth = options.fetch_depth().min(ranked.len());
    let matches_program = |&&(i, _): &&(usize, f32)| courses[i].program == program;

    let mut hits: Vec<SearchHit> = ranked[..depth]
        .iter()
        .filter(matches_program)
        .take(options.top_k)
        .map(to_hit)
        .collect();

    if hits.len() < options.top_k && options.full_scan_fallback && depth < ranked.len() {
        tracing::debug!(
            program,
            found = hits.len(),
            depth,
            "over-fetch window short, scanning remaining candidates"
        );
        let remaining = options.top_k - hits.len();
        hits.extend(
            ranked[depth..]
                .iter()
                .filter(matches_program)
                .take(remaining)
                .map(to_hit),
        );
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> (VectorSpace, Vec<CourseRecord>) {
        let courses = vec![
            CourseRecord::new("Machine Learning", "AI").with_tags(["ml"]),
            CourseRecord::new("Deep Learning", "AI").with_tags(["dl"]),
            CourseRecord::new("Computer Vision", "AI").with_tags(["cv"]),
            CourseRecord::new("NLP", "AI_PRODUCT").with_tags(["nlp"]),
            CourseRecord::new("Product Management for AI", "AI_PRODUCT").with_tags(["product"]),
        ];
        let corpus: Vec<String> = courses.iter().map(CourseRecord::corpus_text).collect();
        (VectorSpace::build(&corpus), courses)
    }

    #[test]
    fn test_search_returns_best_match_first() {
        let (space, courses) = catalog();
        let hits = search(&space, &courses, "computer vision", &SearchOptions::top_k(3));
        assert_eq!(hits[0].course.name, "Computer Vision");
        assert!(hits[0].score > 0.0);
    }

    #[test]
    fn test_search_scores_non_increasing() {
        let (space, courses) = catalog();
        let hits = search(&space, &courses, "learning", &SearchOptions::top_k(5));
        assert_eq!(hits.len(), 5);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_equal_scores_keep_table_order() {
        let courses = vec![
            CourseRecord::new("Statistics", "AI").with_semester(2),
            CourseRecord::new("Statistics", "AI_PRODUCT").with_semester(1),
            CourseRecord::new("Philosophy", "AI"),
        ];
        let corpus: Vec<String> = courses.iter().map(CourseRecord::corpus_text).collect();
        let space = VectorSpace::build(&corpus);

        let hits = search(&space, &courses, "statistics", &SearchOptions::top_k(2));
        assert_eq!(hits[0].score, hits[1].score);
        assert_eq!(hits[0].course.program, "AI");
        assert_eq!(hits[1].course.program, "AI_PRODUCT");
    }

    #[test]
    fn test_unknown_query_yields_zero_scores() {
        let (space, courses) = catalog();
        let hits = search(&space, &courses, "квантовая химия", &SearchOptions::top_k(3));
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].score, 0.0);
        assert_eq!(hits[0].course.name, "Machine Learning");
    }

    #[test]
    fn test_program_filter() {
        let (space, courses) = catalog();
        let options = SearchOptions::top_k(5).with_program(Some("AI_PRODUCT"));
        let hits = search(&space, &courses, "learning", &options);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.course.program == "AI_PRODUCT"));
    }

    #[test]
    fn test_rare_program_found_past_window() {
        let mut courses: Vec<CourseRecord> = (0..20)
            .map(|i| CourseRecord::new(format!("Data Analysis {i}"), "AI"))
            .collect();
        courses.push(CourseRecord::new("Product Analytics", "AI_PRODUCT"));
        let corpus: Vec<String> = courses.iter().map(CourseRecord::corpus_text).collect();
        let space = VectorSpace::build(&corpus);

        let mut options = SearchOptions::top_k(1).with_program(Some("AI_PRODUCT"));
        options.full_scan_fallback = false;
        assert!(search(&space, &courses, "data analysis", &options).is_empty());

        options.full_scan_fallback = true;
        let hits = search(&space, &courses, "data analysis", &options);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].course.name, "Product Analytics");
    }

    #[test]
    fn test_unmatched_program_is_empty() {
        let (space, courses) = catalog();
        let options = SearchOptions::top_k(3).with_program(Some("ROBOTICS"));
        assert!(search(&space, &courses, "learning", &options).is_empty());
    }

    #[test]
    fn test_zero_top_k() {
        let (space, courses) = catalog();
        assert!(search(&space, &courses, "learning", &SearchOptions::top_k(0)).is_empty());
    }

    #[test]
    fn test_fetch_depth() {
        assert_eq!(SearchOptions::top_k(5).fetch_depth(), 15);
        let mut options = SearchOptions::top_k(4);
        options.fetch_multiplier = 0;
        assert_eq!(options.fetch_depth(), 4);
    }

    #[test]
    fn test_search_hit_serialization() {
        let hit = SearchHit {
            score: 0.5,
            course: CourseRecord::new("NLP", "AI").with_semester(2),
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("\"score\":0.5"));
        assert!(json.contains("\"name\":\"NLP\""));
        assert!(json.contains("\"semester\":2"));
    }
}
