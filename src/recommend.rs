//! Tag-overlap recommendation ranking.

use serde::Serialize;

use crate::catalog::{CourseRecord, TagSet};

/// A recommended course with its tag-overlap score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Number of requested tags the course carries.
    pub overlap: usize,
    #[serde(flatten)]
    pub course: CourseRecord,
}

/// Rank courses by tag overlap, earliest semester first on ties.
///
/// `program` narrows the table before scoring. Unknown semesters sort after
/// every known one; rows that tie on both keys keep table order.
pub fn recommend(
    courses: &[CourseRecord],
    tags: &TagSet,
    program: Option<&str>,
    top_k: usize,
) -> Vec<Recommendation> {
    let mut scored: Vec<(usize, &CourseRecord)> = courses
        .iter()
        .filter(|c| program.is_none_or(|p| c.program == p))
        .map(|c| (c.tag_overlap(tags), c))
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.semester_key().cmp(&b.1.semester_key()))
    });
    scored.truncate(top_k);

    tracing::debug!(
        ?tags,
        ?program,
        returned = scored.len(),
        "ranked recommendations"
    );

    scored
        .into_iter()
        .map(|(overlap, course)| Recommendation {
            overlap,
            course: course.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_tags;

    fn names(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.course.name.as_str()).collect()
    }

    #[test]
    fn test_semester_breaks_equal_overlap() {
        let courses = vec![
            CourseRecord::new("Computer Vision", "AI")
                .with_semester(2)
                .with_tags(["ml", "cv"]),
            CourseRecord::new("Machine Learning", "AI")
                .with_semester(1)
                .with_tags(["ml"]),
        ];
        let recs = recommend(&courses, &parse_tags("ml"), None, 2);
        assert_eq!(names(&recs), vec!["Machine Learning", "Computer Vision"]);
        assert!(recs.iter().all(|r| r.overlap == 1));
    }

    #[test]
    fn test_overlap_dominates_semester() {
        let courses = vec![
            CourseRecord::new("Intro", "AI").with_semester(1).with_tags(["ml"]),
            CourseRecord::new("NLP", "AI").with_semester(3).with_tags(["ml", "nlp"]),
        ];
        let recs = recommend(&courses, &parse_tags("ml,nlp"), None, 5);
        assert_eq!(names(&recs), vec!["NLP", "Intro"]);
        assert_eq!(recs[0].overlap, 2);
    }

    #[test]
    fn test_unknown_semester_sorts_last() {
        let courses = vec![
            CourseRecord::new("Undated", "AI").with_tags(["data"]),
            CourseRecord::new("Late", "AI").with_semester(4).with_tags(["data"]),
        ];
        let recs = recommend(&courses, &parse_tags("data"), None, 5);
        assert_eq!(names(&recs), vec!["Late", "Undated"]);
    }

    #[test]
    fn test_full_ties_keep_table_order() {
        let courses = vec![
            CourseRecord::new("First", "AI").with_semester(1),
            CourseRecord::new("Second", "AI").with_semester(1),
        ];
        let recs = recommend(&courses, &parse_tags("ml"), None, 5);
        assert_eq!(names(&recs), vec!["First", "Second"]);
    }

    #[test]
    fn test_program_filter_before_scoring() {
        let courses = vec![
            CourseRecord::new("ML", "AI").with_tags(["ml"]),
            CourseRecord::new("PM", "AI_PRODUCT").with_tags(["product"]),
        ];
        let recs = recommend(&courses, &parse_tags("ml"), Some("AI_PRODUCT"), 5);
        assert_eq!(names(&recs), vec!["PM"]);
        assert_eq!(recs[0].overlap, 0);
    }

    #[test]
    fn test_top_k_and_empty() {
        let courses: Vec<CourseRecord> = (1..=6)
            .map(|i| CourseRecord::new(format!("C{i}"), "AI").with_semester(i))
            .collect();
        assert_eq!(recommend(&courses, &parse_tags("ml"), None, 3).len(), 3);
        assert!(recommend(&courses, &parse_tags("ml"), Some("NONE"), 3).is_empty());
        assert!(recommend(&[], &parse_tags("ml"), None, 3).is_empty());
    }
}
