//! CSV dataset loading with schema validation.
//!
//! The first row names the columns. Only `name` is required; `program`,
//! `semester`, `kind`, `hours` and `tags` default when absent. Any row with an
//! empty name aborts the whole load.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::core::{Error, Result};
use crate::tags::tag_course_name;

use super::record::{parse_optional, parse_semester, parse_tags, CourseRecord};

/// Options applied while reading rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Derive tags from the course name for rows with no tags.
    pub auto_tag: bool,
}

/// Column positions resolved from the header row.
struct Columns {
    name: usize,
    program: Option<usize>,
    semester: Option<usize>,
    kind: Option<usize>,
    hours: Option<usize>,
    tags: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim_start_matches('\u{feff}').trim().to_lowercase(), i))
            .collect();
        let name = *index
            .get("name")
            .ok_or(Error::MissingColumn { column: "name" })?;
        Ok(Self {
            name,
            program: index.get("program").copied(),
            semester: index.get("semester").copied(),
            kind: index.get("kind").copied(),
            hours: index.get("hours").copied(),
            tags: index.get("tags").copied(),
        })
    }
}

fn cell(record: &StringRecord, column: Option<usize>) -> &str {
    column.and_then(|i| record.get(i)).unwrap_or("")
}

/// Read the dataset file into raw bytes, mapping a missing file to a load error.
pub fn read_dataset(path: &Path) -> Result<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::DatasetNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Parse course records from CSV.
pub fn parse_courses<R: Read>(reader: R, options: LoadOptions) -> Result<Vec<CourseRecord>> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::resolve(csv.headers()?)?;
    let mut courses = Vec::new();

    for (i, record) in csv.records().enumerate() {
        let record = record?;
        let row = i + 1;

        let name = cell(&record, Some(columns.name)).trim();
        if name.is_empty() {
            return Err(Error::EmptyName { row });
        }

        let raw_semester = cell(&record, columns.semester);
        let semester = parse_semester(raw_semester);
        if semester.is_none() && parse_optional(raw_semester).is_some() {
            tracing::warn!(row, value = raw_semester, "semester is not a positive integer, treating as unknown");
        }

        let mut tags = parse_tags(cell(&record, columns.tags));
        if options.auto_tag && tags.is_empty() {
            tags = tag_course_name(name);
        }

        courses.push(CourseRecord {
            name: name.to_string(),
            program: cell(&record, columns.program).trim().to_string(),
            semester,
            kind: parse_optional(cell(&record, columns.kind)),
            hours: parse_optional(cell(&record, columns.hours)),
            tags,
        });
    }

    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
name,semester,kind,hours,program,tags
Machine Learning,1.0,обяз.,4 з.е.,AI,['ml']
Deep Learning,2,электив,3 з.е.,AI,\"['dl', 'ml']\"
Computer Vision,,электив,,AI,cv
";

    #[test]
    fn test_parse_sample() {
        let courses = parse_courses(SAMPLE.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(courses.len(), 3);
        assert_eq!(courses[0].name, "Machine Learning");
        assert_eq!(courses[0].semester, Some(1));
        assert_eq!(courses[0].kind.as_deref(), Some("обяз."));
        assert_eq!(courses[1].tags.len(), 2);
        assert_eq!(courses[2].semester, None);
        assert_eq!(courses[2].hours, None);
        assert!(courses[2].tags.contains("cv"));
    }

    #[test]
    fn test_missing_name_column() {
        let err = parse_courses("title,program\nML,AI\n".as_bytes(), LoadOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "name" }));
    }

    #[test]
    fn test_empty_name_fails_whole_load() {
        let data = "name,program\nML,AI\n ,AI\nCV,AI\n";
        let err = parse_courses(data.as_bytes(), LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyName { row: 2 }));
    }

    #[test]
    fn test_optional_columns_default() {
        let courses = parse_courses("name\nStatistics\n".as_bytes(), LoadOptions::default())
            .unwrap();
        assert_eq!(courses[0].program, "");
        assert_eq!(courses[0].semester, None);
        assert!(courses[0].tags.is_empty());
    }

    #[test]
    fn test_malformed_semester_coerced() {
        let data = "name,semester\nML,осень\nCV,-2\n";
        let courses = parse_courses(data.as_bytes(), LoadOptions::default()).unwrap();
        assert!(courses.iter().all(|c| c.semester.is_none()));
    }

    #[test]
    fn test_header_case_and_bom() {
        let data = "\u{feff}Name,PROGRAM\nML,AI\n";
        let courses = parse_courses(data.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(courses[0].program, "AI");
    }

    #[test]
    fn test_auto_tag_fills_untagged_only() {
        let data = "name,tags\nКомпьютерное зрение,\nMachine Learning,product\n";
        let courses = parse_courses(data.as_bytes(), LoadOptions { auto_tag: true }).unwrap();
        assert!(courses[0].tags.contains("cv"));
        assert_eq!(courses[1].tags.iter().collect::<Vec<_>>(), vec!["product"]);
    }

    #[test]
    fn test_read_dataset_missing() {
        let err = read_dataset(Path::new("/nonexistent/courses.csv")).unwrap_err();
        assert!(matches!(err, Error::DatasetNotFound { .. }));
    }
}
