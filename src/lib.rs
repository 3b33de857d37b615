//! Coursefinder - curriculum search and elective recommendations.
//!
//! Loads a university program catalog from CSV and answers questions about
//! it: TF-IDF similarity search over course titles and tags, rule-based intent
//! classification of free-text messages, background-to-tag mapping, and
//! tag-overlap elective recommendations.
//!
//! # Example
//!
//! ```no_run
//! use coursefinder::catalog::{Catalog, LoadOptions};
//! use coursefinder::search::SearchOptions;
//!
//! let catalog = Catalog::load("data/courses.csv", LoadOptions::default()).unwrap();
//! for hit in catalog.search("computer vision", &SearchOptions::top_k(3)) {
//!     println!("{:.3} {}", hit.score, hit.course.name);
//! }
//! ```

pub mod assistant;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod intent;
pub mod output;
pub mod recommend;
pub mod search;
pub mod tags;

pub use assistant::{Assistant, Reply};
pub use catalog::{Catalog, CatalogHandle, CourseRecord, TagSet};
pub use intent::{classify, Intent};
pub use tags::map_background_to_tags;
