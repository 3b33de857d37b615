//! Error types for the coursefinder library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using coursefinder's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a catalog or rendering results.
///
/// Only the load path and the output/config edges are fallible. Ranking,
/// classification and tag mapping never return an error.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading the dataset or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset file does not exist.
    #[error("Dataset not found: {path}")]
    DatasetNotFound { path: PathBuf },

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A mandatory column is absent from the header row.
    #[error("Dataset is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    /// A row has an empty course name.
    #[error("Row {row} has an empty course name")]
    EmptyName { row: usize },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML rendering error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

impl Error {
    /// Create a new config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error came from reading or validating the dataset.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::DatasetNotFound { .. }
                | Self::Csv(_)
                | Self::MissingColumn { .. }
                | Self::EmptyName { .. }
        )
    }
}
