//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::catalog::LoadOptions;
use crate::core::Result;
use crate::search::{SearchOptions, DEFAULT_FETCH_MULTIPLIER};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the course dataset (CSV).
    pub dataset: PathBuf,
    /// Dataset loading options.
    pub catalog: CatalogConfig,
    /// Query defaults.
    pub query: QueryConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/courses.csv"),
            catalog: CatalogConfig::default(),
            query: QueryConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an explicit file path.
    ///
    /// Errors if the file does not exist. Use this for explicit `--config` flags.
    /// Env vars with `COURSEFINDER_` prefix override file values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::core::Error::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::file_exact(path)))
    }

    /// Load configuration from a directory, looking for coursefinder.toml or
    /// .coursefinder/coursefinder.toml.
    ///
    /// Missing files are silently skipped (defaults are used).
    pub fn load_default(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        Self::extract(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(dir.join("coursefinder.toml")))
                .merge(Toml::file(dir.join(".coursefinder/coursefinder.toml"))),
        )
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .merge(Env::prefixed("COURSEFINDER_").split("__"))
            .extract()
            .map_err(|e| crate::core::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.query.top_k == 0 {
            return Err(crate::core::Error::config("query.top_k must be at least 1"));
        }
        if self.query.fetch_multiplier == 0 {
            return Err(crate::core::Error::config(
                "query.fetch_multiplier must be at least 1",
            ));
        }
        Ok(())
    }

    /// Default config file content.
    pub fn default_toml() -> &'static str {
        include_str!("default_config.toml")
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Dataset loading configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Derive tags from course names for rows without tags.
    pub auto_tag: bool,
}

impl CatalogConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            auto_tag: self.auto_tag,
        }
    }
}

/// Query defaults applied when a call does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of results.
    pub top_k: usize,
    /// Restrict results to one program code.
    pub program: Option<String>,
    /// Keep only results from this semester (applied to returned rows).
    pub semester: Option<u32>,
    /// Over-fetch factor for program-filtered similarity search.
    pub fetch_multiplier: usize,
    /// Scan the full ranking when the over-fetch window is short.
    pub full_scan_fallback: bool,
    /// Maximum rows listed by `plan`.
    pub plan_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            program: None,
            semester: None,
            fetch_multiplier: DEFAULT_FETCH_MULTIPLIER,
            full_scan_fallback: true,
            plan_limit: 30,
        }
    }
}

impl QueryConfig {
    pub fn search_options(&self) -> SearchOptions<'_> {
        SearchOptions {
            top_k: self.top_k,
            program: self.program.as_deref(),
            fetch_multiplier: self.fetch_multiplier,
            full_scan_fallback: self.full_scan_fallback,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,
    /// Color output.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON format.
    Json,
    /// Markdown format.
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Unknown format: {s}. Use 'text', 'json', or 'md'")),
        }
    }
}
