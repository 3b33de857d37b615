//! CLI implementation using clap.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use crate::config::{self, QueryConfig};

/// Coursefinder - search curricula and get elective recommendations.
#[derive(Parser)]
#[command(name = "coursefinder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Course dataset (CSV); overrides the configured path
    #[arg(short, long, env = "COURSEFINDER_DATA")]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Similarity search over course names and tags
    #[command(alias = "s")]
    Search(SearchArgs),

    /// Recommend electives from a background description or tags
    #[command(alias = "rec")]
    Recommend(RecommendArgs),

    /// Classify the intent of a message
    Classify(TextArgs),

    /// Map a background description to domain tags
    Tags(TextArgs),

    /// List one program's courses, optionally for one semester
    Plan(PlanArgs),

    /// Answer a free-text message
    Ask(AskArgs),

    /// Export the catalog grouped by program
    Export(ExportArgs),

    /// Show catalog statistics
    Stats,

    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Query overrides shared by catalog commands.
#[derive(Args, Default)]
pub struct QueryArgs {
    /// Maximum number of results
    #[arg(short = 'k', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub top_k: Option<usize>,

    /// Restrict to one program code
    #[arg(short, long)]
    pub program: Option<String>,

    /// Keep only courses from this semester
    #[arg(short, long)]
    pub semester: Option<u32>,
}

impl QueryArgs {
    /// Overlay the flags onto configured defaults.
    pub fn apply(self, query: &mut QueryConfig) {
        if let Some(top_k) = self.top_k {
            query.top_k = top_k;
        }
        if self.program.is_some() {
            query.program = self.program;
        }
        if self.semester.is_some() {
            query.semester = self.semester;
        }
    }
}

#[derive(Args)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    #[command(flatten)]
    pub filters: QueryArgs,

    /// Only inspect the over-fetch window for program-filtered searches
    #[arg(long)]
    pub no_fallback: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("input").required(true).args(["background", "tags"])))]
pub struct RecommendArgs {
    /// Background description, mapped to tags
    pub background: Option<String>,

    /// Explicit tags (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[command(flatten)]
    pub filters: QueryArgs,
}

#[derive(Args)]
pub struct TextArgs {
    /// Message text
    pub text: String,
}

#[derive(Args)]
pub struct PlanArgs {
    /// Program code (case-insensitive)
    pub program: String,

    /// Semester number
    pub semester: Option<u32>,

    /// Maximum number of rows
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct AskArgs {
    /// Message text
    pub text: String,

    #[command(flatten)]
    pub filters: QueryArgs,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Write JSON to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Print the built-in default configuration file instead
    #[arg(long)]
    pub default: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Text,
}

impl From<OutputFormat> for config::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => config::OutputFormat::Json,
            OutputFormat::Markdown => config::OutputFormat::Markdown,
            OutputFormat::Text => config::OutputFormat::Text,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
