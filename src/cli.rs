use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::model::Category;
use crate::core::sort::SortKey;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
}

#[derive(Parser)]
#[command(name = "kdx")]
#[command(about = "A fast CLI for validating and querying occult-encyclopedia content datasets")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every dataset and report all violations
    Validate(ValidateArgs),

    /// Filter and sort one category's records
    List(ListArgs),

    /// Show items related to a record
    Related(RelatedArgs),

    /// Show one record in full
    Show(ShowArgs),

    /// Show the newest records across all categories
    Latest(LatestArgs),

    /// Initialize a kaidex.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Category argument shared by the query subcommands
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CategoryArg {
    Spots,
    Stories,
    Uma,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Spots => Category::Spots,
            CategoryArg::Stories => Category::Stories,
            CategoryArg::Uma => Category::Uma,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Recommend,
    Danger,
    Credibility,
    Pref,
    Existence,
    Evidence,
    Newest,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Recommend => SortKey::Recommend,
            SortArg::Danger => SortKey::Danger,
            SortArg::Credibility => SortKey::Credibility,
            SortArg::Pref => SortKey::Pref,
            SortArg::Existence => SortKey::ExistenceRank,
            SortArg::Evidence => SortKey::EvidenceRank,
            SortArg::Newest => SortKey::Newest,
        }
    }
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Directory holding the category JSON datasets
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory of Markdown spot articles to validate alongside
    #[arg(long)]
    pub articles_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Category to list
    #[arg(value_enum)]
    pub category: CategoryArg,

    /// Case-insensitive substring over title, summary, place, type and tags
    #[arg(short, long)]
    pub query: Option<String>,

    /// Exact prefecture match
    #[arg(long)]
    pub pref: Option<String>,

    /// Exact region match
    #[arg(long)]
    pub region: Option<String>,

    /// Exact type match
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Required tag; repeat to require several
    #[arg(short, long)]
    pub tag: Vec<String>,

    /// Danger level: 1-4 means at least, 5 means exactly 5
    #[arg(long)]
    pub danger: Option<String>,

    /// Exact credibility grade (S, A, B, C, D)
    #[arg(long)]
    pub credibility: Option<String>,

    /// Exact existence rank (S, A, B, C, D)
    #[arg(long)]
    pub existence: Option<String>,

    /// Exact evidence rank (A, B, C, D, E)
    #[arg(long)]
    pub evidence: Option<String>,

    /// Sort order
    #[arg(short, long, value_enum)]
    pub sort: Option<SortArg>,

    /// Keep only the first N records after sorting
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Emit JSON lines instead of a table
    #[arg(long)]
    pub json: bool,

    /// Directory holding the category JSON datasets
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Merge Markdown spot articles into the spots dataset
    #[arg(long)]
    pub include_articles: bool,
}

#[derive(Parser)]
pub struct RelatedArgs {
    /// Category of the focal record
    #[arg(value_enum)]
    pub category: CategoryArg,

    /// Slug of the focal record
    pub slug: String,

    /// Maximum number of related items
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Emit JSON lines instead of a table
    #[arg(long)]
    pub json: bool,

    /// Directory holding the category JSON datasets
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Category of the record
    #[arg(value_enum)]
    pub category: CategoryArg,

    /// Slug of the record
    pub slug: String,

    /// Emit the record as JSON
    #[arg(long)]
    pub json: bool,

    /// Directory holding the category JSON datasets
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct LatestArgs {
    /// Maximum number of records
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Emit JSON lines instead of a table
    #[arg(long)]
    pub json: bool,

    /// Directory holding the category JSON datasets
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
