//! **kaidex** - Fast CLI for validating and querying occult-encyclopedia content datasets
//!
//! Loads the static JSON/Markdown datasets (haunted spots, urban-legend
//! stories, cryptids) and exposes pure filter, sort, related and validation
//! engines behind the `kdx` binary.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core engines - pure, synchronous functions over in-memory datasets
pub mod core {
    /// Record model, categories and letter-grade score maps
    pub mod model;
    pub use model::{Category, Entry, Status};

    /// Text helpers: collation keys, tolerant dates, query haystacks
    pub mod text;

    /// AND-composed filter criteria over one category
    pub mod filter;
    pub use filter::{DangerFilter, FilterCriteria, Selection, filter_entries};

    /// Multi-key sorting and the weighted recommend score
    pub mod sort;
    pub use sort::{SortKey, recommend_score, sort_entries};

    /// Related-item scoring with affinity labels
    pub mod related;
    pub use related::{Affinity, RelatedEntry, related_entries};

    /// Collect-all dataset validation gate
    pub mod validate;
    pub use validate::{Violation, validate_dataset, run as validate_run};

    /// Query subcommands wiring the engines to terminal output
    pub mod query;
}

/// Infrastructure - configuration and dataset loading
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// JSON dataset loading with per-record error collection
    pub mod dataset;
    pub use dataset::{LoadedDataset, load_category};

    /// Markdown-with-frontmatter article loading
    pub mod article;
    pub use article::load_articles;

    /// Gitignore-aware directory walking for the articles tree
    pub mod walk;
    pub use walk::FileWalker;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use core::{
    Category, Entry, FilterCriteria, SortKey, filter_entries, related_entries, sort_entries,
};
pub use infra::{Config, load_category, load_config};
