//! Shared types, error model, and configuration for mdparts.
//!
//! This crate is the foundation depended on by the other mdparts crates.
//! It provides:
//! - [`MdPartsError`] — the unified error type
//! - Domain types ([`SortOrder`], [`MergeOutcome`], [`RunSummary`])
//! - Configuration ([`AppConfig`], [`MergeOptions`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, MergeOptions, MergeSection, config_dir, config_file_path, init_config,
    init_config_at, load_config, load_config_from,
};
pub use error::{MdPartsError, Result};
pub use types::{DirFailure, MergeOutcome, RunSummary, SortOrder};
