//! Shared types, error model, and configuration for Pastewatch.
//!
//! This crate is the foundation depended on by all other Pastewatch crates.
//! It provides:
//! - [`PastewatchError`], the unified error type
//! - Domain types ([`PasteId`], [`MatchRecord`])
//! - Configuration ([`AppConfig`], [`SweepConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, HttpConfig, OutputConfig, PASTE_ID_PLACEHOLDER, SourceConfig, SweepConfig,
    SweepPolicyConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{PastewatchError, Result};
pub use types::{DISCOVERED_AT_FORMAT, MatchRecord, MatchStatus, PasteId, Source};
