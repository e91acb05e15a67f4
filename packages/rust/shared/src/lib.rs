//! Shared types, error model, and configuration for docdesk.
//!
//! This crate is the foundation depended on by all other docdesk crates.
//! It provides:
//! - [`DocdeskError`]: the unified error type
//! - Domain types ([`Component`], [`Endpoint`], [`EndpointSummary`], [`CachedPage`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, SourcesConfig, SummaryConfig, WebConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{DocdeskError, Result};
pub use types::{
    CachedPage, CategoryEntry, Component, Endpoint, EndpointSummary, IndexStatus,
};
