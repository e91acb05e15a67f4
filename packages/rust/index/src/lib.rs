//! In-memory indexes over the knowledge documents.
//!
//! This crate provides:
//! - [`catalog`]: the design-system component catalog ([`CatalogIndex`])
//! - [`api`]: the API specification ([`ApiSpecIndex`])
//! - [`keywords`]: keyword extraction and endpoint recommendation
//!
//! Indexes are built once from a loaded document and are read-only afterwards.
//! A document that cannot be loaded yields an empty index whose
//! [`IndexStatus`](docdesk_shared::IndexStatus) is `Degraded`.

pub mod api;
pub mod catalog;
pub mod keywords;

pub use api::{ApiSpecDocument, ApiSpecIndex, HTTP_METHODS};
pub use catalog::{CatalogDocument, CatalogIndex};
pub use keywords::{
    MAX_SUGGESTIONS, Recommendation, ResolvedEndpoint, STOP_WORDS, extract_keywords,
    recommend_endpoints,
};

/// The document parsed but does not have the expected structure.
#[derive(Debug, thiserror::Error)]
#[error("unexpected document shape: {0}")]
pub struct ShapeError(pub String);

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    pub(crate) fn fixture_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }
}
