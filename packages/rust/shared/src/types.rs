//! Core domain types shared by the indexes, the web pipeline, and the tool surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A design-system component, stamped with the display name of its category.
///
/// Identity is the case-insensitive `name`. Every other field from the source
/// document is carried verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub category: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// One category of the catalog with its components in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEntry {
    /// Key of the category in the source document.
    pub key: String,
    /// Display name (stamped onto each component).
    pub name: String,
    pub components: Vec<Component>,
}

// ---------------------------------------------------------------------------
// API specification
// ---------------------------------------------------------------------------

/// One (path, method) operation flattened out of the API specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    /// Always upper-case.
    pub method: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl Endpoint {
    /// Key used for deduplication across searches.
    pub fn key(&self) -> (&str, &str) {
        (&self.path, &self.method)
    }
}

/// Projection of an [`Endpoint`] returned by tag and search queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSummary {
    pub path: String,
    pub method: String,
    #[serde(rename = "operationId", default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Endpoint> for EndpointSummary {
    fn from(endpoint: &Endpoint) -> Self {
        Self {
            path: endpoint.path.clone(),
            method: endpoint.method.clone(),
            operation_id: endpoint.operation_id.clone(),
            summary: endpoint.summary.clone(),
            description: endpoint.description.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Index status
// ---------------------------------------------------------------------------

/// Outcome of building an index from a document on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndexStatus {
    /// The document loaded and the index is populated.
    Ready,
    /// The document could not be loaded; the index is empty.
    Degraded { reason: String },
}

impl IndexStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

// ---------------------------------------------------------------------------
// CachedPage
// ---------------------------------------------------------------------------

/// A fetched web page as held in the page cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPage {
    /// Exact URL string the page was requested with (the cache key).
    pub url: String,
    /// Raw response body.
    pub html: String,
    /// Plain-text rendering of the body.
    pub text: String,
    /// Text of the `<title>` element, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fetched_at: DateTime<Utc>,
}
