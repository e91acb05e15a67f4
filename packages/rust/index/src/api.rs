//! API specification index.
//!
//! Flattens an OpenAPI-style document (`paths → method → operation`) into an
//! ordered endpoint list, plus a tag set and a schema map derived from it.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use docdesk_document::load_document;
use docdesk_shared::{DocdeskError, Endpoint, EndpointSummary, IndexStatus, Result};

use crate::ShapeError;

/// Path-item keys that name operations. Anything else (`parameters`,
/// `summary`, `servers`, ...) is path-level metadata.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

// ---------------------------------------------------------------------------
// Typed document
// ---------------------------------------------------------------------------

/// Validated view of an API specification document.
#[derive(Debug, Clone, Default)]
pub struct ApiSpecDocument {
    pub info: Option<Value>,
    pub paths: Vec<PathItem>,
    pub schemas: Map<String, Value>,
}

/// Operations declared under one path, in document order.
#[derive(Debug, Clone)]
pub struct PathItem {
    pub path: String,
    /// `(METHOD, operation object)` pairs; method already upper-cased.
    pub operations: Vec<(String, Map<String, Value>)>,
}

impl ApiSpecDocument {
    /// Check the document shape and keep what the index needs.
    pub fn from_value(value: Value) -> std::result::Result<Self, ShapeError> {
        let Value::Object(mut root) = value else {
            return Err(ShapeError("API specification root must be an object".into()));
        };

        let info = root.remove("info").filter(Value::is_object);

        let raw_paths = match root.remove("paths") {
            Some(Value::Object(paths)) => paths,
            Some(_) => return Err(ShapeError("`paths` must be an object".into())),
            None => Map::new(),
        };

        let mut paths = Vec::with_capacity(raw_paths.len());
        for (path, item) in raw_paths {
            let Value::Object(item) = item else {
                debug!(%path, "skipping non-object path item");
                continue;
            };
            let operations = item
                .into_iter()
                .filter(|(key, _)| HTTP_METHODS.contains(&key.to_lowercase().as_str()))
                .filter_map(|(method, op)| match op {
                    Value::Object(op) => Some((method.to_uppercase(), op)),
                    _ => None,
                })
                .collect();
            paths.push(PathItem { path, operations });
        }

        Ok(Self {
            info,
            paths,
            schemas: extract_schemas(&mut root),
        })
    }
}

/// `components.schemas` (OpenAPI 3) or `definitions` (Swagger 2).
fn extract_schemas(root: &mut Map<String, Value>) -> Map<String, Value> {
    let from_components = root
        .get_mut("components")
        .and_then(|c| c.get_mut("schemas"))
        .map(Value::take);
    match from_components.or_else(|| root.remove("definitions")) {
        Some(Value::Object(schemas)) => schemas,
        _ => Map::new(),
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Read-only index over an API specification.
#[derive(Debug, Clone)]
pub struct ApiSpecIndex {
    info: Option<Value>,
    /// path → METHOD → operation detail.
    details: HashMap<String, HashMap<String, Value>>,
    endpoints: Vec<Endpoint>,
    tags: BTreeSet<String>,
    schemas: Map<String, Value>,
    status: IndexStatus,
}

impl ApiSpecIndex {
    /// An index with no content.
    pub fn empty(status: IndexStatus) -> Self {
        Self {
            info: None,
            details: HashMap::new(),
            endpoints: Vec::new(),
            tags: BTreeSet::new(),
            schemas: Map::new(),
            status,
        }
    }

    /// Flatten a validated document, paths and methods in document order.
    pub fn from_document(doc: ApiSpecDocument) -> Self {
        let mut details: HashMap<String, HashMap<String, Value>> = HashMap::new();
        let mut endpoints = Vec::new();
        let mut tags = BTreeSet::new();

        for item in doc.paths {
            let by_method = details.entry(item.path.clone()).or_default();
            for (method, op) in item.operations {
                let endpoint_tags: Vec<String> = op
                    .get("tags")
                    .and_then(Value::as_array)
                    .map(|arr| {
                        arr.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                tags.extend(endpoint_tags.iter().cloned());

                endpoints.push(Endpoint {
                    path: item.path.clone(),
                    method: method.clone(),
                    operation_id: string_field(&op, "operationId"),
                    summary: string_field(&op, "summary"),
                    description: string_field(&op, "description"),
                    tags: endpoint_tags,
                });
                by_method.insert(method, Value::Object(op));
            }
        }

        Self {
            info: doc.info,
            details,
            endpoints,
            tags,
            schemas: doc.schemas,
            status: IndexStatus::Ready,
        }
    }

    /// Build an index from a document on disk.
    ///
    /// Never fails: a missing or undecodable document produces an empty index
    /// with [`IndexStatus::Degraded`].
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(index) => {
                info!(
                    endpoints = index.endpoints.len(),
                    tags = index.tags.len(),
                    schemas = index.schemas.len(),
                    "API spec index built"
                );
                index
            }
            Err(e) => {
                warn!(error = %e, "API spec unavailable, serving an empty index");
                Self::empty(IndexStatus::Degraded {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let value = load_document(path)?;
        let doc = ApiSpecDocument::from_value(value)
            .map_err(|e| DocdeskError::decode(path, e.to_string()))?;
        Ok(Self::from_document(doc))
    }

    pub fn status(&self) -> &IndexStatus {
        &self.status
    }

    /// The specification's `info` object, if present.
    pub fn info(&self) -> Option<&Value> {
        self.info.as_ref()
    }

    /// Union of all endpoint tags, sorted.
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn schemas(&self) -> &Map<String, Value> {
        &self.schemas
    }

    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Operation detail for an exact path and a case-insensitive method.
    pub fn get_endpoint_details(&self, path: &str, method: &str) -> Option<&Value> {
        self.details.get(path)?.get(&method.to_uppercase())
    }

    /// Endpoints carrying `tag` (case-sensitive), in index order.
    pub fn get_endpoints_by_tag(&self, tag: &str) -> Vec<EndpointSummary> {
        self.endpoints
            .iter()
            .filter(|e| e.tags.iter().any(|t| t == tag))
            .map(EndpointSummary::from)
            .collect()
    }

    /// Endpoints whose path, operationId, summary, or description contains
    /// `query`, ignoring case. An empty query matches every endpoint.
    pub fn search(&self, query: &str) -> Vec<&Endpoint> {
        let needle = query.to_lowercase();
        let contains = |field: &str| field.to_lowercase().contains(&needle);

        self.endpoints
            .iter()
            .filter(|e| {
                contains(&e.path)
                    || e.operation_id.as_deref().is_some_and(contains)
                    || e.summary.as_deref().is_some_and(contains)
                    || e.description.as_deref().is_some_and(contains)
            })
            .collect()
    }

    /// [`search`](Self::search), projected to endpoint summaries.
    pub fn search_endpoints(&self, query: &str) -> Vec<EndpointSummary> {
        self.search(query)
            .into_iter()
            .map(EndpointSummary::from)
            .collect()
    }
}

impl Default for ApiSpecIndex {
    fn default() -> Self {
        Self::empty(IndexStatus::Ready)
    }
}

fn string_field(op: &Map<String, Value>, key: &str) -> Option<String> {
    op.get(key).and_then(Value::as_str).map(str::to_string)
}
