//! Component catalog index.
//!
//! The catalog document maps category keys to `{name, components[]}`. Building
//! the index flattens it into one ordered component list, stamping every
//! component with its category's display name.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use docdesk_document::load_document;
use docdesk_shared::{CategoryEntry, Component, DocdeskError, IndexStatus, Result};

use crate::ShapeError;

// ---------------------------------------------------------------------------
// Typed document
// ---------------------------------------------------------------------------

/// Validated view of a catalog document.
#[derive(Debug, Clone, Default)]
pub struct CatalogDocument {
    pub categories: Vec<CategoryDoc>,
}

/// One category as it appears in the document.
#[derive(Debug, Clone)]
pub struct CategoryDoc {
    pub key: String,
    pub name: Option<String>,
    /// Component objects, each guaranteed to carry a string `name`.
    pub components: Vec<Map<String, Value>>,
}

impl CatalogDocument {
    /// Check the document shape and keep what the index needs.
    ///
    /// Components without a string `name` are skipped; a non-object root or
    /// `categories` value is rejected.
    pub fn from_value(value: Value) -> std::result::Result<Self, ShapeError> {
        let Value::Object(mut root) = value else {
            return Err(ShapeError("catalog root must be an object".into()));
        };

        let categories = match root.remove("categories") {
            Some(Value::Object(categories)) => categories,
            Some(_) => return Err(ShapeError("`categories` must be an object".into())),
            None => return Ok(Self::default()),
        };

        let mut docs = Vec::with_capacity(categories.len());
        for (key, category) in categories {
            let Value::Object(mut category) = category else {
                debug!(%key, "skipping non-object category");
                continue;
            };

            let name = match category.remove("name") {
                Some(Value::String(name)) => Some(name),
                _ => None,
            };

            let components = match category.remove("components") {
                Some(Value::Array(items)) => items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(obj) if obj.get("name").is_some_and(Value::is_string) => {
                            Some(obj)
                        }
                        _ => {
                            debug!(%key, "skipping component without a name");
                            None
                        }
                    })
                    .collect(),
                _ => Vec::new(),
            };

            docs.push(CategoryDoc {
                key,
                name,
                components,
            });
        }

        Ok(Self { categories: docs })
    }
}

// ---------------------------------------------------------------------------
// Index
// ---------------------------------------------------------------------------

/// Read-only index over a component catalog.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    categories: Vec<CategoryEntry>,
    components: Vec<Component>,
    status: IndexStatus,
}

impl CatalogIndex {
    /// An index with no content.
    pub fn empty(status: IndexStatus) -> Self {
        Self {
            categories: Vec::new(),
            components: Vec::new(),
            status,
        }
    }

    /// Flatten a validated document, categories and components in document order.
    pub fn from_document(doc: CatalogDocument) -> Self {
        let mut categories = Vec::with_capacity(doc.categories.len());
        let mut components = Vec::new();

        for category in doc.categories {
            let display = category.name.unwrap_or_else(|| category.key.clone());

            let stamped: Vec<Component> = category
                .components
                .into_iter()
                .map(|mut fields| {
                    let name = match fields.remove("name") {
                        Some(Value::String(name)) => name,
                        _ => String::new(),
                    };
                    fields.remove("category");
                    Component {
                        name,
                        category: display.clone(),
                        fields,
                    }
                })
                .collect();

            components.extend(stamped.iter().cloned());
            categories.push(CategoryEntry {
                key: category.key,
                name: display,
                components: stamped,
            });
        }

        Self {
            categories,
            components,
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
                    categories = index.categories.len(),
                    components = index.components.len(),
                    "catalog index built"
                );
                index
            }
            Err(e) => {
                warn!(error = %e, "catalog unavailable, serving an empty index");
                Self::empty(IndexStatus::Degraded {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let value = load_document(path)?;
        let doc = CatalogDocument::from_value(value)
            .map_err(|e| DocdeskError::decode(path, e.to_string()))?;
        Ok(Self::from_document(doc))
    }

    pub fn status(&self) -> &IndexStatus {
        &self.status
    }

    /// First component whose name matches case-insensitively.
    pub fn get_component(&self, name: &str) -> Option<&Component> {
        let wanted = name.to_lowercase();
        self.components
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
    }

    /// Components whose stamped category matches case-insensitively, in index order.
    pub fn get_components_by_category(&self, category: &str) -> Vec<&Component> {
        let wanted = category.to_lowercase();
        self.components
            .iter()
            .filter(|c| c.category.to_lowercase() == wanted)
            .collect()
    }

    pub fn get_all_components(&self) -> &[Component] {
        &self.components
    }

    pub fn get_all_categories(&self) -> &[CategoryEntry] {
        &self.categories
    }
}

impl Default for CatalogIndex {
    fn default() -> Self {
        Self::empty(IndexStatus::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_path;
    use serde_json::json;

    fn fixture_index() -> CatalogIndex {
        CatalogIndex::load(&fixture_path("json/components.json"))
    }

    #[test]
    fn counts_match_document() {
        let index = fixture_index();
        assert!(index.status().is_ready());
        assert_eq!(index.get_all_components().len(), 7);
        assert_eq!(index.get_all_categories().len(), 3);
    }

    #[test]
    fn flattening_keeps_document_order_and_stamps_category() {
        let index = fixture_index();
        let names: Vec<&str> = index
            .get_all_components()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Button", "IconButton", "TextField", "Checkbox", "Select", "Alert", "Toast"]
        );

        let category_names: Vec<&str> = index
            .get_all_categories()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        for component in index.get_all_components() {
            assert!(category_names.contains(&component.category.as_str()));
        }
        assert_eq!(index.get_all_components()[2].category, "Forms");
    }

    #[test]
    fn component_lookup_ignores_case() {
        let index = fixture_index();
        let a = index.get_component("Button").expect("Button");
        let b = index.get_component("BUTTON").expect("BUTTON");
        assert_eq!(a, b);
        assert_eq!(a.category, "Actions");
        assert_eq!(a.fields["description"], "Triggers an action or event.");
        assert!(index.get_component("Carousel").is_none());
    }

    #[test]
    fn category_lookup_ignores_case_and_keeps_order() {
        let index = fixture_index();
        let forms: Vec<&str> = index
            .get_components_by_category("forms")
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(forms, ["TextField", "Checkbox", "Select"]);
        assert!(index.get_components_by_category("Layout").is_empty());
    }

    #[test]
    fn category_without_name_uses_key() {
        let doc = CatalogDocument::from_value(json!({
            "categories": {
                "layout": {"components": [{"name": "Grid"}, {"label": "no name"}]}
            }
        }))
        .unwrap();
        let index = CatalogIndex::from_document(doc);
        assert_eq!(index.get_all_components().len(), 1);
        assert_eq!(index.get_all_components()[0].category, "layout");
    }

    #[test]
    fn rejects_non_object_root() {
        assert!(CatalogDocument::from_value(json!(["Button"])).is_err());
        assert!(CatalogDocument::from_value(json!({"categories": []})).is_err());
    }

    #[test]
    fn missing_file_degrades_to_empty_index() {
        let index = CatalogIndex::load(Path::new("/no/such/components.json"));
        assert!(!index.status().is_ready());
        assert!(index.get_all_components().is_empty());
        assert!(index.get_component("Button").is_none());
    }

    #[test]
    fn utf16_catalog_matches_utf8_count() {
        let utf8 = std::fs::read_to_string(fixture_path("json/components.json")).unwrap();
        let mut bytes = vec![0xFF, 0xFE];
        for unit in utf8.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("components-utf16.json");
        std::fs::write(&path, bytes).unwrap();

        let index = CatalogIndex::load(&path);
        assert!(index.status().is_ready());
        assert_eq!(
            index.get_all_components().len(),
            fixture_index().get_all_components().len()
        );
    }
}
