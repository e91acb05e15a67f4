//! The tool surface: every boundary operation over the loaded sources.
//!
//! Indexes are built once and held as immutable snapshots. [`Toolbox::reload`]
//! builds fresh snapshots and swaps them in; readers holding the previous
//! `Arc` keep a consistent view until they drop it.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use docdesk_index::{ApiSpecIndex, CatalogIndex};
use docdesk_rules::RuleFile;
use docdesk_shared::{AppConfig, DocdeskError, Result};
use docdesk_web::{CompanyInfo, PageCache, PageFetcher};

use crate::error::ToolResult;
use crate::guide;
use crate::responses::{ApiQuery, CategoryLookup, ComponentLookup, CustomerLookup, Guide};

/// Entry point for all tool operations.
#[derive(Debug)]
pub struct Toolbox {
    config: AppConfig,
    catalog: RwLock<Arc<CatalogIndex>>,
    api_spec: RwLock<Arc<ApiSpecIndex>>,
    fetcher: PageFetcher,
}

impl Toolbox {
    /// Build indexes from the configured sources with a fresh page cache.
    pub fn new(config: AppConfig) -> Result<Self> {
        Self::with_cache(config, Arc::new(PageCache::new()))
    }

    /// Build indexes from the configured sources, fetching through `cache`.
    #[instrument(skip_all, fields(
        catalog = %config.sources.catalog_path.display(),
        api_spec = %config.sources.api_spec_path.display(),
    ))]
    pub fn with_cache(config: AppConfig, cache: Arc<PageCache>) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.web, cache)?;
        let catalog = CatalogIndex::load(&config.sources.catalog_path);
        let api_spec = ApiSpecIndex::load(&config.sources.api_spec_path);

        info!(
            catalog_ready = catalog.status().is_ready(),
            api_spec_ready = api_spec.status().is_ready(),
            "toolbox ready"
        );

        Ok(Self {
            config,
            catalog: RwLock::new(Arc::new(catalog)),
            api_spec: RwLock::new(Arc::new(api_spec)),
            fetcher,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Current catalog snapshot.
    pub fn catalog(&self) -> Arc<CatalogIndex> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Current API specification snapshot.
    pub fn api_spec(&self) -> Arc<ApiSpecIndex> {
        Arc::clone(&self.api_spec.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// Rebuild both indexes from disk and swap them in.
    #[instrument(skip_all)]
    pub fn reload(&self) {
        let catalog = Arc::new(CatalogIndex::load(&self.config.sources.catalog_path));
        let api_spec = Arc::new(ApiSpecIndex::load(&self.config.sources.api_spec_path));

        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = catalog;
        *self.api_spec.write().unwrap_or_else(PoisonError::into_inner) = api_spec;
        info!("indexes reloaded");
    }

    // -----------------------------------------------------------------------
    // Catalog
    // -----------------------------------------------------------------------

    /// Look up one component by name; without a name, list what exists.
    #[instrument(skip(self))]
    pub fn lookup_component(&self, name: Option<&str>) -> ToolResult<ComponentLookup> {
        require_source(&self.config.sources.catalog_path)?;
        let catalog = self.catalog();

        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            let names: Vec<&str> = catalog
                .get_all_components()
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            return Ok(ComponentLookup::Message {
                message: format!(
                    "Please provide a component name. Available components: {}",
                    names.join(", ")
                ),
            });
        };

        Ok(match catalog.get_component(name) {
            Some(component) => ComponentLookup::Found {
                component: component.clone(),
            },
            None => ComponentLookup::Message {
                message: format!("Component '{name}' not found"),
            },
        })
    }

    #[instrument(skip(self))]
    pub fn lookup_components_by_category(&self, category: &str) -> ToolResult<CategoryLookup> {
        require_source(&self.config.sources.catalog_path)?;
        let catalog = self.catalog();

        let components: Vec<_> = catalog
            .get_components_by_category(category)
            .into_iter()
            .cloned()
            .collect();

        Ok(if components.is_empty() {
            CategoryLookup::Message {
                message: format!("No components found in category '{category}'"),
            }
        } else {
            CategoryLookup::Found { components }
        })
    }

    // -----------------------------------------------------------------------
    // Customers
    // -----------------------------------------------------------------------

    /// Registry entries whose name contains `name` (case-insensitive); every
    /// entry when no name is given.
    #[instrument(skip(self))]
    pub fn get_customer_info(&self, name: Option<&str>) -> ToolResult<CustomerLookup> {
        let customers = docdesk_rules::read_customers(&self.config.sources.customers_path)?;

        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(CustomerLookup::Found { customers });
        };

        let matched: Vec<_> = customers
            .into_iter()
            .filter(|c| c.name_contains(name))
            .collect();

        Ok(if matched.is_empty() {
            CustomerLookup::Message {
                message: format!("No customer found with name containing '{name}'"),
            }
        } else {
            CustomerLookup::Found { customers: matched }
        })
    }

    // -----------------------------------------------------------------------
    // API specification
    // -----------------------------------------------------------------------

    /// Query the API specification.
    ///
    /// Precedence: `path` with `method`, then `tag`, then `search_query`,
    /// then an overview of the API.
    #[instrument(skip(self))]
    pub fn query_api(
        &self,
        tag: Option<&str>,
        search_query: Option<&str>,
        path: Option<&str>,
        method: Option<&str>,
    ) -> ToolResult<ApiQuery> {
        require_source(&self.config.sources.api_spec_path)?;
        let api = self.api_spec();

        if let (Some(path), Some(method)) = (path, method) {
            return Ok(match api.get_endpoint_details(path, method) {
                Some(detail) => ApiQuery::Endpoint {
                    endpoint: detail.clone(),
                },
                None => ApiQuery::Message {
                    message: format!("Endpoint {} {path} not found", method.to_uppercase()),
                },
            });
        }

        if let Some(tag) = tag {
            let endpoints = api.get_endpoints_by_tag(tag);
            return Ok(if endpoints.is_empty() {
                ApiQuery::Message {
                    message: format!("No endpoints found for tag '{tag}'"),
                }
            } else {
                ApiQuery::ByTag {
                    tag: tag.to_string(),
                    endpoints,
                }
            });
        }

        if let Some(query) = search_query {
            let endpoints = api.search_endpoints(query);
            return Ok(if endpoints.is_empty() {
                ApiQuery::Message {
                    message: format!("No endpoints found matching '{query}'"),
                }
            } else {
                ApiQuery::Search {
                    search_query: query.to_string(),
                    endpoints,
                }
            });
        }

        Ok(ApiQuery::Overview {
            api_info: api.info().cloned().unwrap_or_else(|| json!({})),
            available_tags: api.tags().iter().cloned().collect(),
            message: "Specify a tag, a search query, or a path and method to query the API"
                .to_string(),
        })
    }

    #[instrument(skip_all, fields(explicit = endpoints_needed.len()))]
    pub fn guide_implementation(
        &self,
        feature_description: &str,
        endpoints_needed: &[String],
    ) -> ToolResult<Guide> {
        require_source(&self.config.sources.api_spec_path)?;

        let api = self.api_spec();
        let guide = guide::build_guide(&api, feature_description, endpoints_needed);
        debug!(
            suggested = guide.suggested_endpoints.len(),
            tags = guide.relevant_tags.len(),
            "guide built"
        );
        Ok(guide)
    }

    // -----------------------------------------------------------------------
    // Text, web and rules
    // -----------------------------------------------------------------------

    /// Summarize `text`; `None` uses the configured default sentence count.
    pub fn summarize_text(&self, text: &str, max_sentences: Option<usize>) -> ToolResult<String> {
        let max = max_sentences.unwrap_or(self.config.summary.default_sentences);
        Ok(docdesk_summarizer::summarize(text, max)?)
    }

    /// Profile of the configured company page.
    #[instrument(skip(self), fields(url = %self.config.web.company_url))]
    pub async fn get_company_info(&self) -> ToolResult<CompanyInfo> {
        let info = docdesk_web::extract_company_info(
            &self.fetcher,
            &self.config.web.company_url,
            &self.config.summary,
        )
        .await?;
        Ok(info)
    }

    /// Read a rule file. A relative path that does not exist as given is
    /// looked up under the configured rules directory.
    #[instrument(skip_all, fields(path = %path.display(), sections = sections))]
    pub fn read_rule_file(&self, path: &Path, sections: bool) -> ToolResult<RuleFile> {
        let resolved = self.resolve_rule_path(path);
        Ok(docdesk_rules::read_rule_file(&resolved, sections)?)
    }

    fn resolve_rule_path(&self, path: &Path) -> PathBuf {
        if path.is_relative() && !path.exists() {
            let candidate = self.config.sources.rules_dir.join(path);
            if candidate.exists() {
                return candidate;
            }
        }
        path.to_path_buf()
    }

    /// Status of both indexes, for diagnostics.
    pub fn status(&self) -> Value {
        json!({
            "catalog": self.catalog().status(),
            "api_spec": self.api_spec().status(),
        })
    }
}

/// `NotFound` when the source document is absent.
fn require_source(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DocdeskError::not_found(path))
    }
}
