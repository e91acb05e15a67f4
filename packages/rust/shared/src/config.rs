//! Application configuration for docdesk.
//!
//! User config lives at `~/.docdesk/docdesk.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocdeskError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docdesk.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docdesk";

// ---------------------------------------------------------------------------
// Config structs (matching docdesk.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Knowledge source locations.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Web fetch settings.
    #[serde(default)]
    pub web: WebConfig,

    /// Summarizer defaults.
    #[serde(default)]
    pub summary: SummaryConfig,
}

/// `[sources]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Design-system component catalog (JSON).
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// API specification (OpenAPI JSON).
    #[serde(default = "default_api_spec_path")]
    pub api_spec_path: PathBuf,

    /// Directory holding markdown rule files.
    #[serde(default = "default_rules_dir")]
    pub rules_dir: PathBuf,

    /// Customer registry (markdown).
    #[serde(default = "default_customers_path")]
    pub customers_path: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            api_spec_path: default_api_spec_path(),
            rules_dir: default_rules_dir(),
            customers_path: default_customers_path(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/components.json")
}
fn default_api_spec_path() -> PathBuf {
    PathBuf::from("data/openapi.json")
}
fn default_rules_dir() -> PathBuf {
    PathBuf::from("rules")
}
fn default_customers_path() -> PathBuf {
    PathBuf::from("docs/customers.md")
}

/// `[web]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Page inspected by the company-info tool.
    #[serde(default = "default_company_url")]
    pub company_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            company_url: default_company_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_company_url() -> String {
    "https://example.com/".into()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    concat!("docdesk/", env!("CARGO_PKG_VERSION")).into()
}

/// `[summary]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Sentences kept by `summarize` when the caller gives no count.
    #[serde(default = "default_sentences")]
    pub default_sentences: usize,

    /// Sentences kept in the company-info summary.
    #[serde(default = "default_sentences")]
    pub company_summary_sentences: usize,

    /// Characters of page text fed to the company-info summary.
    #[serde(default = "default_company_text_limit")]
    pub company_text_limit: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            default_sentences: default_sentences(),
            company_summary_sentences: default_sentences(),
            company_text_limit: default_company_text_limit(),
        }
    }
}

fn default_sentences() -> usize {
    3
}
fn default_company_text_limit() -> usize {
    10_000
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docdesk/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocdeskError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docdesk/docdesk.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocdeskError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocdeskError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DocdeskError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocdeskError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocdeskError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
