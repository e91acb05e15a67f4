//! Customer registry reader.
//!
//! Entries are list lines of the form
//! `- <name>, sinh năm <year>. <description>`; anything else is ignored.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use docdesk_shared::Result;

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"- ([^,\n]+), sinh năm (\d+)\. ([^\n]+)").expect("customer entry regex")
});

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub name: String,
    /// Kept as written in the registry.
    pub birth_year: String,
    pub description: String,
}

impl Customer {
    /// Case-insensitive substring match on the name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Read every entry of the registry at `path`.
///
/// Fails with `NotFound` when the file is absent.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_customers(path: &Path) -> Result<Vec<Customer>> {
    let content = docdesk_document::read_text(path)?;
    let customers = parse_customers(&content);
    debug!(customers = customers.len(), "customer registry parsed");
    Ok(customers)
}

/// Entries in registry order.
pub fn parse_customers(content: &str) -> Vec<Customer> {
    ENTRY_RE
        .captures_iter(content)
        .map(|caps| Customer {
            name: caps[1].to_string(),
            birth_year: caps[2].to_string(),
            description: caps[3].trim_end().to_string(),
        })
        .collect()
}
