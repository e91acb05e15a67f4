//! Success payloads of the tool operations.
//!
//! Variants serialize untagged, so each payload is a plain JSON object whose
//! keys identify which outcome occurred.

use serde::Serialize;
use serde_json::Value;

use docdesk_index::ResolvedEndpoint;
use docdesk_rules::Customer;
use docdesk_shared::{Component, EndpointSummary};

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ComponentLookup {
    Found { component: Component },
    Message { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CategoryLookup {
    Found { components: Vec<Component> },
    Message { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CustomerLookup {
    Found { customers: Vec<Customer> },
    Message { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ApiQuery {
    /// Full operation object for one `(path, method)`.
    Endpoint { endpoint: Value },
    ByTag {
        tag: String,
        endpoints: Vec<EndpointSummary>,
    },
    Search {
        search_query: String,
        endpoints: Vec<EndpointSummary>,
    },
    /// No selector given: what the API offers.
    Overview {
        api_info: Value,
        available_tags: Vec<String>,
        message: String,
    },
    Message { message: String },
}

/// Implementation guidance for a feature description.
#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub feature: String,
    pub best_practices: Vec<String>,
    pub implementation_steps: Vec<String>,
    pub relevant_tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggested_endpoints: Vec<EndpointSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub specific_endpoints: Vec<ResolvedEndpoint>,
}

impl ComponentLookup {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message { message } => Some(message.as_str()),
            Self::Found { .. } => None,
        }
    }
}

impl CategoryLookup {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message { message } => Some(message.as_str()),
            Self::Found { .. } => None,
        }
    }
}

impl CustomerLookup {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message { message } => Some(message.as_str()),
            Self::Found { .. } => None,
        }
    }
}

impl ApiQuery {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message { message } | Self::Overview { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }
}
