//! Descriptors of the tool operations, for a transport to register.

use serde::Serialize;
use serde_json::{Value, json};

/// Name, description and JSON input schema of one tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub fn list_tools() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "lookup_component",
            description: "Look up a design-system component by name (case-insensitive).",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Component name"}
                }
            }),
        },
        ToolSpec {
            name: "lookup_components_by_category",
            description: "List the design-system components in a category.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string", "description": "Category display name"}
                },
                "required": ["category"]
            }),
        },
        ToolSpec {
            name: "get_customer_info",
            description: "List customers from the registry, optionally filtered by a \
                          case-insensitive name substring.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Part of the customer name"}
                }
            }),
        },
        ToolSpec {
            name: "query_api",
            description: "Query the API specification by path and method, tag, or search text. \
                          With no arguments, returns an overview of the API.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "tag": {"type": "string"},
                    "search_query": {"type": "string"},
                    "path": {"type": "string"},
                    "method": {"type": "string"}
                }
            }),
        },
        ToolSpec {
            name: "guide_implementation",
            description: "Suggest endpoints, tags and steps for implementing a feature.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "feature_description": {"type": "string"},
                    "endpoints_needed": {
                        "type": "array",
                        "items": {"type": "string", "description": "\"METHOD /path\""}
                    }
                },
                "required": ["feature_description"]
            }),
        },
        ToolSpec {
            name: "summarize_text",
            description: "Extractive summary: the highest-scoring sentences in original order.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "text": {"type": "string"},
                    "max_sentences": {"type": "integer", "minimum": 1, "default": 3}
                },
                "required": ["text"]
            }),
        },
        ToolSpec {
            name: "get_company_info",
            description: "Fetch the configured company page and extract name, contacts, \
                          social links and a summary.",
            input_schema: json!({"type": "object", "properties": {}}),
        },
        ToolSpec {
            name: "read_rule_file",
            description: "Read the \"- \" rules of a markdown rule file, optionally grouped by \"## \" section.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "sections": {"type": "boolean", "default": false}
                },
                "required": ["path"]
            }),
        },
    ]
}
