//! Name-based tool invocation with JSON arguments.
//!
//! Argument shapes mirror the input schemas in [`crate::tools`].

use std::path::PathBuf;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;

use crate::error::{ToolError, ToolResult};
use crate::toolbox::Toolbox;

#[derive(Debug, Default, Deserialize)]
struct LookupComponentArgs {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryArgs {
    category: String,
}

#[derive(Debug, Default, Deserialize)]
struct CustomerArgs {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct QueryApiArgs {
    tag: Option<String>,
    search_query: Option<String>,
    path: Option<String>,
    method: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GuideArgs {
    feature_description: String,
    #[serde(default)]
    endpoints_needed: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SummarizeArgs {
    text: String,
    max_sentences: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RuleFileArgs {
    path: PathBuf,
    #[serde(default)]
    sections: bool,
}

impl Toolbox {
    /// Invoke the tool called `name` with JSON `args` and return its payload
    /// as JSON. Unknown tools and malformed arguments are `InvalidParams`.
    #[instrument(skip(self, args))]
    pub async fn call_tool(&self, name: &str, args: Value) -> ToolResult<Value> {
        match name {
            "lookup_component" => {
                let a: LookupComponentArgs = parse_args(name, args)?;
                to_value(self.lookup_component(a.name.as_deref())?)
            }
            "lookup_components_by_category" => {
                let a: CategoryArgs = parse_args(name, args)?;
                to_value(self.lookup_components_by_category(&a.category)?)
            }
            "get_customer_info" => {
                let a: CustomerArgs = parse_args(name, args)?;
                to_value(self.get_customer_info(a.name.as_deref())?)
            }
            "query_api" => {
                let a: QueryApiArgs = parse_args(name, args)?;
                to_value(self.query_api(
                    a.tag.as_deref(),
                    a.search_query.as_deref(),
                    a.path.as_deref(),
                    a.method.as_deref(),
                )?)
            }
            "guide_implementation" => {
                let a: GuideArgs = parse_args(name, args)?;
                to_value(self.guide_implementation(&a.feature_description, &a.endpoints_needed)?)
            }
            "summarize_text" => {
                let a: SummarizeArgs = parse_args(name, args)?;
                to_value(self.summarize_text(&a.text, a.max_sentences)?)
            }
            "get_company_info" => to_value(self.get_company_info().await?),
            "read_rule_file" => {
                let a: RuleFileArgs = parse_args(name, args)?;
                to_value(self.read_rule_file(&a.path, a.sections)?)
            }
            _ => Err(ToolError::invalid_params(format!("Unknown tool: {name}"))),
        }
    }
}

/// `null` stands for "no arguments".
fn parse_args<T: DeserializeOwned>(tool: &str, args: Value) -> ToolResult<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| ToolError::invalid_params(format!("Invalid arguments for {tool}: {e}")))
}

fn to_value<T: serde::Serialize>(payload: T) -> ToolResult<Value> {
    serde_json::to_value(payload)
        .map_err(|e| ToolError::internal(format!("Unexpected error: {e}")))
}
