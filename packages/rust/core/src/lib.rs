//! Tool surface for docdesk.
//!
//! [`Toolbox`] owns the loaded indexes and the page fetcher and exposes every
//! boundary operation, either as typed methods or by name through
//! [`Toolbox::call_tool`]. Success payloads live in [`responses`]; failures
//! are reported as [`ToolError`] with a caller-facing code.

mod dispatch;
pub mod error;
pub mod guide;
pub mod responses;
pub mod toolbox;
pub mod tools;

pub use error::{ToolError, ToolErrorCode, ToolResult};
pub use responses::{ApiQuery, CategoryLookup, ComponentLookup, CustomerLookup, Guide};
pub use toolbox::Toolbox;
pub use tools::{ToolSpec, list_tools};

pub use docdesk_rules::{Customer, RuleFile, RuleSection};
pub use docdesk_web::{CompanyInfo, ContactInfo};
