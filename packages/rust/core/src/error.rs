//! Caller-facing error payload for tool operations.

use serde::Serialize;

use docdesk_shared::DocdeskError;

/// Error category reported to the tool caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorCode {
    /// The caller's arguments were rejected.
    InvalidParams,
    /// The operation failed for reasons outside the caller's control.
    InternalError,
}

/// Structured failure returned by every tool operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    pub code: ToolErrorCode,
    pub message: String,
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;

impl ToolError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: ToolErrorCode::InvalidParams,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: ToolErrorCode::InternalError,
            message: message.into(),
        }
    }
}

impl From<DocdeskError> for ToolError {
    fn from(err: DocdeskError) -> Self {
        match err {
            DocdeskError::InvalidArgument { message } => Self::invalid_params(message),
            e @ (DocdeskError::NotFound { .. } | DocdeskError::FetchFailure(_)) => {
                Self::internal(e.to_string())
            }
            other => Self::internal(format!("Unexpected error: {other}")),
        }
    }
}
