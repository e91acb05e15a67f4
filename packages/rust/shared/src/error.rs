//! Error types for docdesk.
//!
//! Library crates use [`DocdeskError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics, and the tool
//! surface in `docdesk-core` maps it onto caller-facing error codes.

use std::path::PathBuf;

/// Top-level error type for all docdesk operations.
#[derive(Debug, thiserror::Error)]
pub enum DocdeskError {
    /// An input file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Caller supplied an argument outside the accepted domain.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Document could not be decoded under any supported encoding.
    #[error("failed to decode {}: {message}", path.display())]
    DecodeFailure { path: PathBuf, message: String },

    /// Network/HTTP error or non-success status while fetching a page.
    #[error("fetch failed: {0}")]
    FetchFailure(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// HTML-to-text conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocdeskError>;

impl DocdeskError {
    /// Missing input file.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an invalid-argument error from any displayable message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: msg.into(),
        }
    }

    /// Create a decode error for the document at `path`.
    pub fn decode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::DecodeFailure {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
