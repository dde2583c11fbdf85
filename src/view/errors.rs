//! View query errors
//!
//! Error codes:
//! - VIEW_UNSUPPORTED_OPERATION
//! - VIEW_UNSUPPORTED_REDUCE_FUNCTION
//! - VIEW_DOCUMENT_FETCH_FAILED
//! - VIEW_DOCUMENT_DECODE_FAILED
//! - VIEW_REDUCE_FAILED
//! - VIEW_INVALID_GROUP_KEY
//! - VIEW_INVALID_PARAMETER
//! - VIEW_INVALID_DESIGN_DOC
//! - VIEW_UNSUPPORTED_LANGUAGE

use serde_json::Value;
use thiserror::Error;

use crate::storage::DocumentSourceError;

/// Result type for view query operations
pub type QueryResult<T> = Result<T, ViewError>;

/// Errors raised while processing a view query
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Unsupported reduce function {0:?}: only _count and _sum are available")]
    UnsupportedReduceFunction(String),

    #[error("Failed to fetch document {id:?}: {source}")]
    DocumentFetchFailed {
        id: String,
        #[source]
        source: DocumentSourceError,
    },

    #[error("Failed to decode document {id:?}: {source}")]
    DocumentDecodeFailed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Reduce function {function} failed: {reason}")]
    ReduceFailed { function: String, reason: String },

    #[error("group_level={level} requires array keys, got {key}")]
    GroupKeyNotArray { level: usize, key: Value },

    #[error("Invalid query parameter {name:?}: expected {expected}, got {found}")]
    InvalidParameter {
        name: String,
        expected: &'static str,
        found: Value,
    },

    #[error("Invalid design document: {0}")]
    InvalidDesignDocument(String),

    #[error("Design documents don't support language {0:?}")]
    UnsupportedLanguage(String),
}

impl ViewError {
    /// Creates a reduce failure for the named function
    pub fn reduce_failed(function: impl Into<String>, reason: impl Into<String>) -> Self {
        ViewError::ReduceFailed {
            function: function.into(),
            reason: reason.into(),
        }
    }

    /// Creates a parameter type mismatch error
    pub fn invalid_parameter(name: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        ViewError::InvalidParameter {
            name: name.into(),
            expected,
            found: found.clone(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ViewError::UnsupportedOperation(_) => "VIEW_UNSUPPORTED_OPERATION",
            ViewError::UnsupportedReduceFunction(_) => "VIEW_UNSUPPORTED_REDUCE_FUNCTION",
            ViewError::DocumentFetchFailed { .. } => "VIEW_DOCUMENT_FETCH_FAILED",
            ViewError::DocumentDecodeFailed { .. } => "VIEW_DOCUMENT_DECODE_FAILED",
            ViewError::ReduceFailed { .. } => "VIEW_REDUCE_FAILED",
            ViewError::GroupKeyNotArray { .. } => "VIEW_INVALID_GROUP_KEY",
            ViewError::InvalidParameter { .. } => "VIEW_INVALID_PARAMETER",
            ViewError::InvalidDesignDocument(_) => "VIEW_INVALID_DESIGN_DOC",
            ViewError::UnsupportedLanguage(_) => "VIEW_UNSUPPORTED_LANGUAGE",
        }
    }

    /// Returns true if the caller's request caused the error.
    ///
    /// Fetch and decode failures come from the document source; everything
    /// else is rejected input.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ViewError::DocumentFetchFailed { .. } | ViewError::DocumentDecodeFailed { .. }
        )
    }
}
