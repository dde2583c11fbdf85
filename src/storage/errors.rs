//! Document source errors

use thiserror::Error;

/// Result type for document source operations
pub type SourceResult<T> = Result<T, DocumentSourceError>;

/// Errors reported by a document source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentSourceError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Document source unavailable: {0}")]
    Unavailable(String),
}

impl DocumentSourceError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DocumentSourceError::NotFound(_) => "VIEW_SOURCE_NOT_FOUND",
            DocumentSourceError::Unavailable(_) => "VIEW_SOURCE_UNAVAILABLE",
        }
    }
}
