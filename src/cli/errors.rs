//! CLI-specific error types

use std::fmt;
use std::io;

use crate::view::ViewError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (files, stdin/stdout)
    IoError,
    /// Malformed request on stdin
    InvalidRequest,
    /// View query failed
    QueryFailed,
    /// Design document rejected
    InvalidDesignDoc,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "VIEW_CLI_CONFIG_ERROR",
            Self::IoError => "VIEW_CLI_IO_ERROR",
            Self::InvalidRequest => "VIEW_CLI_INVALID_REQUEST",
            Self::QueryFailed => "VIEW_CLI_QUERY_FAILED",
            Self::InvalidDesignDoc => "VIEW_CLI_INVALID_DESIGN_DOC",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed request
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRequest, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ViewError> for CliError {
    fn from(e: ViewError) -> Self {
        let code = match e {
            ViewError::InvalidDesignDocument(_) | ViewError::UnsupportedLanguage(_) => {
                CliErrorCode::InvalidDesignDoc
            }
            _ => CliErrorCode::QueryFailed,
        };
        Self::new(code, format!("{} ({})", e, e.code()))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
