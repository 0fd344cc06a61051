//! CLI-specific error types.

use thiserror::Error;

use crate::query::{QueryExecutionError, QueryParseError};

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors. All are fatal to the invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// stdin/stdout failure or malformed input
    #[error("I/O error: {0}")]
    Io(String),

    /// Query request failed validation
    #[error("{0}")]
    Parse(#[from] QueryParseError),

    /// Query execution failed
    #[error("{0}")]
    Execution(#[from] QueryExecutionError),

    /// HTTP server failed to start or crashed
    #[error("Server error: {0}")]
    Server(String),
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(format!("Invalid JSON: {}", e))
    }
}
