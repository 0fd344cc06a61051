//! # REST API Errors
//!
//! Error types for the HTTP layer. Parse failures are client errors,
//! execution failures are server errors; both serialize as JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::query::{QueryExecutionError, QueryParseError};

/// Result type for REST operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// REST API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid query request (4xx).
    #[error("{0}")]
    Parse(#[from] QueryParseError),

    /// Query execution failure (5xx).
    #[error("{0}")]
    Execution(#[from] QueryExecutionError),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Parse(_) => StatusCode::BAD_REQUEST,
            ApiError::Execution(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Parse(_) => "QUERY_PARSE_ERROR",
            ApiError::Execution(_) => "QUERY_EXECUTION_ERROR",
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    success: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
            success: false,
        };
        (self.status_code(), Json(body)).into_response()
    }
}
