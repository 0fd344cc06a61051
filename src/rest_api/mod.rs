//! # Query REST API Module
//!
//! Thin HTTP surface over the advanced query engine.

pub mod errors;
pub mod server;

pub use errors::{ApiError, ApiResult};
pub use server::ApiServer;
