//! # Advanced Query HTTP Server
//!
//! Axum-based HTTP surface for the query engine:
//! - `POST /api/v1/query`: parse and execute an advanced query
//! - `GET /health`: liveness probe
//!
//! The engine itself is synchronous; handlers call it directly. Each
//! request sees a fresh snapshot, so there is no shared mutable state.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::observability::Logger;
use crate::query::{execute_advanced_query, parse_advanced_query};
use crate::registry::FieldRegistry;
use crate::store::SnapshotStore;

use super::errors::{ApiError, ApiResult};

/// Query API server state.
pub struct ApiServer<S> {
    store: S,
    registry: FieldRegistry,
}

impl<S: SnapshotStore + Send + Sync + 'static> ApiServer<S> {
    pub fn new(store: S, registry: FieldRegistry) -> Self {
        Self { store, registry }
    }

    /// Builds the Axum router.
    pub fn router(self) -> Router {
        let state = Arc::new(self);

        Router::new()
            .route("/api/v1/query", post(query_handler))
            .route("/health", get(health_handler))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

/// Shared state type.
type ServerState<S> = Arc<ApiServer<S>>;

/// Advanced query handler: parse, execute, respond.
async fn query_handler<S: SnapshotStore + Send + Sync + 'static>(
    State(server): State<ServerState<S>>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let plan = parse_advanced_query(&body, &server.registry).map_err(|e| {
        Logger::warn("QUERY_REJECTED", &[("reason", &e.to_string())]);
        ApiError::from(e)
    })?;

    let response = execute_advanced_query(&plan, &server.store).map_err(|e| {
        Logger::error("QUERY_FAILED", &[("reason", &e.to_string())]);
        ApiError::from(e)
    })?;

    Logger::info(
        "QUERY_EXECUTED",
        &[
            ("format", plan.response_format.as_str()),
            (
                "total_matches",
                &response["query_metadata"]["total_matches"].to_string(),
            ),
        ],
    );
    Ok(Json(response))
}

/// Liveness probe.
async fn health_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_router_builds() {
        let server = ApiServer::new(MemoryStore::new(), FieldRegistry::with_default_aliases());
        let _router = server.router();
    }
}
