//! HTTP API application wiring (Axum router + service wiring).
//!
//! This folder is structured like:
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use worklog_service::WorklogService;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String) -> Router {
    let auth_state = middleware::AuthState::new(jwt_secret.as_bytes());
    let service = Arc::new(WorklogService::new());

    // Protected routes: require an authenticated principal.
    let protected = routes::router()
        .layer(Extension(service))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
