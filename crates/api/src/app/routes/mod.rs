use axum::Router;

pub mod access;
pub mod profile;
pub mod records;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .merge(access::router())
        .merge(profile::router())
        .merge(records::router())
}
