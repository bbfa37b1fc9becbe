use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use worklog_core::PrincipalId;
use worklog_service::WorklogService;

use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/profile", put(save).get(caller_profile))
        .route("/profiles/:principal", get(profile_of))
}

/// PUT /profile — upsert the caller's own profile.
pub async fn save(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::SaveProfileRequest>,
) -> axum::response::Response {
    match service.save_profile(principal.principal_id(), body.into_profile()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /profile — the caller's profile; `null` when not yet created.
pub async fn caller_profile(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match service.caller_profile(principal.principal_id()) {
        Ok(profile) => (
            StatusCode::OK,
            Json(serde_json::json!({ "profile": profile })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /profiles/:principal — cross-identity profile read (admin).
pub async fn profile_of(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(target): Path<String>,
) -> axum::response::Response {
    let target = match PrincipalId::from_str(&target) {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.profile_of(principal.principal_id(), target) {
        Ok(profile) => (
            StatusCode::OK,
            Json(serde_json::json!({ "profile": profile })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
