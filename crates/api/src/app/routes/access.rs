use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use worklog_core::PrincipalId;
use worklog_service::WorklogService;

use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/access/initialize", post(initialize))
        .route("/access/roles/:principal", put(assign_role))
        .route("/access/me", get(me))
}

/// POST /access/initialize — idempotent admin bootstrap.
pub async fn initialize(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    service.initialize_access_control(principal.principal_id());
    StatusCode::NO_CONTENT.into_response()
}

/// PUT /access/roles/:principal — reassign a principal's role (admin).
pub async fn assign_role(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(target): Path<String>,
    Json(body): Json<dto::AssignRoleRequest>,
) -> axum::response::Response {
    let target = match PrincipalId::from_str(&target) {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match service.assign_role(principal.principal_id(), target, body.role) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /access/me — the caller's identity and effective role.
pub async fn me(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let caller = principal.principal_id();
    let role = service.caller_role(caller);

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "principal_id": caller.to_string(),
            "role": role,
            "is_admin": service.is_caller_admin(caller),
        })),
    )
        .into_response()
}
