use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};

use worklog_ledger::MonthKey;
use worklog_service::WorklogService;

use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/records", get(list_records))
        .route("/records/summaries", get(list_summaries))
        .route(
            "/records/:year/:month",
            put(upsert_record).get(get_record).delete(delete_record),
        )
        .route("/records/:year/:month/summary", get(get_summary))
        .route(
            "/records/:year/:month/payments",
            post(add_payment).get(list_payments),
        )
        .route("/records/:year/:month/payments/exists", get(has_payments))
        .route(
            "/records/:year/:month/payments/:date_nanos",
            delete(delete_payment),
        )
}

fn month_key(year: i32, month: u32) -> Result<MonthKey, axum::response::Response> {
    MonthKey::new(month, year).map_err(errors::domain_error_to_response)
}

/// PUT /records/:year/:month — create-or-update the caller's record.
pub async fn upsert_record(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month)): Path<(i32, u32)>,
    Json(body): Json<dto::UpsertRecordRequest>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.upsert_record(principal.principal_id(), key, &body.into_patch()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /records/:year/:month
pub async fn get_record(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.record(principal.principal_id(), key) {
        Ok(record) => (StatusCode::OK, Json(dto::record_to_json(&record))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// DELETE /records/:year/:month — only when the balance is settled.
pub async fn delete_record(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.delete_record(principal.principal_id(), key) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /records
pub async fn list_records(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match service.all_records(principal.principal_id()) {
        Ok(records) => {
            let items = records.iter().map(dto::record_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /records/summaries — due/paid/remaining per owned record.
pub async fn list_summaries(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match service.all_summaries(principal.principal_id()) {
        Ok(summaries) => {
            (StatusCode::OK, Json(serde_json::json!({ "items": summaries }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /records/:year/:month/summary
pub async fn get_summary(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.summary(principal.principal_id(), key) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// POST /records/:year/:month/payments
pub async fn add_payment(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month)): Path<(i32, u32)>,
    Json(body): Json<dto::AddPaymentRequest>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.add_payment(
        principal.principal_id(),
        key,
        body.amount_cents,
        body.payment_type,
    ) {
        Ok(payment) => (StatusCode::OK, Json(dto::payment_to_json(&payment))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /records/:year/:month/payments
pub async fn list_payments(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.payments_for_month(principal.principal_id(), key) {
        Ok(payments) => {
            let items = payments.iter().map(dto::payment_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// GET /records/:year/:month/payments/exists — lets callers pick a default
/// payment type for the next payment (first vs subsequent is client policy).
pub async fn has_payments(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month)): Path<(i32, u32)>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.has_payments(principal.principal_id(), key) {
        Ok(exists) => {
            (StatusCode::OK, Json(serde_json::json!({ "exists": exists }))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// DELETE /records/:year/:month/payments/:date_nanos — exact-date removal.
pub async fn delete_payment(
    Extension(service): Extension<Arc<WorklogService>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((year, month, date_nanos)): Path<(i32, u32, i64)>,
) -> axum::response::Response {
    let key = match month_key(year, month) {
        Ok(k) => k,
        Err(resp) => return resp,
    };

    match service.delete_payment(
        principal.principal_id(),
        key,
        dto::date_from_nanos(date_nanos),
    ) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
