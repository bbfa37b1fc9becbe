use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;

use worklog_auth::Role;
use worklog_ledger::{MonthlyRecord, Payment, PaymentType, RecordPatch, UserProfile};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpsertRecordRequest {
    pub worked_hours: i64,
    pub hourly_rate_cents: Option<i64>,
    pub transport_allowance_cents: Option<i64>,
}

impl UpsertRecordRequest {
    pub fn into_patch(self) -> RecordPatch {
        RecordPatch {
            worked_hours: self.worked_hours,
            hourly_rate_cents: self.hourly_rate_cents,
            transport_allowance_cents: self.transport_allowance_cents,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPaymentRequest {
    pub amount_cents: i64,
    pub payment_type: PaymentType,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    pub name: String,
    pub default_hourly_rate_cents: i64,
    pub default_transport_allowance_cents: i64,
}

impl SaveProfileRequest {
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            name: self.name,
            default_hourly_rate_cents: self.default_hourly_rate_cents,
            default_transport_allowance_cents: self.default_transport_allowance_cents,
        }
    }
}

// -------------------------
// Response mapping
// -------------------------

/// Payment dates cross the wire as integer nanosecond epoch values — the
/// date is the deletion key, so the representation must round-trip exactly.
pub fn date_to_nanos(date: DateTime<Utc>) -> i64 {
    date.timestamp_nanos_opt().unwrap_or_default()
}

pub fn date_from_nanos(nanos: i64) -> DateTime<Utc> {
    Utc.timestamp_nanos(nanos)
}

pub fn payment_to_json(payment: &Payment) -> serde_json::Value {
    json!({
        "date_nanos": date_to_nanos(payment.date),
        "amount_cents": payment.amount_cents,
        "payment_type": payment.payment_type,
    })
}

pub fn record_to_json(record: &MonthlyRecord) -> serde_json::Value {
    json!({
        "month": record.key().month(),
        "year": record.key().year(),
        "worked_hours": record.worked_hours(),
        "hourly_rate_cents": record.hourly_rate_cents(),
        "transport_allowance_cents": record.transport_allowance_cents(),
        "total_due_cents": record.total_due_cents(),
        "payments": record.payments().iter().map(payment_to_json).collect::<Vec<_>>(),
    })
}
