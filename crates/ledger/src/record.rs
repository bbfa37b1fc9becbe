use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use worklog_core::{DomainError, DomainResult};

use crate::month::MonthKey;
use crate::profile::UserProfile;

/// How a payment was made. Chosen by the caller, never derived by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Bank,
    Cash,
}

/// One payment against a monthly record.
///
/// The date doubles as the removal key and is unique within a record's
/// payment list (see [`MonthlyRecord::add_payment`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub date: DateTime<Utc>,
    /// Positive amount in smallest currency unit (cents).
    pub amount_cents: i64,
    pub payment_type: PaymentType,
}

/// Merge-patch input for the record upsert.
///
/// `None` means "omitted": on create the profile default applies, on update
/// the previously stored value is preserved. `Some(0)` is a real zero, not an
/// omission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RecordPatch {
    pub worked_hours: i64,
    pub hourly_rate_cents: Option<i64>,
    pub transport_allowance_cents: Option<i64>,
}

impl RecordPatch {
    fn validate(&self) -> DomainResult<()> {
        if self.worked_hours < 0 {
            return Err(DomainError::invalid_argument(
                "worked hours must not be negative",
            ));
        }
        if self.hourly_rate_cents.is_some_and(|v| v < 0) {
            return Err(DomainError::invalid_argument(
                "hourly rate must not be negative",
            ));
        }
        if self.transport_allowance_cents.is_some_and(|v| v < 0) {
            return Err(DomainError::invalid_argument(
                "transport allowance must not be negative",
            ));
        }
        Ok(())
    }
}

/// A principal's record for one month: worked hours, rate, allowance, and the
/// payments received against it.
///
/// The amount due is never stored; it is recomputed from its inputs on every
/// read (`total_due_cents`). Writes go through [`Self::create`] /
/// [`Self::update`], which validate fully before touching state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRecord {
    key: MonthKey,
    worked_hours: i64,
    hourly_rate_cents: i64,
    transport_allowance_cents: i64,
    payments: Vec<Payment>,
}

impl MonthlyRecord {
    /// Create a record from a patch, falling back to the owner's profile
    /// defaults (then 0) for omitted rate/allowance.
    pub fn create(
        key: MonthKey,
        patch: &RecordPatch,
        defaults: Option<&UserProfile>,
    ) -> DomainResult<Self> {
        patch.validate()?;

        let hourly_rate_cents = patch
            .hourly_rate_cents
            .or(defaults.map(|p| p.default_hourly_rate_cents))
            .unwrap_or(0);
        let transport_allowance_cents = patch
            .transport_allowance_cents
            .or(defaults.map(|p| p.default_transport_allowance_cents))
            .unwrap_or(0);

        compute_total_due(patch.worked_hours, hourly_rate_cents, transport_allowance_cents)?;

        Ok(Self {
            key,
            worked_hours: patch.worked_hours,
            hourly_rate_cents,
            transport_allowance_cents,
            payments: Vec::new(),
        })
    }

    /// Apply a patch to an existing record.
    ///
    /// Worked hours are always written; rate/allowance only when provided —
    /// omitted fields keep their stored values and do NOT re-read profile
    /// defaults. Nothing is written if validation fails.
    pub fn update(&mut self, patch: &RecordPatch) -> DomainResult<()> {
        patch.validate()?;

        let hourly_rate_cents = patch.hourly_rate_cents.unwrap_or(self.hourly_rate_cents);
        let transport_allowance_cents = patch
            .transport_allowance_cents
            .unwrap_or(self.transport_allowance_cents);

        compute_total_due(patch.worked_hours, hourly_rate_cents, transport_allowance_cents)?;

        self.worked_hours = patch.worked_hours;
        self.hourly_rate_cents = hourly_rate_cents;
        self.transport_allowance_cents = transport_allowance_cents;
        Ok(())
    }

    pub fn key(&self) -> MonthKey {
        self.key
    }

    pub fn worked_hours(&self) -> i64 {
        self.worked_hours
    }

    pub fn hourly_rate_cents(&self) -> i64 {
        self.hourly_rate_cents
    }

    pub fn transport_allowance_cents(&self) -> i64 {
        self.transport_allowance_cents
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    /// Amount due for the month, recomputed from its inputs on every call.
    ///
    /// The multiplication cannot overflow: `create`/`update` reject inputs
    /// whose product would not fit an `i64`.
    pub fn total_due_cents(&self) -> i64 {
        self.worked_hours * self.hourly_rate_cents + self.transport_allowance_cents
    }

    pub fn total_paid_cents(&self) -> i64 {
        self.payments.iter().map(|p| p.amount_cents).sum()
    }

    /// May be negative when the record is overpaid.
    pub fn remaining_cents(&self) -> i64 {
        self.total_due_cents() - self.total_paid_cents()
    }

    /// Settled means exactly zero remaining; overpayment does not qualify.
    pub fn is_settled(&self) -> bool {
        self.remaining_cents() == 0
    }

    /// Append a payment dated `now`.
    ///
    /// The date is the removal key, so it must be unique within this record:
    /// a colliding date is perturbed forward 1ns until free.
    pub fn add_payment(
        &mut self,
        amount_cents: i64,
        payment_type: PaymentType,
        now: DateTime<Utc>,
    ) -> DomainResult<Payment> {
        if amount_cents <= 0 {
            return Err(DomainError::invalid_argument(
                "payment amount must be positive",
            ));
        }
        self.total_paid_cents()
            .checked_add(amount_cents)
            .ok_or_else(|| DomainError::invalid_argument("payment total overflow"))?;

        let mut date = now;
        while self.payments.iter().any(|p| p.date == date) {
            date += Duration::nanoseconds(1);
        }

        let payment = Payment {
            date,
            amount_cents,
            payment_type,
        };
        self.payments.push(payment);
        Ok(payment)
    }

    /// Remove the single payment whose date matches exactly.
    pub fn remove_payment(&mut self, date: DateTime<Utc>) -> DomainResult<()> {
        let idx = self
            .payments
            .iter()
            .position(|p| p.date == date)
            .ok_or(DomainError::NotFound)?;
        self.payments.remove(idx);
        Ok(())
    }
}

fn compute_total_due(hours: i64, rate: i64, allowance: i64) -> DomainResult<i64> {
    hours
        .checked_mul(rate)
        .and_then(|due| due.checked_add(allowance))
        .ok_or_else(|| DomainError::invalid_argument("amount due overflow"))
}
