use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

use worklog_core::{DomainError, DomainResult, PrincipalId};

use crate::month::MonthKey;
use crate::profile::UserProfile;
use crate::record::{MonthlyRecord, Payment, PaymentType, RecordPatch};

/// Derived per-month balance projection, computed at read time — never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub month: u32,
    pub year: i32,
    pub total_due_cents: i64,
    pub total_paid_cents: i64,
    pub remaining_cents: i64,
}

impl MonthSummary {
    fn of(record: &MonthlyRecord) -> Self {
        Self {
            month: record.key().month(),
            year: record.key().year(),
            total_due_cents: record.total_due_cents(),
            total_paid_cents: record.total_paid_cents(),
            remaining_cents: record.remaining_cents(),
        }
    }
}

/// Identity-scoped store of monthly records.
///
/// Every mutating entry point validates first, then mutates, inside one
/// write-lock scope: a failed call leaves state unchanged, and concurrent
/// calls against the same key serialize on the lock (a record can never be
/// deleted and paid against in an interleaved way).
#[derive(Debug, Default)]
pub struct LedgerStore {
    inner: RwLock<HashMap<(PrincipalId, MonthKey), MonthlyRecord>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-or-update the record for `key`.
    ///
    /// On create, omitted rate/allowance fall back to `defaults` (the owner's
    /// profile) and then 0. On update, omitted fields preserve stored values.
    pub fn upsert_record(
        &self,
        owner: PrincipalId,
        key: MonthKey,
        patch: &RecordPatch,
        defaults: Option<&UserProfile>,
    ) -> DomainResult<()> {
        let mut map = self.inner.write().expect("ledger store lock poisoned");
        match map.get_mut(&(owner, key)) {
            Some(record) => record.update(patch),
            None => {
                let record = MonthlyRecord::create(key, patch, defaults)?;
                map.insert((owner, key), record);
                Ok(())
            }
        }
    }

    /// Append a payment dated `now` to an existing record.
    pub fn add_payment(
        &self,
        owner: PrincipalId,
        key: MonthKey,
        amount_cents: i64,
        payment_type: PaymentType,
        now: DateTime<Utc>,
    ) -> DomainResult<Payment> {
        let mut map = self.inner.write().expect("ledger store lock poisoned");
        let record = map.get_mut(&(owner, key)).ok_or(DomainError::NotFound)?;
        record.add_payment(amount_cents, payment_type, now)
    }

    /// Remove the payment matching `date` exactly.
    pub fn delete_payment(
        &self,
        owner: PrincipalId,
        key: MonthKey,
        date: DateTime<Utc>,
    ) -> DomainResult<()> {
        let mut map = self.inner.write().expect("ledger store lock poisoned");
        let record = map.get_mut(&(owner, key)).ok_or(DomainError::NotFound)?;
        record.remove_payment(date)
    }

    /// Delete a record and its payments. Permitted only when the balance is
    /// settled to exactly zero remaining (overpayment blocks deletion too).
    pub fn delete_record(&self, owner: PrincipalId, key: MonthKey) -> DomainResult<()> {
        let mut map = self.inner.write().expect("ledger store lock poisoned");
        let record = map.get(&(owner, key)).ok_or(DomainError::NotFound)?;
        if !record.is_settled() {
            return Err(DomainError::conflict("unpaid balance"));
        }
        map.remove(&(owner, key));
        Ok(())
    }

    pub fn record(&self, owner: PrincipalId, key: MonthKey) -> DomainResult<MonthlyRecord> {
        let map = self.inner.read().expect("ledger store lock poisoned");
        map.get(&(owner, key)).cloned().ok_or(DomainError::NotFound)
    }

    /// Every record owned by `owner`. No ordering guarantee.
    pub fn records(&self, owner: PrincipalId) -> Vec<MonthlyRecord> {
        let map = self.inner.read().expect("ledger store lock poisoned");
        map.iter()
            .filter_map(|((o, _), record)| (*o == owner).then(|| record.clone()))
            .collect()
    }

    pub fn payments(&self, owner: PrincipalId, key: MonthKey) -> DomainResult<Vec<Payment>> {
        let map = self.inner.read().expect("ledger store lock poisoned");
        map.get(&(owner, key))
            .map(|record| record.payments().to_vec())
            .ok_or(DomainError::NotFound)
    }

    /// False when the record is absent or has no payments.
    pub fn has_payments(&self, owner: PrincipalId, key: MonthKey) -> bool {
        let map = self.inner.read().expect("ledger store lock poisoned");
        map.get(&(owner, key))
            .is_some_and(|record| !record.payments().is_empty())
    }

    pub fn summary(&self, owner: PrincipalId, key: MonthKey) -> DomainResult<MonthSummary> {
        let map = self.inner.read().expect("ledger store lock poisoned");
        map.get(&(owner, key))
            .map(MonthSummary::of)
            .ok_or(DomainError::NotFound)
    }

    /// One summary per owned record, all computed under a single read lock so
    /// the list is consistent with itself.
    pub fn summaries(&self, owner: PrincipalId) -> Vec<MonthSummary> {
        let map = self.inner.read().expect("ledger store lock poisoned");
        map.iter()
            .filter_map(|((o, _), record)| (*o == owner).then(|| MonthSummary::of(record)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn key(month: u32, year: i32) -> MonthKey {
        MonthKey::new(month, year).unwrap()
    }

    fn patch(hours: i64, rate: Option<i64>, allowance: Option<i64>) -> RecordPatch {
        RecordPatch {
            worked_hours: hours,
            hourly_rate_cents: rate,
            transport_allowance_cents: allowance,
        }
    }

    #[test]
    fn settled_record_can_be_deleted() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();
        let march = key(3, 2025);

        store
            .upsert_record(owner, march, &patch(160, Some(1500), Some(5000)), None)
            .unwrap();
        assert_eq!(store.record(owner, march).unwrap().total_due_cents(), 245_000);

        store
            .add_payment(owner, march, 245_000, PaymentType::Bank, Utc::now())
            .unwrap();
        assert_eq!(store.summary(owner, march).unwrap().remaining_cents, 0);

        store.delete_record(owner, march).unwrap();
        assert_eq!(store.record(owner, march).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn partially_paid_record_cannot_be_deleted() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();
        let march = key(3, 2025);

        store
            .upsert_record(owner, march, &patch(160, Some(1500), Some(5000)), None)
            .unwrap();
        store
            .add_payment(owner, march, 100_000, PaymentType::Bank, Utc::now())
            .unwrap();

        assert_eq!(store.summary(owner, march).unwrap().remaining_cents, 145_000);
        let err = store.delete_record(owner, march).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // The record survives the failed deletion.
        assert!(store.record(owner, march).is_ok());
    }

    #[test]
    fn overpaid_record_cannot_be_deleted() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();
        let june = key(6, 2025);

        store
            .upsert_record(owner, june, &patch(1, Some(100), Some(0)), None)
            .unwrap();
        store
            .add_payment(owner, june, 150, PaymentType::Cash, Utc::now())
            .unwrap();

        assert_eq!(store.summary(owner, june).unwrap().remaining_cents, -50);
        assert!(matches!(
            store.delete_record(owner, june).unwrap_err(),
            DomainError::Conflict(_)
        ));
    }

    #[test]
    fn payment_against_absent_record_is_not_found() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();

        let err = store
            .add_payment(owner, key(1, 2025), 100, PaymentType::Bank, Utc::now())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn deleted_payment_is_reflected_in_the_next_summary() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();
        let march = key(3, 2025);

        store
            .upsert_record(owner, march, &patch(160, Some(1500), Some(5000)), None)
            .unwrap();
        let payment = store
            .add_payment(owner, march, 45_000, PaymentType::Bank, Utc::now())
            .unwrap();

        let wrong_date = payment.date + chrono::Duration::seconds(1);
        assert_eq!(
            store.delete_payment(owner, march, wrong_date).unwrap_err(),
            DomainError::NotFound
        );

        store.delete_payment(owner, march, payment.date).unwrap();
        let summary = store.summary(owner, march).unwrap();
        assert_eq!(summary.total_paid_cents, 0);
        assert_eq!(summary.remaining_cents, summary.total_due_cents);
    }

    #[test]
    fn upsert_round_trips_and_preserves_on_second_pass() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();
        let may = key(5, 2025);

        store
            .upsert_record(owner, may, &patch(160, Some(1500), Some(5000)), None)
            .unwrap();
        let first = store.record(owner, may).unwrap();
        assert_eq!(first.worked_hours(), 160);
        assert_eq!(first.hourly_rate_cents(), 1500);
        assert_eq!(first.transport_allowance_cents(), 5000);

        store
            .upsert_record(owner, may, &patch(172, None, None), None)
            .unwrap();
        let second = store.record(owner, may).unwrap();
        assert_eq!(second.worked_hours(), 172);
        assert_eq!(second.hourly_rate_cents(), 1500);
        assert_eq!(second.transport_allowance_cents(), 5000);
    }

    #[test]
    fn records_are_identity_scoped() {
        let store = LedgerStore::new();
        let a = PrincipalId::new();
        let b = PrincipalId::new();
        let march = key(3, 2025);

        store
            .upsert_record(a, march, &patch(160, Some(1500), None), None)
            .unwrap();

        assert_eq!(store.record(b, march).unwrap_err(), DomainError::NotFound);
        assert!(store.records(b).is_empty());
        assert_eq!(store.records(a).len(), 1);
    }

    #[test]
    fn has_payments_reports_existence_only() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();
        let march = key(3, 2025);

        assert!(!store.has_payments(owner, march));

        store
            .upsert_record(owner, march, &patch(160, Some(1500), None), None)
            .unwrap();
        assert!(!store.has_payments(owner, march));

        store
            .add_payment(owner, march, 100, PaymentType::Bank, Utc::now())
            .unwrap();
        assert!(store.has_payments(owner, march));
    }

    #[test]
    fn summaries_cover_every_owned_record() {
        let store = LedgerStore::new();
        let owner = PrincipalId::new();

        for month in 1..=4 {
            store
                .upsert_record(owner, key(month, 2025), &patch(10, Some(100), Some(0)), None)
                .unwrap();
        }

        let summaries = store.summaries(owner);
        assert_eq!(summaries.len(), 4);
        assert!(summaries.iter().all(|s| s.total_due_cents == 1000));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: zero remaining is necessary and sufficient for deletion.
        #[test]
        fn delete_succeeds_iff_settled(
            hours in 1i64..500,
            rate in 1i64..10_000,
            paid_fraction in 0u32..=2,
        ) {
            let store = LedgerStore::new();
            let owner = PrincipalId::new();
            let month = key(7, 2025);

            store
                .upsert_record(owner, month, &patch(hours, Some(rate), Some(0)), None)
                .unwrap();
            let due = store.record(owner, month).unwrap().total_due_cents();

            // 0 => unpaid, 1 => exactly settled, 2 => overpaid.
            let paid = match paid_fraction {
                0 => 0,
                1 => due,
                _ => due + 1,
            };
            if paid > 0 {
                store
                    .add_payment(owner, month, paid, PaymentType::Bank, Utc::now())
                    .unwrap();
            }

            let remaining = store.summary(owner, month).unwrap().remaining_cents;
            let deleted = store.delete_record(owner, month);
            prop_assert_eq!(remaining == 0, deleted.is_ok());
        }
    }
}
