use chrono::{DateTime, Utc};

use worklog_auth::{AccessControl, Role, ensure_admin, ensure_user};
use worklog_core::{DomainResult, PrincipalId};
use worklog_ledger::{
    LedgerStore, MonthKey, MonthSummary, MonthlyRecord, Payment, PaymentType, ProfileStore,
    RecordPatch, UserProfile,
};

/// The full operation surface, auth-gated per call.
///
/// Authorization policy:
/// - `initialize_access_control`, `caller_role`, `is_caller_admin`: any caller.
/// - self-scoped profile/record operations: role ≥ user.
/// - `assign_role`, `profile_of` (cross-identity read): admin.
#[derive(Debug, Default)]
pub struct WorklogService {
    access: AccessControl,
    profiles: ProfileStore,
    ledger: LedgerStore,
}

impl WorklogService {
    pub fn new() -> Self {
        Self::default()
    }

    // ── access control ──────────────────────────────────────────────────────

    /// Idempotent bootstrap; the first caller becomes admin.
    pub fn initialize_access_control(&self, caller: PrincipalId) {
        self.access.initialize(caller);
    }

    pub fn assign_role(
        &self,
        caller: PrincipalId,
        target: PrincipalId,
        role: Role,
    ) -> DomainResult<()> {
        self.access.assign_role(caller, target, role)
    }

    pub fn caller_role(&self, caller: PrincipalId) -> Role {
        self.access.role_of(caller)
    }

    pub fn is_caller_admin(&self, caller: PrincipalId) -> bool {
        self.access.is_admin(caller)
    }

    // ── profiles ────────────────────────────────────────────────────────────

    pub fn save_profile(&self, caller: PrincipalId, profile: UserProfile) -> DomainResult<()> {
        ensure_user(self.access.role_of(caller))?;
        self.profiles.save(caller, profile)?;
        tracing::info!(principal = %caller, "profile saved");
        Ok(())
    }

    /// The caller's own profile; `None` means "not yet created".
    pub fn caller_profile(&self, caller: PrincipalId) -> DomainResult<Option<UserProfile>> {
        ensure_user(self.access.role_of(caller))?;
        Ok(self.profiles.get(caller))
    }

    /// Cross-identity profile read. Admin-only.
    pub fn profile_of(
        &self,
        caller: PrincipalId,
        target: PrincipalId,
    ) -> DomainResult<Option<UserProfile>> {
        ensure_admin(self.access.role_of(caller))?;
        Ok(self.profiles.get(target))
    }

    // ── records ─────────────────────────────────────────────────────────────

    pub fn upsert_record(
        &self,
        caller: PrincipalId,
        key: MonthKey,
        patch: &RecordPatch,
    ) -> DomainResult<()> {
        ensure_user(self.access.role_of(caller))?;
        let defaults = self.profiles.get(caller);
        self.ledger.upsert_record(caller, key, patch, defaults.as_ref())?;
        tracing::info!(principal = %caller, month = %key, "monthly record upserted");
        Ok(())
    }

    pub fn delete_record(&self, caller: PrincipalId, key: MonthKey) -> DomainResult<()> {
        ensure_user(self.access.role_of(caller))?;
        self.ledger.delete_record(caller, key)?;
        tracing::info!(principal = %caller, month = %key, "monthly record deleted");
        Ok(())
    }

    pub fn record(&self, caller: PrincipalId, key: MonthKey) -> DomainResult<MonthlyRecord> {
        ensure_user(self.access.role_of(caller))?;
        self.ledger.record(caller, key)
    }

    pub fn all_records(&self, caller: PrincipalId) -> DomainResult<Vec<MonthlyRecord>> {
        ensure_user(self.access.role_of(caller))?;
        Ok(self.ledger.records(caller))
    }

    pub fn all_summaries(&self, caller: PrincipalId) -> DomainResult<Vec<MonthSummary>> {
        ensure_user(self.access.role_of(caller))?;
        Ok(self.ledger.summaries(caller))
    }

    pub fn summary(&self, caller: PrincipalId, key: MonthKey) -> DomainResult<MonthSummary> {
        ensure_user(self.access.role_of(caller))?;
        self.ledger.summary(caller, key)
    }

    // ── payments ────────────────────────────────────────────────────────────

    /// Append a payment dated now. The payment type is the caller's choice;
    /// the store never derives it.
    pub fn add_payment(
        &self,
        caller: PrincipalId,
        key: MonthKey,
        amount_cents: i64,
        payment_type: PaymentType,
    ) -> DomainResult<Payment> {
        self.add_payment_at(caller, key, amount_cents, payment_type, Utc::now())
    }

    /// Like [`Self::add_payment`] with an explicit timestamp (tests).
    pub fn add_payment_at(
        &self,
        caller: PrincipalId,
        key: MonthKey,
        amount_cents: i64,
        payment_type: PaymentType,
        now: DateTime<Utc>,
    ) -> DomainResult<Payment> {
        ensure_user(self.access.role_of(caller))?;
        let payment = self
            .ledger
            .add_payment(caller, key, amount_cents, payment_type, now)?;
        tracing::info!(principal = %caller, month = %key, amount_cents, "payment added");
        Ok(payment)
    }

    pub fn delete_payment(
        &self,
        caller: PrincipalId,
        key: MonthKey,
        date: DateTime<Utc>,
    ) -> DomainResult<()> {
        ensure_user(self.access.role_of(caller))?;
        self.ledger.delete_payment(caller, key, date)?;
        tracing::info!(principal = %caller, month = %key, "payment deleted");
        Ok(())
    }

    pub fn has_payments(&self, caller: PrincipalId, key: MonthKey) -> DomainResult<bool> {
        ensure_user(self.access.role_of(caller))?;
        Ok(self.ledger.has_payments(caller, key))
    }

    pub fn payments_for_month(
        &self,
        caller: PrincipalId,
        key: MonthKey,
    ) -> DomainResult<Vec<Payment>> {
        ensure_user(self.access.role_of(caller))?;
        self.ledger.payments(caller, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_core::DomainError;

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

    fn profile(name: &str, rate: i64, allowance: i64) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            default_hourly_rate_cents: rate,
            default_transport_allowance_cents: allowance,
        }
    }

    /// A service with a bootstrapped admin and a regular user.
    fn bootstrapped() -> (WorklogService, PrincipalId, PrincipalId) {
        let service = WorklogService::new();
        let admin = PrincipalId::new();
        let user = PrincipalId::new();
        service.initialize_access_control(admin);
        (service, admin, user)
    }

    #[test]
    fn guests_are_rejected_from_all_gated_operations() {
        let service = WorklogService::new();
        let guest = PrincipalId::new();
        let march = key(3, 2025);

        assert_eq!(service.caller_role(guest), Role::Guest);
        assert_eq!(
            service.save_profile(guest, profile("g", 0, 0)).unwrap_err(),
            DomainError::Unauthorized
        );
        assert_eq!(service.caller_profile(guest).unwrap_err(), DomainError::Unauthorized);
        assert_eq!(
            service.upsert_record(guest, march, &patch(1, None, None)).unwrap_err(),
            DomainError::Unauthorized
        );
        assert_eq!(service.all_records(guest).unwrap_err(), DomainError::Unauthorized);
        assert_eq!(
            service.add_payment(guest, march, 100, PaymentType::Bank).unwrap_err(),
            DomainError::Unauthorized
        );
    }

    #[test]
    fn cross_identity_profile_read_is_admin_only() {
        let (service, admin, user) = bootstrapped();
        service.save_profile(user, profile("Mira", 1500, 5000)).unwrap();

        assert_eq!(
            service.profile_of(user, admin).unwrap_err(),
            DomainError::Unauthorized
        );
        assert_eq!(
            service.profile_of(admin, user).unwrap(),
            Some(profile("Mira", 1500, 5000))
        );
        // Absent profiles read as None, not an error.
        assert_eq!(service.profile_of(admin, PrincipalId::new()).unwrap(), None);
    }

    #[test]
    fn role_assignment_round_trips_through_caller_role() {
        let (service, admin, user) = bootstrapped();

        assert_eq!(
            service.assign_role(user, admin, Role::Guest).unwrap_err(),
            DomainError::Unauthorized
        );

        service.assign_role(admin, user, Role::Guest).unwrap();
        assert_eq!(service.caller_role(user), Role::Guest);

        service.assign_role(admin, user, Role::Admin).unwrap();
        assert!(service.is_caller_admin(user));
    }

    #[test]
    fn record_creation_uses_saved_profile_defaults() {
        let (service, _admin, user) = bootstrapped();
        service.save_profile(user, profile("Mira", 1500, 5000)).unwrap();

        let march = key(3, 2025);
        service.upsert_record(user, march, &patch(160, None, None)).unwrap();

        let record = service.record(user, march).unwrap();
        assert_eq!(record.hourly_rate_cents(), 1500);
        assert_eq!(record.transport_allowance_cents(), 5000);
        assert_eq!(record.total_due_cents(), 245_000);
    }

    #[test]
    fn summaries_stay_consistent_with_record_reads() {
        let (service, _admin, user) = bootstrapped();
        let march = key(3, 2025);

        service
            .upsert_record(user, march, &patch(160, Some(1500), Some(5000)))
            .unwrap();
        service.add_payment(user, march, 100_000, PaymentType::Bank).unwrap();

        let record = service.record(user, march).unwrap();
        let summary = service.summary(user, march).unwrap();
        assert_eq!(summary.total_due_cents, record.total_due_cents());
        assert_eq!(summary.total_paid_cents, record.total_paid_cents());
        assert_eq!(summary.remaining_cents, record.remaining_cents());

        let all = service.all_summaries(user).unwrap();
        assert_eq!(all, vec![summary]);
    }

    #[test]
    fn settle_and_delete_flow() {
        let (service, _admin, user) = bootstrapped();
        let march = key(3, 2025);

        service
            .upsert_record(user, march, &patch(160, Some(1500), Some(5000)))
            .unwrap();
        service.add_payment(user, march, 245_000, PaymentType::Bank).unwrap();

        assert_eq!(service.summary(user, march).unwrap().remaining_cents, 0);
        service.delete_record(user, march).unwrap();
        assert_eq!(service.record(user, march).unwrap_err(), DomainError::NotFound);
    }

    #[test]
    fn payments_for_month_requires_the_record() {
        let (service, _admin, user) = bootstrapped();
        let march = key(3, 2025);

        assert_eq!(
            service.payments_for_month(user, march).unwrap_err(),
            DomainError::NotFound
        );

        service.upsert_record(user, march, &patch(10, Some(100), None)).unwrap();
        assert!(service.payments_for_month(user, march).unwrap().is_empty());
        assert!(!service.has_payments(user, march).unwrap());

        service.add_payment(user, march, 50, PaymentType::Cash).unwrap();
        assert_eq!(service.payments_for_month(user, march).unwrap().len(), 1);
        assert!(service.has_payments(user, march).unwrap());
    }
}
