//! `worklog-ledger` — monthly work records, payments, and profiles.
//!
//! This crate contains the business rules for the ledger, implemented purely
//! as deterministic domain logic plus identity-scoped in-memory stores
//! (no IO, no HTTP).

pub mod month;
pub mod profile;
pub mod record;
pub mod store;

pub use month::MonthKey;
pub use profile::{ProfileStore, UserProfile};
pub use record::{MonthlyRecord, Payment, PaymentType, RecordPatch};
pub use store::{LedgerStore, MonthSummary};
