//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// absence, conflicts, authorization). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An input failed validation (out-of-range month/year, negative cents, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A requested record/payment/profile target is absent.
    #[error("not found")]
    NotFound,

    /// The operation conflicts with current state (e.g. unsettled balance).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The caller's role does not permit the operation.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
