//! Pure authorization checks applied at the operation boundary.
//!
//! - No IO
//! - No panics
//! - No business logic (pure policy check)

use worklog_core::{DomainError, DomainResult};

use crate::Role;

/// Require at least the `user` role (self-scoped reads and writes).
///
/// Guests are rejected from every profile/record operation.
pub fn ensure_user(role: Role) -> DomainResult<()> {
    match role {
        Role::Admin | Role::User => Ok(()),
        Role::Guest => Err(DomainError::Unauthorized),
    }
}

/// Require the `admin` role (role assignment, cross-identity profile reads).
pub fn ensure_admin(role: Role) -> DomainResult<()> {
    match role {
        Role::Admin => Ok(()),
        Role::User | Role::Guest => Err(DomainError::Unauthorized),
    }
}
