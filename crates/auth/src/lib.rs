//! `worklog-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the role
//! registry is pure in-memory state, and the policy checks are pure functions.

pub mod access;
pub mod claims;
pub mod policy;
pub mod roles;

pub use access::AccessControl;
pub use claims::{AccessClaims, TokenValidationError, validate_claims};
pub use policy::{ensure_admin, ensure_user};
pub use roles::Role;
