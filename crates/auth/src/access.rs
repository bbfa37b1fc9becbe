//! Role registry with admin bootstrap.
//!
//! All role state lives behind a single `RwLock`, so every check-then-set
//! (bootstrap, assignment) is an atomic read-modify-write: two concurrent
//! bootstrap calls cannot both become admin.

use std::collections::HashMap;
use std::sync::RwLock;

use worklog_core::{DomainResult, PrincipalId};

use crate::policy::ensure_admin;
use crate::Role;

/// Identity → role registry gating every operation of the service surface.
#[derive(Debug, Default)]
pub struct AccessControl {
    roles: RwLock<HashMap<PrincipalId, Role>>,
}

impl AccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent bootstrap: the first caller becomes admin.
    ///
    /// If an admin already exists this is a no-op — repeated calls never
    /// overwrite an existing admin assignment.
    pub fn initialize(&self, caller: PrincipalId) {
        let mut roles = self.roles.write().expect("role registry lock poisoned");
        if !has_admin(&roles) {
            roles.insert(caller, Role::Admin);
            tracing::info!(principal = %caller, "bootstrapped first admin");
        }
    }

    /// Reassign `target`'s role. Admin-only.
    pub fn assign_role(
        &self,
        caller: PrincipalId,
        target: PrincipalId,
        role: Role,
    ) -> DomainResult<()> {
        let mut roles = self.roles.write().expect("role registry lock poisoned");
        ensure_admin(resolve(&roles, caller))?;
        roles.insert(target, role);
        tracing::info!(principal = %target, role = %role, "role assigned");
        Ok(())
    }

    /// The caller's role, falling back to the bootstrap-state default.
    ///
    /// Unassigned principals are guests until an admin exists, then users.
    /// Never fails.
    pub fn role_of(&self, caller: PrincipalId) -> Role {
        match self.roles.read() {
            Ok(roles) => resolve(&roles, caller),
            Err(_) => Role::Guest,
        }
    }

    pub fn is_admin(&self, caller: PrincipalId) -> bool {
        self.role_of(caller) == Role::Admin
    }
}

fn has_admin(roles: &HashMap<PrincipalId, Role>) -> bool {
    roles.values().any(|r| *r == Role::Admin)
}

fn resolve(roles: &HashMap<PrincipalId, Role>, caller: PrincipalId) -> Role {
    match roles.get(&caller) {
        Some(role) => *role,
        None if has_admin(roles) => Role::User,
        None => Role::Guest,
    }
}
