use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use worklog_core::{DomainError, DomainResult, PrincipalId};

/// Per-principal profile: display name plus the defaults applied when a
/// monthly record is created without an explicit rate/allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub default_hourly_rate_cents: i64,
    pub default_transport_allowance_cents: i64,
}

impl UserProfile {
    fn validate(&self) -> DomainResult<()> {
        if self.default_hourly_rate_cents < 0 {
            return Err(DomainError::invalid_argument(
                "default hourly rate must not be negative",
            ));
        }
        if self.default_transport_allowance_cents < 0 {
            return Err(DomainError::invalid_argument(
                "default transport allowance must not be negative",
            ));
        }
        Ok(())
    }
}

/// Identity-keyed profile store.
///
/// Absence is a valid state ("needs setup"); `get` never fabricates defaults.
#[derive(Debug, Default)]
pub struct ProfileStore {
    inner: RwLock<HashMap<PrincipalId, UserProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the owner's profile, all fields atomically.
    pub fn save(&self, owner: PrincipalId, profile: UserProfile) -> DomainResult<()> {
        profile.validate()?;
        let mut map = self.inner.write().expect("profile store lock poisoned");
        map.insert(owner, profile);
        Ok(())
    }

    pub fn get(&self, owner: PrincipalId) -> Option<UserProfile> {
        let map = self.inner.read().ok()?;
        map.get(&owner).cloned()
    }
}
