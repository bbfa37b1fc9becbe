use core::str::FromStr;

use serde::{Deserialize, Serialize};

use worklog_core::DomainError;

/// Role assigned to a principal for RBAC.
///
/// The role set is closed: every caller is exactly one of these. Unassigned
/// principals resolve to a default that depends on bootstrap state (see
/// [`crate::AccessControl::role_of`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Guest => "guest",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            "guest" => Ok(Role::Guest),
            other => Err(DomainError::invalid_argument(format!(
                "unknown role '{other}' (expected admin, user or guest)"
            ))),
        }
    }
}
