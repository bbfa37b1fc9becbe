use worklog_core::PrincipalId;

/// Principal context for a request (authenticated identity).
///
/// Roles are not part of the request context: they are looked up in the role
/// registry per call, so an admin reassignment takes effect immediately.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId) -> Self {
        Self { principal_id }
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }
}
