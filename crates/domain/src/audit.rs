use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role is created.
    RbacRoleCreated,
    /// Emitted when a role's name, description or grants change.
    RbacRoleUpdated,
    /// Emitted when a role and its assignments are deleted.
    RbacRoleDeleted,
    /// Emitted when a role is assigned to a user.
    RbacRoleAssigned,
    /// Emitted when a role is revoked from a user.
    RbacRoleRevoked,
    /// Emitted when a user account is deleted.
    UserDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RbacRoleCreated => "rbac.role.created",
            Self::RbacRoleUpdated => "rbac.role.updated",
            Self::RbacRoleDeleted => "rbac.role.deleted",
            Self::RbacRoleAssigned => "rbac.role.assigned",
            Self::RbacRoleRevoked => "rbac.role.revoked",
            Self::UserDeleted => "user.deleted",
        }
    }
}
