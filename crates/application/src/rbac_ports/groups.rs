use async_trait::async_trait;
use uuid::Uuid;

use tasklane_core::AppResult;
use tasklane_domain::{PermissionId, RoleId};

/// Platform group created by the RBAC bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapGroup {
    /// Group identifier.
    pub group_id: Uuid,
    /// Unique group name.
    pub name: String,
    /// Linked RBAC role, cleared when the role is deleted.
    pub role_id: Option<RoleId>,
}

/// Repository port for bootstrap platform groups.
#[async_trait]
pub trait BootstrapGroupRepository: Send + Sync {
    /// Returns the group named `name`, creating it when absent. The flag
    /// reports whether a row was created.
    async fn get_or_create_group(&self, name: &str) -> AppResult<(BootstrapGroup, bool)>;

    /// Replaces the catalog permissions attached to a group.
    async fn set_group_permissions(
        &self,
        group_id: Uuid,
        permission_ids: &[PermissionId],
    ) -> AppResult<()>;

    /// Links a group to an RBAC role.
    async fn link_group_role(&self, group_id: Uuid, role_id: RoleId) -> AppResult<()>;
}
