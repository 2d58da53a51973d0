use async_trait::async_trait;

use tasklane_core::AppResult;
use tasklane_domain::{CatalogPermission, PermissionId, Role, RoleId, RoleName};

/// Addresses a role either by identifier or by its unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLookup {
    /// Lookup by identifier.
    Id(RoleId),
    /// Lookup by exact name.
    Name(String),
}

/// Filter for role listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleQuery {
    /// Case-insensitive substring matched against name or description.
    pub search: Option<String>,
}

/// Filter and window for a role's permission listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPageQuery {
    /// Case-insensitive substring matched against permission name or codename.
    pub search: Option<String>,
    /// Maximum number of items returned.
    pub limit: usize,
    /// Number of matching items skipped.
    pub offset: usize,
}

impl Default for PermissionPageQuery {
    fn default() -> Self {
        Self {
            search: None,
            limit: 50,
            offset: 0,
        }
    }
}

/// One window of a role's permission listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionPage {
    /// Permissions in the requested window.
    pub items: Vec<CatalogPermission>,
    /// Count of permissions matching the filter before windowing.
    pub total: usize,
}

/// Validated insert payload for a role row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Unique role name.
    pub name: RoleName,
    /// Optional description.
    pub description: Option<String>,
    /// Catalog permissions granted at creation.
    pub permission_ids: Vec<PermissionId>,
}

/// Partial update payload. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChanges {
    /// New unique name.
    pub name: Option<RoleName>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement permission set.
    pub permission_ids: Option<Vec<PermissionId>>,
}

/// Repository port for role rows and their permission sets.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists roles ordered by name.
    async fn list_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>>;

    /// Finds one role with its permission set.
    async fn find_role(&self, lookup: &RoleLookup) -> AppResult<Option<Role>>;

    /// Inserts a role. Fails with `Conflict` when the name is taken.
    async fn insert_role(&self, role: NewRole) -> AppResult<Role>;

    /// Returns the role named `name`, creating it without permissions when
    /// absent. The flag reports whether a row was created.
    async fn get_or_create_role(
        &self,
        name: &RoleName,
        description: Option<&str>,
    ) -> AppResult<(Role, bool)>;

    /// Applies changes to a role. Returns `None` when the role does not exist
    /// and fails with `Conflict` when a rename collides.
    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Option<Role>>;

    /// Replaces the permission set of a role.
    async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()>;

    /// Deletes a role together with its grants and assignments. Returns
    /// whether a row was removed.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool>;
}
