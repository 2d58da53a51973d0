use async_trait::async_trait;

use tasklane_core::AppResult;
use tasklane_domain::{CatalogPermission, PermissionId, PermissionKey};

/// Read port over the platform permission catalog.
#[async_trait]
pub trait PermissionCatalog: Send + Sync {
    /// Lists every catalog permission ordered by key.
    async fn list_permissions(&self) -> AppResult<Vec<CatalogPermission>>;

    /// Resolves a permission by `(resource_type, codename)`.
    async fn find_permission(&self, key: &PermissionKey) -> AppResult<Option<CatalogPermission>>;

    /// Resolves permissions by identifier. Unknown identifiers are skipped.
    async fn find_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<CatalogPermission>>;
}
