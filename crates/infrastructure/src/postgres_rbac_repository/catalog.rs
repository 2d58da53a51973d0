use async_trait::async_trait;

use tasklane_application::PermissionCatalog;

use super::*;

#[async_trait]
impl PermissionCatalog for PostgresRbacRepository {
    async fn list_permissions(&self) -> AppResult<Vec<CatalogPermission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource_type, codename, name
            FROM permissions
            ORDER BY resource_type, codename
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permissions: {error}")))?;

        rows.into_iter().map(CatalogPermission::try_from).collect()
    }

    async fn find_permission(&self, key: &PermissionKey) -> AppResult<Option<CatalogPermission>> {
        sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource_type, codename, name
            FROM permissions
            WHERE resource_type = $1 AND codename = $2
            "#,
        )
        .bind(key.resource_type())
        .bind(key.codename())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find permission: {error}")))?
        .map(CatalogPermission::try_from)
        .transpose()
    }

    async fn find_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<CatalogPermission>> {
        let ids: Vec<Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, resource_type, codename, name
            FROM permissions
            WHERE id = ANY($1)
            ORDER BY resource_type, codename
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve permissions: {error}")))?;

        rows.into_iter().map(CatalogPermission::try_from).collect()
    }
}
