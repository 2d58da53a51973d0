use async_trait::async_trait;

use tasklane_application::{BootstrapGroup, BootstrapGroupRepository};

use super::*;

#[derive(Debug, FromRow)]
struct GroupRow {
    id: Uuid,
    name: String,
    role_id: Option<Uuid>,
}

#[async_trait]
impl BootstrapGroupRepository for PostgresRbacRepository {
    async fn get_or_create_group(&self, name: &str) -> AppResult<(BootstrapGroup, bool)> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO auth_groups (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create group: {error}")))?;

        let row = sqlx::query_as::<_, GroupRow>(
            "SELECT id, name, role_id FROM auth_groups WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load group '{name}': {error}")))?;

        Ok((
            BootstrapGroup {
                group_id: row.id,
                name: row.name,
                role_id: row.role_id.map(RoleId::from_uuid),
            },
            inserted.is_some(),
        ))
    }

    async fn set_group_permissions(
        &self,
        group_id: Uuid,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        sqlx::query("DELETE FROM auth_group_permissions WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to clear group permissions: {error}"))
            })?;

        let ids: Vec<Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();
        sqlx::query(
            r#"
            INSERT INTO auth_group_permissions (group_id, permission_id)
            SELECT $1, permission_id
            FROM UNNEST($2::uuid[]) AS permission_id
            ON CONFLICT (group_id, permission_id) DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(ids)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist group permissions: {error}"))
        })?;

        commit(transaction).await
    }

    async fn link_group_role(&self, group_id: Uuid, role_id: RoleId) -> AppResult<()> {
        sqlx::query("UPDATE auth_groups SET role_id = $2 WHERE id = $1")
            .bind(group_id)
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to link group role: {error}")))?;

        Ok(())
    }
}
