use async_trait::async_trait;

use tasklane_application::{NewRole, RoleChanges, RoleLookup, RoleQuery, RoleRepository};

use super::*;

#[async_trait]
impl RoleRepository for PostgresRbacRepository {
    async fn list_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty());

        let statement = format!(
            r#"
            {ROLE_SELECT}
            WHERE $1::text IS NULL
                OR strpos(lower(roles.name), lower($1)) > 0
                OR strpos(lower(coalesce(roles.description, '')), lower($1)) > 0
            {ROLE_ORDER}
            "#
        );
        let rows = sqlx::query_as::<_, RoleRow>(statement.as_str())
            .bind(search)
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        aggregate_roles(rows)
    }

    async fn find_role(&self, lookup: &RoleLookup) -> AppResult<Option<Role>> {
        let rows = match lookup {
            RoleLookup::Id(role_id) => {
                let statement = format!("{ROLE_SELECT} WHERE roles.id = $1 {ROLE_ORDER}");
                sqlx::query_as::<_, RoleRow>(statement.as_str())
                    .bind(role_id.as_uuid())
                    .fetch_all(&self.pool)
                    .await
            }
            RoleLookup::Name(name) => {
                let statement = format!("{ROLE_SELECT} WHERE roles.name = $1 {ROLE_ORDER}");
                sqlx::query_as::<_, RoleRow>(statement.as_str())
                    .bind(name.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|error| AppError::Internal(format!("failed to find role: {error}")))?;

        Ok(aggregate_roles(rows)?.into_iter().next())
    }

    async fn insert_role(&self, role: NewRole) -> AppResult<Role> {
        let role_id = RoleId::new();
        let mut transaction = self.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(role.name.as_str())
        .bind(role.description.as_deref())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, role.name.as_str()))?;

        replace_role_permissions(&mut transaction, role_id.as_uuid(), &role.permission_ids).await?;
        commit(transaction).await?;

        self.find_role(&RoleLookup::Id(role_id))
            .await?
            .ok_or_else(|| AppError::Internal(format!("role '{role_id}' vanished after insert")))
    }

    async fn get_or_create_role(
        &self,
        name: &RoleName,
        description: Option<&str>,
    ) -> AppResult<(Role, bool)> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO roles (id, name, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name.as_str())
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, name.as_str()))?;

        let role = self
            .find_role(&RoleLookup::Name(name.as_str().to_owned()))
            .await?
            .ok_or_else(|| AppError::Internal(format!("role '{name}' missing after upsert")))?;

        Ok((role, inserted.is_some()))
    }

    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Option<Role>> {
        let mut transaction = self.begin().await?;

        let (clear_description, description) = match changes.description {
            Some(description) => (true, description),
            None => (false, None),
        };
        let renamed = changes.name.as_ref().map(RoleName::as_str);

        let updated = sqlx::query(
            r#"
            UPDATE roles
            SET
                name = coalesce($2::text, name),
                description = CASE WHEN $3 THEN $4::text ELSE description END,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(renamed)
        .bind(clear_description)
        .bind(description)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, renamed.unwrap_or_default()))?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        if let Some(permission_ids) = changes.permission_ids.as_deref() {
            replace_role_permissions(&mut transaction, role_id.as_uuid(), permission_ids).await?;
        }
        commit(transaction).await?;

        self.find_role(&RoleLookup::Id(role_id)).await
    }

    async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;
        replace_role_permissions(&mut transaction, role_id.as_uuid(), permission_ids).await?;

        sqlx::query("UPDATE roles SET updated_at = now() WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| AppError::Internal(format!("failed to touch role: {error}")))?;

        commit(transaction).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?;

        Ok(deleted.rows_affected() > 0)
    }
}
