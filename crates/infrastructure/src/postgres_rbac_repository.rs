use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use tasklane_core::{AppError, AppResult};
use tasklane_domain::{CatalogPermission, PermissionId, PermissionKey, Role, RoleId, RoleName};

mod assignments;
mod catalog;
mod groups;
mod roles;

#[cfg(test)]
mod tests;

/// Role projection with its permissions, one row per granted permission.
const ROLE_SELECT: &str = r#"
    SELECT
        roles.id AS role_id,
        roles.name AS role_name,
        roles.description,
        roles.created_at,
        roles.updated_at,
        permissions.id AS permission_id,
        permissions.resource_type,
        permissions.codename,
        permissions.name AS permission_name
    FROM roles
    LEFT JOIN role_permissions
        ON role_permissions.role_id = roles.id
    LEFT JOIN permissions
        ON permissions.id = role_permissions.permission_id
"#;

const ROLE_ORDER: &str =
    "ORDER BY roles.name, roles.id, permissions.resource_type, permissions.codename";

/// PostgreSQL-backed repository for roles, assignments, the permission
/// catalog and bootstrap groups.
#[derive(Clone)]
pub struct PostgresRbacRepository {
    pool: PgPool,
}

impl PostgresRbacRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: Uuid,
    role_name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    permission_id: Option<Uuid>,
    resource_type: Option<String>,
    codename: Option<String>,
    permission_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: Uuid,
    resource_type: String,
    codename: String,
    name: String,
}

impl TryFrom<PermissionRow> for CatalogPermission {
    type Error = AppError;

    fn try_from(row: PermissionRow) -> Result<Self, Self::Error> {
        let key = PermissionKey::new(row.resource_type, row.codename).map_err(|error| {
            AppError::Internal(format!("invalid stored permission '{}': {error}", row.id))
        })?;

        Ok(CatalogPermission::new(
            PermissionId::from_uuid(row.id),
            key,
            row.name,
        ))
    }
}

fn stored_role_name(value: String) -> AppResult<RoleName> {
    RoleName::new(value)
        .map_err(|error| AppError::Internal(format!("invalid stored role name: {error}")))
}

/// Folds joined role rows into roles. Rows must be grouped by role.
fn aggregate_roles(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    let mut grouped: Vec<(RoleRow, Vec<CatalogPermission>)> = Vec::new();

    for mut row in rows {
        let permission = match (
            row.permission_id,
            row.resource_type.take(),
            row.codename.take(),
            row.permission_name.take(),
        ) {
            (Some(id), Some(resource_type), Some(codename), Some(name)) => {
                Some(CatalogPermission::try_from(PermissionRow {
                    id,
                    resource_type,
                    codename,
                    name,
                })?)
            }
            _ => None,
        };

        match grouped.last_mut() {
            Some((head, permissions)) if head.role_id == row.role_id => {
                permissions.extend(permission);
            }
            _ => grouped.push((row, permission.into_iter().collect())),
        }
    }

    grouped
        .into_iter()
        .map(|(head, permissions)| {
            Ok(Role::new(
                RoleId::from_uuid(head.role_id),
                stored_role_name(head.role_name)?,
                head.description,
                permissions,
                head.created_at,
                head.updated_at,
            ))
        })
        .collect()
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to persist role: {error}"))
}

async fn replace_role_permissions(
    transaction: &mut Transaction<'_, Postgres>,
    role_id: Uuid,
    permission_ids: &[PermissionId],
) -> AppResult<()> {
    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Internal(format!("failed to clear role grants: {error}")))?;

    let ids: Vec<Uuid> = permission_ids.iter().map(PermissionId::as_uuid).collect();
    sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission_id)
        SELECT $1, permission_id
        FROM UNNEST($2::uuid[]) AS permission_id
        ON CONFLICT (role_id, permission_id) DO NOTHING
        "#,
    )
    .bind(role_id)
    .bind(ids)
    .execute(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to persist role grants: {error}")))?;

    Ok(())
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}
