use async_trait::async_trait;

use tasklane_application::AssignmentRepository;
use tasklane_core::UserId;
use tasklane_domain::{AssignmentId, RoleAssignment};

use super::*;

#[derive(Debug, FromRow)]
struct AssignmentRow {
    assignment_id: Uuid,
    user_id: Uuid,
    role_id: Uuid,
    role_name: String,
    created_at: DateTime<Utc>,
    created_by: Option<Uuid>,
}

impl TryFrom<AssignmentRow> for RoleAssignment {
    type Error = AppError;

    fn try_from(row: AssignmentRow) -> Result<Self, Self::Error> {
        Ok(RoleAssignment::new(
            AssignmentId::from_uuid(row.assignment_id),
            UserId::from_uuid(row.user_id),
            RoleId::from_uuid(row.role_id),
            stored_role_name(row.role_name)?,
            row.created_at,
            row.created_by.map(UserId::from_uuid),
        ))
    }
}

const ASSIGNMENT_SELECT: &str = r#"
    SELECT
        user_roles.id AS assignment_id,
        user_roles.user_id,
        user_roles.role_id,
        roles.name AS role_name,
        user_roles.created_at,
        user_roles.created_by
    FROM user_roles
    INNER JOIN roles
        ON roles.id = user_roles.role_id
"#;

fn map_assignment_error(error: sqlx::Error, user_id: UserId, role_id: RoleId) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!(
            "user '{user_id}' or role '{role_id}' does not exist"
        ));
    }

    AppError::Internal(format!("failed to assign role: {error}"))
}

#[async_trait]
impl AssignmentRepository for PostgresRbacRepository {
    async fn get_or_create_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
        created_by: Option<UserId>,
    ) -> AppResult<(RoleAssignment, bool)> {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO user_roles (id, user_id, role_id, created_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, role_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.as_uuid())
        .bind(role_id.as_uuid())
        .bind(created_by.map(|granter| granter.as_uuid()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| map_assignment_error(error, user_id, role_id))?;

        let statement = format!(
            "{ASSIGNMENT_SELECT} WHERE user_roles.user_id = $1 AND user_roles.role_id = $2"
        );
        let row = sqlx::query_as::<_, AssignmentRow>(statement.as_str())
            .bind(user_id.as_uuid())
            .bind(role_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to load assignment: {error}")))?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "assignment of role '{role_id}' to user '{user_id}' missing after upsert"
                ))
            })?;

        Ok((RoleAssignment::try_from(row)?, inserted.is_some()))
    }

    async fn delete_assignments(&self, user_id: UserId, role_id: RoleId) -> AppResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id.as_uuid())
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to revoke role: {error}")))?;

        Ok(deleted.rows_affected())
    }

    async fn list_assignments_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let statement =
            format!("{ASSIGNMENT_SELECT} WHERE user_roles.user_id = $1 ORDER BY roles.name");
        let rows = sqlx::query_as::<_, AssignmentRow>(statement.as_str())
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list assignments: {error}")))?;

        rows.into_iter().map(RoleAssignment::try_from).collect()
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let statement = format!(
            r#"
            {ROLE_SELECT}
            WHERE roles.id IN (SELECT role_id FROM user_roles WHERE user_id = $1)
            {ROLE_ORDER}
            "#
        );
        let rows = sqlx::query_as::<_, RoleRow>(statement.as_str())
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list user roles: {error}")))?;

        aggregate_roles(rows)
    }

    async fn user_has_role(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles
                INNER JOIN roles ON roles.id = user_roles.role_id
                WHERE user_roles.user_id = $1 AND roles.name = $2
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check user role: {error}")))
    }

    async fn user_has_permission(&self, user_id: UserId, codename: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles
                INNER JOIN role_permissions
                    ON role_permissions.role_id = user_roles.role_id
                INNER JOIN permissions
                    ON permissions.id = role_permissions.permission_id
                WHERE user_roles.user_id = $1 AND permissions.codename = $2
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(codename)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to check user permission: {error}")))
    }
}
