use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_user_impl(&self, user: NewUser) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, is_superuser, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, display_name, password_hash, is_superuser, is_staff, is_active
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_deref())
        .bind(user.is_superuser)
        .bind(user.is_staff)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(database_error) = &error
                && database_error.code().as_deref() == Some("23505")
            {
                return AppError::Conflict(format!(
                    "user '{}' already exists",
                    user.email.as_str()
                ));
            }
            AppError::Internal(format!("failed to create user: {error}"))
        })?;

        Ok(UserRecord::from(row))
    }

    /// Foreign keys remove the user's assignments and null `created_by` on
    /// assignments the user granted.
    pub(super) async fn delete_user_impl(&self, user_id: UserId) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete user: {error}")))?;

        Ok(deleted.rows_affected() > 0)
    }
}
