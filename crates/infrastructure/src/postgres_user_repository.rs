//! PostgreSQL-backed user repository.

use async_trait::async_trait;
use sqlx::PgPool;

use tasklane_application::{NewUser, UserRecord, UserRepository};
use tasklane_core::{AppError, AppResult, UserId};

mod account;
mod lookup;

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    display_name: String,
    password_hash: Option<String>,
    is_superuser: bool,
    is_staff: bool,
    is_active: bool,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            is_superuser: row.is_superuser,
            is_staff: row.is_staff,
            is_active: row.is_active,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        self.find_by_email_impl(email).await
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        self.find_by_id_impl(user_id).await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        self.create_user_impl(user).await
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        self.delete_user_impl(user_id).await
    }
}
