//! User directory ports and application service.
//!
//! Owns the lifecycle operations the RBAC layer depends on: password login,
//! idempotent account provisioning for seeding, and guarded deletion. Login
//! failures are reported generically and hash work is performed on every
//! path so response time does not reveal whether an account exists.

use std::sync::Arc;

use async_trait::async_trait;

use tasklane_core::{AppError, AppResult, Principal, UserId, UserIdentity};
use tasklane_domain::{AuditAction, EmailAddress};

use crate::{AccessGuard, AuditEvent, AuditRepository};

mod deletion;
mod login;
mod retrieval;


// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Human-readable name.
    pub display_name: String,
    /// Argon2id password hash, or `None` for accounts that cannot log in.
    pub password_hash: Option<String>,
    /// Bypasses role checks in guards and permission predicates.
    pub is_superuser: bool,
    /// May use the management surface.
    pub is_staff: bool,
    /// Inactive accounts cannot log in.
    pub is_active: bool,
}

impl UserRecord {
    /// Builds the session identity for this user.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.id,
            self.email.clone(),
            self.display_name.clone(),
            self.is_superuser,
            self.is_staff,
        )
    }
}

/// Validated insert payload for a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Canonical email address.
    pub email: EmailAddress,
    /// Human-readable name.
    pub display_name: String,
    /// Argon2id password hash.
    pub password_hash: Option<String>,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Staff flag.
    pub is_staff: bool,
}

/// Repository port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    /// Finds a user by their unique identifier.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>>;

    /// Creates a new active user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord>;

    /// Deletes a user. Assignments held by the user are removed and
    /// assignments the user granted lose their granter. Returns whether a
    /// row was removed.
    async fn delete_user(&self, user_id: UserId) -> AppResult<bool>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Outcomes and request types
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. Session can be established.
    Authenticated(UserRecord),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

/// Parameters for idempotent account provisioning.
#[derive(Debug, Clone)]
pub struct EnsureUserInput {
    /// Email address for the account.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Superuser flag.
    pub is_superuser: bool,
    /// Staff flag.
    pub is_staff: bool,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for authentication and user lifecycle.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    access_guard: AccessGuard,
    audit_repository: Arc<dyn AuditRepository>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        access_guard: AccessGuard,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            access_guard,
            audit_repository,
        }
    }

    /// Returns the user record for `email`, creating it when absent.
    ///
    /// Existing accounts are returned untouched, including their password.
    pub async fn ensure_user(&self, input: EnsureUserInput) -> AppResult<UserRecord> {
        let email = EmailAddress::new(input.email)?;
        if let Some(existing) = self.user_repository.find_by_email(email.as_str()).await? {
            return Ok(existing);
        }

        let display_name = input.display_name.trim().to_owned();
        if display_name.is_empty() {
            return Err(AppError::Validation(
                "display name must not be empty".to_owned(),
            ));
        }

        let password_hash = self.password_hasher.hash_password(&input.password)?;
        self.user_repository
            .create_user(NewUser {
                email,
                display_name,
                password_hash: Some(password_hash),
                is_superuser: input.is_superuser,
                is_staff: input.is_staff,
            })
            .await
    }
}
