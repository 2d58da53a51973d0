//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_rbac_repository;
mod postgres_audit_repository;
mod postgres_rbac_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_rbac_repository::PostgresRbacRepository;
pub use postgres_user_repository::PostgresUserRepository;
