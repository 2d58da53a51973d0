//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod audit;
mod permission;
mod role;
mod user;

pub use access::{AccessDecision, DenialReason};
pub use audit::AuditAction;
pub use permission::{CatalogPermission, PermissionId, PermissionKey};
pub use role::{
    ADMIN_ROLE_NAME, AssignmentId, ROLE_NAME_MAX_LENGTH, Role, RoleAssignment, RoleId, RoleName,
};
pub use user::EmailAddress;
