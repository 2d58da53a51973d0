//! Application services and ports.

#![forbid(unsafe_code)]

mod access_guard;
mod assignment_service;
mod audit_ports;
mod authorization_service;
mod rbac_admin_service;
mod rbac_bootstrap_service;
mod rbac_ports;
mod role_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use access_guard::AccessGuard;
pub use assignment_service::AssignmentService;
pub use audit_ports::{AuditEvent, AuditRepository};
pub use authorization_service::{AccessContext, AuthorizationService};
pub use rbac_admin_service::RbacAdminService;
pub use rbac_bootstrap_service::{
    BOOTSTRAP_GROUP_NAME, BootstrapReport, RbacBootstrapService, StarterRole, starter_roles,
};
pub use rbac_ports::{
    AssignOutcome, AssignmentRepository, BootstrapGroup, BootstrapGroupRepository, NewRole,
    PermissionCatalog, PermissionPage, PermissionPageQuery, RoleChanges, RoleLookup, RoleQuery,
    RoleRepository,
};
pub use role_service::{CreateRoleInput, RoleService, UpdateRoleInput};
pub use user_service::{
    AuthOutcome, EnsureUserInput, NewUser, PasswordHasher, UserRecord, UserRepository,
    UserService,
};
