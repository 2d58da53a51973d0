mod assignments;
mod catalog;
mod groups;
mod roles;

pub use assignments::{AssignOutcome, AssignmentRepository};
pub use catalog::PermissionCatalog;
pub use groups::{BootstrapGroup, BootstrapGroupRepository};
pub use roles::{
    NewRole, PermissionPage, PermissionPageQuery, RoleChanges, RoleLookup, RoleQuery,
    RoleRepository,
};
