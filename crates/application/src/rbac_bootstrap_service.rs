use std::sync::Arc;

use crate::{BootstrapGroupRepository, PermissionCatalog, RoleRepository};

mod group;
mod seed;


/// Name of the platform group linked to the `admin` role.
pub const BOOTSTRAP_GROUP_NAME: &str = "Administrateurs";

/// One row of the starter role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarterRole {
    /// Role name.
    pub name: &'static str,
    /// Role description.
    pub description: &'static str,
    /// Granted `(resource_type, codename)` pairs.
    pub permissions: &'static [(&'static str, &'static str)],
}

const ADMIN_PERMISSIONS: &[(&str, &str)] = &[
    ("user", "add_user"),
    ("user", "change_user"),
    ("user", "delete_user"),
    ("user", "view_user"),
    ("group", "add_group"),
    ("group", "change_group"),
    ("group", "delete_group"),
    ("group", "view_group"),
    ("permission", "add_permission"),
    ("permission", "change_permission"),
    ("permission", "view_permission"),
    ("role", "add_role"),
    ("role", "change_role"),
    ("role", "delete_role"),
    ("role", "view_role"),
    ("userrole", "add_userrole"),
    ("userrole", "change_userrole"),
    ("userrole", "delete_userrole"),
    ("userrole", "view_userrole"),
    ("project", "add_project"),
    ("project", "change_project"),
    ("project", "delete_project"),
    ("project", "view_project"),
    ("task", "add_task"),
    ("task", "change_task"),
    ("task", "delete_task"),
    ("task", "view_task"),
];

const GESTIONNAIRE_PERMISSIONS: &[(&str, &str)] = &[
    ("project", "add_project"),
    ("project", "change_project"),
    ("project", "view_project"),
    ("task", "add_task"),
    ("task", "change_task"),
    ("task", "delete_task"),
    ("task", "view_task"),
    ("user", "view_user"),
];

const MEMBRE_PERMISSIONS: &[(&str, &str)] = &[
    ("project", "view_project"),
    ("task", "view_task"),
    ("task", "change_task"),
];

const INVITE_PERMISSIONS: &[(&str, &str)] = &[("project", "view_project"), ("task", "view_task")];

const STARTER_ROLES: [StarterRole; 4] = [
    StarterRole {
        name: "admin",
        description: "Administrator with full system access",
        permissions: ADMIN_PERMISSIONS,
    },
    StarterRole {
        name: "gestionnaire",
        description: "Manages projects and tasks",
        permissions: GESTIONNAIRE_PERMISSIONS,
    },
    StarterRole {
        name: "membre",
        description: "Views and updates the tasks assigned to them",
        permissions: MEMBRE_PERMISSIONS,
    },
    StarterRole {
        name: "invite",
        description: "Read-only access",
        permissions: INVITE_PERMISSIONS,
    },
];

/// Returns the fixed starter role table.
#[must_use]
pub fn starter_roles() -> &'static [StarterRole] {
    &STARTER_ROLES
}

/// Summary of one bootstrap run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Roles inserted by this run.
    pub roles_created: Vec<String>,
    /// Roles whose permission set was filled by this run.
    pub roles_populated: Vec<String>,
    /// `resource_type.codename` pairs missing from the catalog.
    pub unresolved_permissions: Vec<String>,
    /// Whether the bootstrap group was inserted by this run.
    pub group_created: bool,
    /// Number of items that failed and were skipped.
    pub failures: usize,
}

/// Seeds the starter roles and the administrators group.
///
/// Safe to run after every migration. Existing roles with a non-empty
/// permission set are never modified.
#[derive(Clone)]
pub struct RbacBootstrapService {
    role_repository: Arc<dyn RoleRepository>,
    permission_catalog: Arc<dyn PermissionCatalog>,
    group_repository: Arc<dyn BootstrapGroupRepository>,
}

impl RbacBootstrapService {
    /// Creates a new bootstrap service.
    #[must_use]
    pub fn new(
        role_repository: Arc<dyn RoleRepository>,
        permission_catalog: Arc<dyn PermissionCatalog>,
        group_repository: Arc<dyn BootstrapGroupRepository>,
    ) -> Self {
        Self {
            role_repository,
            permission_catalog,
            group_repository,
        }
    }

    /// Runs the bootstrap. Failures are logged per item and never returned.
    pub async fn run(&self) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        for starter in starter_roles() {
            if let Err(error) = self.seed_role(starter, &mut report).await {
                report.failures += 1;
                tracing::warn!(role_name = starter.name, %error, "starter role skipped");
            }
        }

        if let Err(error) = self.ensure_bootstrap_group(&mut report).await {
            report.failures += 1;
            tracing::warn!(group_name = BOOTSTRAP_GROUP_NAME, %error, "bootstrap group skipped");
        }

        tracing::info!(
            roles_created = report.roles_created.len(),
            roles_populated = report.roles_populated.len(),
            unresolved_permissions = report.unresolved_permissions.len(),
            group_created = report.group_created,
            failures = report.failures,
            "rbac bootstrap finished"
        );

        report
    }
}
