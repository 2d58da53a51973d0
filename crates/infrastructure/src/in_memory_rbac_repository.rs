use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tasklane_application::{AuditEvent, BootstrapGroup, UserRecord};
use tasklane_core::{AppError, AppResult, UserId};
use tasklane_domain::{
    AssignmentId, CatalogPermission, PermissionId, PermissionKey, Role, RoleAssignment, RoleId,
    RoleName,
};
use tokio::sync::RwLock;

mod assignments;
mod directory;
mod roles;


/// Resource types of the default catalog with their display labels.
const DEFAULT_CATALOG_RESOURCES: [(&str, &str); 7] = [
    ("user", "user"),
    ("group", "group"),
    ("permission", "permission"),
    ("role", "role"),
    ("userrole", "user role"),
    ("project", "project"),
    ("task", "task"),
];

const DEFAULT_CATALOG_ACTIONS: [&str; 4] = ["add", "change", "delete", "view"];

#[derive(Debug, Clone)]
struct StoredRole {
    role_id: RoleId,
    name: RoleName,
    description: Option<String>,
    permission_ids: BTreeSet<PermissionId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredAssignment {
    assignment_id: AssignmentId,
    user_id: UserId,
    role_id: RoleId,
    created_at: DateTime<Utc>,
    created_by: Option<UserId>,
}

#[derive(Debug, Clone)]
struct StoredGroup {
    group: BootstrapGroup,
    permission_ids: Vec<PermissionId>,
}

#[derive(Debug, Default)]
struct RbacState {
    catalog: Vec<CatalogPermission>,
    roles: HashMap<RoleId, StoredRole>,
    assignments: Vec<StoredAssignment>,
    users: HashMap<UserId, UserRecord>,
    groups: Vec<StoredGroup>,
    audit_events: Vec<AuditEvent>,
}

impl RbacState {
    fn project_role(&self, stored: &StoredRole) -> Role {
        let permissions = self
            .catalog
            .iter()
            .filter(|permission| stored.permission_ids.contains(&permission.permission_id()))
            .cloned()
            .collect();

        Role::new(
            stored.role_id,
            stored.name.clone(),
            stored.description.clone(),
            permissions,
            stored.created_at,
            stored.updated_at,
        )
    }

    fn project_assignment(&self, stored: &StoredAssignment) -> AppResult<RoleAssignment> {
        let role = self.roles.get(&stored.role_id).ok_or_else(|| {
            AppError::Internal(format!(
                "assignment '{}' references missing role",
                stored.assignment_id
            ))
        })?;

        Ok(RoleAssignment::new(
            stored.assignment_id,
            stored.user_id,
            stored.role_id,
            role.name.clone(),
            stored.created_at,
            stored.created_by,
        ))
    }

    fn find_role_by_name(&self, name: &str) -> Option<&StoredRole> {
        self.roles.values().find(|role| role.name.as_str() == name)
    }

    fn held_role_ids(&self, user_id: UserId) -> BTreeSet<RoleId> {
        self.assignments
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .map(|assignment| assignment.role_id)
            .collect()
    }

    fn sorted_roles<'a>(&self, roles: impl Iterator<Item = &'a StoredRole>) -> Vec<Role> {
        let mut projected: Vec<Role> = roles.map(|role| self.project_role(role)).collect();
        projected.sort_by(|left, right| left.name().cmp(right.name()));
        projected
    }

    fn known_permission_ids(&self, permission_ids: &[PermissionId]) -> BTreeSet<PermissionId> {
        permission_ids
            .iter()
            .copied()
            .filter(|permission_id| {
                self.catalog
                    .iter()
                    .any(|permission| permission.permission_id() == *permission_id)
            })
            .collect()
    }
}

/// In-memory implementation of every RBAC and user directory port.
///
/// All state sits behind one lock so the uniqueness and cascade rules of the
/// SQL schema hold under concurrent callers.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    state: RwLock<RbacState>,
}

impl InMemoryRbacRepository {
    /// Creates an empty repository without catalog permissions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository whose catalog matches the SQL catalog migration.
    #[must_use]
    pub fn with_default_catalog() -> Self {
        let mut catalog = Vec::new();
        for (resource_type, label) in DEFAULT_CATALOG_RESOURCES {
            for action in DEFAULT_CATALOG_ACTIONS {
                let codename = format!("{action}_{resource_type}");
                if let Ok(key) = PermissionKey::new(resource_type, codename) {
                    catalog.push(CatalogPermission::new(
                        PermissionId::new(),
                        key,
                        format!("Can {action} {label}"),
                    ));
                }
            }
        }

        Self::with_catalog(catalog)
    }

    /// Creates a repository with the given catalog.
    #[must_use]
    pub fn with_catalog(mut catalog: Vec<CatalogPermission>) -> Self {
        catalog.sort_by(|left, right| left.key().cmp(right.key()));
        Self {
            state: RwLock::new(RbacState {
                catalog,
                ..RbacState::default()
            }),
        }
    }

    /// Returns recorded audit events in insertion order.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.state.read().await.audit_events.clone()
    }
}
