use std::collections::BTreeSet;

use tasklane_domain::{ADMIN_ROLE_NAME, Role};

/// Snapshot of the current principal's access, answered without further lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessContext {
    /// Whether a user is logged in.
    pub authenticated: bool,
    /// Superuser flag of the logged in user.
    pub is_superuser: bool,
    /// Staff flag of the logged in user.
    pub is_staff: bool,
    /// Superuser or holder of the `admin` role.
    pub is_admin: bool,
    /// Names of held roles.
    pub roles: BTreeSet<String>,
    /// Codenames granted through held roles.
    pub permissions: BTreeSet<String>,
}

impl AccessContext {
    /// Context for a request without a logged in user.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builds the context for a logged in user from their roles.
    #[must_use]
    pub fn for_user(is_superuser: bool, is_staff: bool, roles: &[Role]) -> Self {
        let role_names: BTreeSet<String> = roles
            .iter()
            .map(|role| role.name().as_str().to_owned())
            .collect();
        let permissions = roles
            .iter()
            .flat_map(|role| role.permissions())
            .map(|permission| permission.codename().to_owned())
            .collect();

        Self {
            authenticated: true,
            is_superuser,
            is_staff,
            is_admin: is_superuser || role_names.contains(ADMIN_ROLE_NAME),
            roles: role_names,
            permissions,
        }
    }

    /// Same answer as the permission predicate, from the snapshot.
    #[must_use]
    pub fn has_perm(&self, codename: &str) -> bool {
        self.authenticated && (self.is_superuser || self.permissions.contains(codename))
    }

    /// Same answer as the role predicate, from the snapshot.
    #[must_use]
    pub fn has_role(&self, role_name: &str) -> bool {
        self.authenticated && self.roles.contains(role_name)
    }
}
