use std::collections::BTreeSet;
use std::sync::Arc;

use tasklane_core::{AppResult, UserId};
use tasklane_domain::{Role, RoleAssignment, RoleId, RoleName};

use crate::{AssignOutcome, AssignmentRepository, RoleLookup, RoleQuery, RoleRepository};


/// Application service for user to role assignments.
#[derive(Clone)]
pub struct AssignmentService {
    role_repository: Arc<dyn RoleRepository>,
    assignment_repository: Arc<dyn AssignmentRepository>,
}

impl AssignmentService {
    /// Creates a new assignment service.
    #[must_use]
    pub fn new(
        role_repository: Arc<dyn RoleRepository>,
        assignment_repository: Arc<dyn AssignmentRepository>,
    ) -> Self {
        Self {
            role_repository,
            assignment_repository,
        }
    }

    /// Assigns the named role to a user.
    ///
    /// An unknown role name yields an empty outcome rather than an error. An
    /// existing assignment is returned as stored. When `granted_by` is `None`
    /// the assignee is recorded as granter.
    pub async fn assign(
        &self,
        user_id: UserId,
        role_name: &str,
        granted_by: Option<UserId>,
    ) -> AppResult<AssignOutcome> {
        let Some(role_id) = self.resolve_role_id(role_name).await? else {
            tracing::debug!(%user_id, role_name, "assign skipped for unknown role");
            return Ok(AssignOutcome::unknown_role());
        };

        let (assignment, was_created) = self
            .assignment_repository
            .get_or_create_assignment(user_id, role_id, granted_by.or(Some(user_id)))
            .await?;

        if was_created {
            tracing::info!(%user_id, role_name, "role assigned");
        }

        Ok(AssignOutcome {
            assignment: Some(assignment),
            was_created,
        })
    }

    /// Removes the named role from a user and returns the number of rows removed.
    pub async fn revoke(&self, user_id: UserId, role_name: &str) -> AppResult<u64> {
        let Some(role_id) = self.resolve_role_id(role_name).await? else {
            return Ok(0);
        };

        let removed = self
            .assignment_repository
            .delete_assignments(user_id, role_id)
            .await?;
        if removed > 0 {
            tracing::info!(%user_id, role_name, removed, "role revoked");
        }

        Ok(removed)
    }

    /// Lists roles held by a user ordered by name.
    pub async fn list_roles_for(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.assignment_repository.list_roles_for_user(user_id).await
    }

    /// Lists a user's assignments, newest first.
    pub async fn list_assignments_for(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let mut assignments = self
            .assignment_repository
            .list_assignments_for_user(user_id)
            .await?;
        assignments.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.role_name().cmp(right.role_name()))
        });
        Ok(assignments)
    }

    /// Lists roles the user does not hold yet.
    pub async fn available_roles_for(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let held: BTreeSet<RoleId> = self
            .assignment_repository
            .list_roles_for_user(user_id)
            .await?
            .iter()
            .map(Role::role_id)
            .collect();

        Ok(self
            .role_repository
            .list_roles(&RoleQuery::default())
            .await?
            .into_iter()
            .filter(|role| !held.contains(&role.role_id()))
            .collect())
    }

    async fn resolve_role_id(&self, role_name: &str) -> AppResult<Option<RoleId>> {
        let Ok(role_name) = RoleName::new(role_name) else {
            return Ok(None);
        };

        Ok(self
            .role_repository
            .find_role(&RoleLookup::Name(role_name.as_str().to_owned()))
            .await?
            .map(|role| role.role_id()))
    }
}
