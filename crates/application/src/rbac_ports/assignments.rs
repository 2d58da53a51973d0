use async_trait::async_trait;

use tasklane_core::{AppResult, UserId};
use tasklane_domain::{Role, RoleAssignment, RoleId};

/// Result of an assign request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOutcome {
    /// The stored assignment, or `None` when no role carries the requested name.
    pub assignment: Option<RoleAssignment>,
    /// Whether a new row was inserted.
    pub was_created: bool,
}

impl AssignOutcome {
    /// Outcome for a role name that does not resolve.
    #[must_use]
    pub fn unknown_role() -> Self {
        Self {
            assignment: None,
            was_created: false,
        }
    }
}

/// Repository port for user to role assignments.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Returns the existing `(user, role)` assignment or inserts one. The flag
    /// reports whether a row was inserted. Fails with `NotFound` when the user
    /// does not exist.
    async fn get_or_create_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
        created_by: Option<UserId>,
    ) -> AppResult<(RoleAssignment, bool)>;

    /// Deletes assignments of `role_id` held by `user_id`, returning the count.
    async fn delete_assignments(&self, user_id: UserId, role_id: RoleId) -> AppResult<u64>;

    /// Lists assignments held by a user ordered by role name.
    async fn list_assignments_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>>;

    /// Lists roles held by a user ordered by name.
    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>>;

    /// Returns whether the user holds a role with exactly this name.
    async fn user_has_role(&self, user_id: UserId, role_name: &str) -> AppResult<bool>;

    /// Returns whether any role held by the user grants `codename`.
    async fn user_has_permission(&self, user_id: UserId, codename: &str) -> AppResult<bool>;
}
