use async_trait::async_trait;
use tasklane_application::AssignmentRepository;

use super::*;

#[async_trait]
impl AssignmentRepository for InMemoryRbacRepository {
    async fn get_or_create_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
        created_by: Option<UserId>,
    ) -> AppResult<(RoleAssignment, bool)> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        if let Some(existing) = state
            .assignments
            .iter()
            .find(|assignment| assignment.user_id == user_id && assignment.role_id == role_id)
        {
            return Ok((state.project_assignment(existing)?, false));
        }

        let created_by = created_by.filter(|granter| state.users.contains_key(granter));
        let stored = StoredAssignment {
            assignment_id: AssignmentId::new(),
            user_id,
            role_id,
            created_at: Utc::now(),
            created_by,
        };
        let projected = state.project_assignment(&stored)?;
        state.assignments.push(stored);

        Ok((projected, true))
    }

    async fn delete_assignments(&self, user_id: UserId, role_id: RoleId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|assignment| !(assignment.user_id == user_id && assignment.role_id == role_id));

        Ok(u64::try_from(before - state.assignments.len()).unwrap_or(u64::MAX))
    }

    async fn list_assignments_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        let state = self.state.read().await;
        let mut assignments = state
            .assignments
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .map(|assignment| state.project_assignment(assignment))
            .collect::<AppResult<Vec<_>>>()?;
        assignments.sort_by(|left, right| left.role_name().cmp(right.role_name()));

        Ok(assignments)
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let held = state.held_role_ids(user_id);

        Ok(state.sorted_roles(held.iter().filter_map(|role_id| state.roles.get(role_id))))
    }

    async fn user_has_role(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .held_role_ids(user_id)
            .iter()
            .filter_map(|role_id| state.roles.get(role_id))
            .any(|role| role.name.as_str() == role_name))
    }

    async fn user_has_permission(&self, user_id: UserId, codename: &str) -> AppResult<bool> {
        let state = self.state.read().await;
        let granting: BTreeSet<PermissionId> = state
            .catalog
            .iter()
            .filter(|permission| permission.codename() == codename)
            .map(CatalogPermission::permission_id)
            .collect();

        Ok(state
            .held_role_ids(user_id)
            .iter()
            .filter_map(|role_id| state.roles.get(role_id))
            .any(|role| !role.permission_ids.is_disjoint(&granting)))
    }
}
