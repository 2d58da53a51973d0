use tasklane_domain::{Role, RoleAssignment, RoleId};

use crate::{AssignOutcome, RoleLookup};

use super::*;

impl RbacAdminService {
    /// Lists a user's assignments, newest first.
    pub async fn list_user_assignments(
        &self,
        actor: &Principal,
        user_id: UserId,
    ) -> AppResult<Vec<RoleAssignment>> {
        self.access_guard.require_staff(actor)?;
        self.assignment_service.list_assignments_for(user_id).await
    }

    /// Lists roles the user does not hold yet.
    pub async fn available_roles(
        &self,
        actor: &Principal,
        user_id: UserId,
    ) -> AppResult<Vec<Role>> {
        self.access_guard.require_staff(actor)?;
        self.assignment_service.available_roles_for(user_id).await
    }

    /// Assigns a role to a user on behalf of the actor.
    pub async fn assign_role(
        &self,
        actor: &Principal,
        user_id: UserId,
        role_id: RoleId,
    ) -> AppResult<AssignOutcome> {
        self.access_guard.require_staff(actor)?;

        let role = self.role_service.get_role(&RoleLookup::Id(role_id)).await?;
        let role_name = role.name().as_str();
        let outcome = self
            .assignment_service
            .assign(user_id, role_name, actor.user_id())
            .await?;

        if outcome.was_created {
            self.record(
                actor,
                AuditAction::RbacRoleAssigned,
                "rbac_user_role",
                assignment_resource_id(user_id, role_name),
                format!("assigned role '{role_name}' to user '{user_id}'"),
            )
            .await?;
        }

        Ok(outcome)
    }

    /// Revokes a role from a user and returns the number of rows removed.
    pub async fn revoke_role(
        &self,
        actor: &Principal,
        user_id: UserId,
        role_name: &str,
    ) -> AppResult<u64> {
        self.access_guard.require_staff(actor)?;

        let removed = self.assignment_service.revoke(user_id, role_name).await?;
        if removed > 0 {
            self.record(
                actor,
                AuditAction::RbacRoleRevoked,
                "rbac_user_role",
                assignment_resource_id(user_id, role_name),
                format!("revoked role '{role_name}' from user '{user_id}'"),
            )
            .await?;
        }

        Ok(removed)
    }
}
