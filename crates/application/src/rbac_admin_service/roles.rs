use tasklane_domain::{CatalogPermission, Role, RoleId};

use crate::{
    CreateRoleInput, PermissionPage, PermissionPageQuery, RoleLookup, RoleQuery, UpdateRoleInput,
};

use super::*;

impl RbacAdminService {
    /// Lists roles for staff users.
    pub async fn list_roles(&self, actor: &Principal, query: &RoleQuery) -> AppResult<Vec<Role>> {
        self.access_guard.require_staff(actor)?;
        self.role_service.list_roles(query).await
    }

    /// Returns one role for staff users.
    pub async fn get_role(&self, actor: &Principal, role_id: RoleId) -> AppResult<Role> {
        self.access_guard.require_staff(actor)?;
        self.role_service.get_role(&RoleLookup::Id(role_id)).await
    }

    /// Creates a role and emits an audit event.
    pub async fn create_role(&self, actor: &Principal, input: CreateRoleInput) -> AppResult<Role> {
        self.access_guard.require_staff(actor)?;

        let role = self.role_service.create_role(input).await?;
        self.record(
            actor,
            AuditAction::RbacRoleCreated,
            "rbac_role",
            role.role_id().to_string(),
            format!("created role '{}'", role.name()),
        )
        .await?;

        Ok(role)
    }

    /// Updates a role and emits an audit event.
    pub async fn update_role(
        &self,
        actor: &Principal,
        role_id: RoleId,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        self.access_guard.require_staff(actor)?;

        let role = self.role_service.update_role(role_id, input).await?;
        self.record(
            actor,
            AuditAction::RbacRoleUpdated,
            "rbac_role",
            role_id.to_string(),
            format!("updated role '{}'", role.name()),
        )
        .await?;

        Ok(role)
    }

    /// Deletes a role with its assignments and emits an audit event.
    pub async fn delete_role(&self, actor: &Principal, role_id: RoleId) -> AppResult<()> {
        self.access_guard.require_staff(actor)?;

        let role = self.role_service.get_role(&RoleLookup::Id(role_id)).await?;
        self.role_service.delete_role(role_id).await?;
        self.record(
            actor,
            AuditAction::RbacRoleDeleted,
            "rbac_role",
            role_id.to_string(),
            format!("deleted role '{}'", role.name()),
        )
        .await
    }

    /// Lists a window of a role's permissions.
    pub async fn list_role_permissions(
        &self,
        actor: &Principal,
        role_id: RoleId,
        query: &PermissionPageQuery,
    ) -> AppResult<PermissionPage> {
        self.access_guard.require_staff(actor)?;
        self.role_service.list_role_permissions(role_id, query).await
    }

    /// Lists the permission catalog for role editing.
    pub async fn list_permission_catalog(
        &self,
        actor: &Principal,
    ) -> AppResult<Vec<CatalogPermission>> {
        self.access_guard.require_staff(actor)?;
        self.role_service.list_catalog().await
    }

    /// Suggests roles whose name or description contains `term`.
    ///
    /// Gated by the `view_role` permission rather than the staff flag.
    pub async fn autocomplete_roles(&self, actor: &Principal, term: &str) -> AppResult<Vec<Role>> {
        self.access_guard
            .require_permission(actor, "view_role")
            .await?;

        let mut roles = self
            .role_service
            .list_roles(&RoleQuery {
                search: Some(term.to_owned()),
            })
            .await?;
        roles.truncate(AUTOCOMPLETE_LIMIT);
        Ok(roles)
    }
}
