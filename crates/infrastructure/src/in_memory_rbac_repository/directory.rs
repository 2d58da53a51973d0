use async_trait::async_trait;
use tasklane_application::{
    AuditRepository, BootstrapGroupRepository, NewUser, PermissionCatalog, UserRepository,
};
use uuid::Uuid;

use super::*;

#[async_trait]
impl PermissionCatalog for InMemoryRbacRepository {
    async fn list_permissions(&self) -> AppResult<Vec<CatalogPermission>> {
        Ok(self.state.read().await.catalog.clone())
    }

    async fn find_permission(&self, key: &PermissionKey) -> AppResult<Option<CatalogPermission>> {
        Ok(self
            .state
            .read()
            .await
            .catalog
            .iter()
            .find(|permission| permission.key() == key)
            .cloned())
    }

    async fn find_permissions_by_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<CatalogPermission>> {
        Ok(self
            .state
            .read()
            .await
            .catalog
            .iter()
            .filter(|permission| permission_ids.contains(&permission.permission_id()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BootstrapGroupRepository for InMemoryRbacRepository {
    async fn get_or_create_group(&self, name: &str) -> AppResult<(BootstrapGroup, bool)> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.groups.iter().find(|stored| stored.group.name == name) {
            return Ok((existing.group.clone(), false));
        }

        let group = BootstrapGroup {
            group_id: Uuid::new_v4(),
            name: name.to_owned(),
            role_id: None,
        };
        state.groups.push(StoredGroup {
            group: group.clone(),
            permission_ids: Vec::new(),
        });

        Ok((group, true))
    }

    async fn set_group_permissions(
        &self,
        group_id: Uuid,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let known: Vec<PermissionId> = state
            .known_permission_ids(permission_ids)
            .into_iter()
            .collect();
        let stored = state
            .groups
            .iter_mut()
            .find(|stored| stored.group.group_id == group_id)
            .ok_or_else(|| AppError::NotFound(format!("group '{group_id}' does not exist")))?;

        stored.permission_ids = known;
        Ok(())
    }

    async fn link_group_role(&self, group_id: Uuid, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }
        let stored = state
            .groups
            .iter_mut()
            .find(|stored| stored.group.group_id == group_id)
            .ok_or_else(|| AppError::NotFound(format!("group '{group_id}' does not exist")))?;

        stored.group.role_id = Some(role_id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRbacRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(user.email.as_str()))
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                user.email.as_str()
            )));
        }

        let record = UserRecord {
            id: UserId::new(),
            email: user.email.as_str().to_owned(),
            display_name: user.display_name,
            password_hash: user.password_hash,
            is_superuser: user.is_superuser,
            is_staff: user.is_staff,
            is_active: true,
        };
        state.users.insert(record.id, record.clone());

        Ok(record)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.users.remove(&user_id).is_none() {
            return Ok(false);
        }

        state
            .assignments
            .retain(|assignment| assignment.user_id != user_id);
        for assignment in &mut state.assignments {
            if assignment.created_by == Some(user_id) {
                assignment.created_by = None;
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl AuditRepository for InMemoryRbacRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.write().await.audit_events.push(event);
        Ok(())
    }
}
