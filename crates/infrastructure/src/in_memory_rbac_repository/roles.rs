use async_trait::async_trait;
use tasklane_application::{NewRole, RoleChanges, RoleLookup, RoleQuery, RoleRepository};

use super::*;

fn name_taken(name: &RoleName) -> AppError {
    AppError::Conflict(format!("role '{name}' already exists"))
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn list_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        let state = self.state.read().await;
        let needle = query.search.as_deref().unwrap_or_default();

        Ok(state
            .sorted_roles(state.roles.values())
            .into_iter()
            .filter(|role| role.matches_search(needle))
            .collect())
    }

    async fn find_role(&self, lookup: &RoleLookup) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        let stored = match lookup {
            RoleLookup::Id(role_id) => state.roles.get(role_id),
            RoleLookup::Name(name) => state.find_role_by_name(name),
        };

        Ok(stored.map(|role| state.project_role(role)))
    }

    async fn insert_role(&self, role: NewRole) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.find_role_by_name(role.name.as_str()).is_some() {
            return Err(name_taken(&role.name));
        }

        let now = Utc::now();
        let stored = StoredRole {
            role_id: RoleId::new(),
            name: role.name,
            description: role.description,
            permission_ids: state.known_permission_ids(&role.permission_ids),
            created_at: now,
            updated_at: now,
        };
        let projected = state.project_role(&stored);
        state.roles.insert(stored.role_id, stored);

        Ok(projected)
    }

    async fn get_or_create_role(
        &self,
        name: &RoleName,
        description: Option<&str>,
    ) -> AppResult<(Role, bool)> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.find_role_by_name(name.as_str()) {
            return Ok((state.project_role(existing), false));
        }

        let now = Utc::now();
        let stored = StoredRole {
            role_id: RoleId::new(),
            name: name.clone(),
            description: description.map(ToOwned::to_owned),
            permission_ids: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        };
        let projected = state.project_role(&stored);
        state.roles.insert(stored.role_id, stored);

        Ok((projected, true))
    }

    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Option<Role>> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&role_id) {
            return Ok(None);
        }

        if let Some(name) = changes.name.as_ref()
            && state
                .find_role_by_name(name.as_str())
                .is_some_and(|existing| existing.role_id != role_id)
        {
            return Err(name_taken(name));
        }

        let permission_ids = changes
            .permission_ids
            .as_deref()
            .map(|permission_ids| state.known_permission_ids(permission_ids));

        let Some(stored) = state.roles.get_mut(&role_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            stored.name = name;
        }
        if let Some(description) = changes.description {
            stored.description = description;
        }
        if let Some(permission_ids) = permission_ids {
            stored.permission_ids = permission_ids;
        }
        stored.updated_at = Utc::now();

        let stored = stored.clone();
        Ok(Some(state.project_role(&stored)))
    }

    async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let permission_ids = state.known_permission_ids(permission_ids);
        let Some(stored) = state.roles.get_mut(&role_id) else {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        };

        stored.permission_ids = permission_ids;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        if state.roles.remove(&role_id).is_none() {
            return Ok(false);
        }

        state
            .assignments
            .retain(|assignment| assignment.role_id != role_id);
        for stored in &mut state.groups {
            if stored.group.role_id == Some(role_id) {
                stored.group.role_id = None;
            }
        }

        Ok(true)
    }
}
