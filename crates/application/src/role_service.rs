use std::collections::BTreeSet;
use std::sync::Arc;

use tasklane_core::{AppError, AppResult};
use tasklane_domain::{CatalogPermission, PermissionId, Role, RoleId, RoleName};

use crate::{
    NewRole, PermissionCatalog, PermissionPage, PermissionPageQuery, RoleChanges, RoleLookup,
    RoleQuery, RoleRepository,
};


/// Input payload for creating a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Catalog permissions granted to the role.
    pub permission_ids: Vec<PermissionId>,
}

/// Input payload for updating a role. `None` fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// New unique name.
    pub name: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement permission set.
    pub permission_ids: Option<Vec<PermissionId>>,
}

/// Application service owning roles and their permission sets.
#[derive(Clone)]
pub struct RoleService {
    role_repository: Arc<dyn RoleRepository>,
    permission_catalog: Arc<dyn PermissionCatalog>,
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        role_repository: Arc<dyn RoleRepository>,
        permission_catalog: Arc<dyn PermissionCatalog>,
    ) -> Self {
        Self {
            role_repository,
            permission_catalog,
        }
    }

    /// Lists roles ordered by name, optionally filtered by a search needle.
    pub async fn list_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        self.role_repository.list_roles(query).await
    }

    /// Finds a role by identifier or name.
    pub async fn find_role(&self, lookup: &RoleLookup) -> AppResult<Option<Role>> {
        self.role_repository.find_role(lookup).await
    }

    /// Returns a role by identifier or name, or `NotFound`.
    pub async fn get_role(&self, lookup: &RoleLookup) -> AppResult<Role> {
        self.role_repository
            .find_role(lookup)
            .await?
            .ok_or_else(|| AppError::NotFound(describe_missing(lookup)))
    }

    /// Creates a role with an initial permission set.
    pub async fn create_role(&self, input: CreateRoleInput) -> AppResult<Role> {
        let name = RoleName::new(input.name)?;
        let permission_ids = self.resolve_permission_ids(&input.permission_ids).await?;

        let role = self
            .role_repository
            .insert_role(NewRole {
                name: name.clone(),
                description: normalise_description(input.description),
                permission_ids,
            })
            .await
            .map_err(|error| map_name_conflict(error, &name))?;

        tracing::info!(role_id = %role.role_id(), role_name = %role.name(), "role created");
        Ok(role)
    }

    /// Applies a partial update to a role.
    pub async fn update_role(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<Role> {
        let name = input.name.map(RoleName::new).transpose()?;
        let permission_ids = match input.permission_ids {
            Some(permission_ids) => Some(self.resolve_permission_ids(&permission_ids).await?),
            None => None,
        };

        let changes = RoleChanges {
            name: name.clone(),
            description: input.description.map(normalise_description),
            permission_ids,
        };

        let updated = self
            .role_repository
            .update_role(role_id, changes)
            .await
            .map_err(|error| match name.as_ref() {
                Some(name) => map_name_conflict(error, name),
                None => error,
            })?;

        updated.ok_or_else(|| AppError::NotFound(describe_missing(&RoleLookup::Id(role_id))))
    }

    /// Deletes a role together with its assignments.
    pub async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        if !self.role_repository.delete_role(role_id).await? {
            return Err(AppError::NotFound(describe_missing(&RoleLookup::Id(role_id))));
        }

        tracing::info!(%role_id, "role deleted");
        Ok(())
    }

    /// Lists one window of a role's permissions ordered by resource type then name.
    pub async fn list_role_permissions(
        &self,
        role_id: RoleId,
        query: &PermissionPageQuery,
    ) -> AppResult<PermissionPage> {
        let role = self.get_role(&RoleLookup::Id(role_id)).await?;
        let needle = query.search.as_deref().unwrap_or_default();

        let mut matching: Vec<CatalogPermission> = role
            .permissions()
            .iter()
            .filter(|permission| permission.matches_search(needle))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            left.key()
                .resource_type()
                .cmp(right.key().resource_type())
                .then_with(|| left.name().cmp(right.name()))
        });

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        Ok(PermissionPage { items, total })
    }

    /// Lists the permission catalog.
    pub async fn list_catalog(&self) -> AppResult<Vec<CatalogPermission>> {
        self.permission_catalog.list_permissions().await
    }

    async fn resolve_permission_ids(
        &self,
        permission_ids: &[PermissionId],
    ) -> AppResult<Vec<PermissionId>> {
        let requested: BTreeSet<PermissionId> = permission_ids.iter().copied().collect();
        let requested: Vec<PermissionId> = requested.into_iter().collect();
        if requested.is_empty() {
            return Ok(requested);
        }

        let found: BTreeSet<PermissionId> = self
            .permission_catalog
            .find_permissions_by_ids(&requested)
            .await?
            .iter()
            .map(CatalogPermission::permission_id)
            .collect();

        let unknown: Vec<String> = requested
            .iter()
            .filter(|permission_id| !found.contains(permission_id))
            .map(ToString::to_string)
            .collect();

        if !unknown.is_empty() {
            return Err(AppError::Validation(format!(
                "unknown permission ids: {}",
                unknown.join(", ")
            )));
        }

        Ok(requested)
    }
}

fn normalise_description(description: Option<String>) -> Option<String> {
    description.and_then(|value| {
        let trimmed = value.trim().to_owned();
        (!trimmed.is_empty()).then_some(trimmed)
    })
}

fn map_name_conflict(error: AppError, name: &RoleName) -> AppError {
    match error {
        AppError::Conflict(_) => AppError::Validation(format!("role '{name}' already exists")),
        other => other,
    }
}

fn describe_missing(lookup: &RoleLookup) -> String {
    match lookup {
        RoleLookup::Id(role_id) => format!("role '{role_id}' does not exist"),
        RoleLookup::Name(name) => format!("role '{name}' does not exist"),
    }
}
