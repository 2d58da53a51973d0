use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tasklane_core::{AppError, AppResult, Principal, UserId, UserIdentity};
use tasklane_domain::{
    AssignmentId, CatalogPermission, PermissionId, PermissionKey, Role, RoleAssignment, RoleId,
    RoleName,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    AccessGuard, AssignmentRepository, AssignmentService, AuditEvent, AuditRepository,
    AuthorizationService, BootstrapGroup, BootstrapGroupRepository, NewRole, NewUser,
    PasswordHasher, PermissionCatalog, RbacAdminService, RbacBootstrapService, RoleChanges,
    RoleLookup, RoleQuery, RoleRepository, RoleService, UserRecord, UserRepository, UserService,
    starter_roles,
};

#[derive(Clone)]
struct StoredRole {
    role_id: RoleId,
    name: RoleName,
    description: Option<String>,
    permission_ids: Vec<PermissionId>,
}

#[derive(Clone)]
struct StoredAssignment {
    assignment_id: AssignmentId,
    user_id: UserId,
    role_id: RoleId,
    created_by: Option<UserId>,
}

#[derive(Default)]
struct FakeState {
    catalog: Vec<CatalogPermission>,
    roles: Vec<StoredRole>,
    assignments: Vec<StoredAssignment>,
    users: Vec<UserRecord>,
    groups: Vec<(BootstrapGroup, Vec<PermissionId>)>,
    events: Vec<AuditEvent>,
}

impl FakeState {
    fn project(&self, stored: &StoredRole) -> Role {
        let permissions = self
            .catalog
            .iter()
            .filter(|permission| stored.permission_ids.contains(&permission.permission_id()))
            .cloned()
            .collect();
        let now = Utc::now();
        Role::new(
            stored.role_id,
            stored.name.clone(),
            stored.description.clone(),
            permissions,
            now,
            now,
        )
    }

    fn project_assignment(&self, stored: &StoredAssignment) -> Option<RoleAssignment> {
        let role = self
            .roles
            .iter()
            .find(|role| role.role_id == stored.role_id)?;
        Some(RoleAssignment::new(
            stored.assignment_id,
            stored.user_id,
            stored.role_id,
            role.name.clone(),
            Utc::now(),
            stored.created_by,
        ))
    }

    fn roles_for(&self, user_id: UserId) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .assignments
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .filter_map(|assignment| {
                self.roles
                    .iter()
                    .find(|role| role.role_id == assignment.role_id)
            })
            .map(|role| self.project(role))
            .collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        roles
    }
}

/// Single in-memory store implementing every application port.
#[derive(Default)]
pub(crate) struct FakeRbacStore {
    state: Mutex<FakeState>,
    fail_lookups: AtomicBool,
}

impl FakeRbacStore {
    pub(crate) fn with_catalog(keys: &[(&str, &str)]) -> Arc<Self> {
        let catalog = keys
            .iter()
            .map(|(resource_type, codename)| {
                CatalogPermission::new(
                    PermissionId::new(),
                    PermissionKey::new(*resource_type, *codename)
                        .unwrap_or_else(|_| unreachable!()),
                    format!("Can {}", codename.replace('_', " ")),
                )
            })
            .collect();

        Arc::new(Self {
            state: Mutex::new(FakeState {
                catalog,
                ..FakeState::default()
            }),
            fail_lookups: AtomicBool::new(false),
        })
    }

    /// Catalog containing every pair named by the starter role table.
    pub(crate) fn with_starter_catalog() -> Arc<Self> {
        let mut keys: Vec<(&str, &str)> = starter_roles()
            .iter()
            .flat_map(|starter| starter.permissions.iter().copied())
            .collect();
        keys.sort_unstable();
        keys.dedup();
        Self::with_catalog(&keys)
    }

    pub(crate) fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    fn check_lookup(&self) -> AppResult<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(AppError::Internal("simulated storage outage".to_owned()));
        }
        Ok(())
    }

    pub(crate) async fn permission_id(&self, codename: &str) -> PermissionId {
        self.state
            .lock()
            .await
            .catalog
            .iter()
            .find(|permission| permission.codename() == codename)
            .map(CatalogPermission::permission_id)
            .unwrap_or_else(|| unreachable!())
    }

    pub(crate) async fn add_user(
        &self,
        email: &str,
        is_superuser: bool,
        is_staff: bool,
    ) -> Principal {
        let record = UserRecord {
            id: UserId::new(),
            email: email.to_owned(),
            display_name: email.to_owned(),
            password_hash: Some(format!("hashed:{email}")),
            is_superuser,
            is_staff,
            is_active: true,
        };
        let identity = record.identity();
        self.state.lock().await.users.push(record);
        Principal::User(identity)
    }

    pub(crate) async fn set_user_flags(
        &self,
        user_id: UserId,
        is_superuser: bool,
        is_staff: bool,
        is_active: bool,
    ) {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.iter_mut().find(|user| user.id == user_id) {
            user.is_superuser = is_superuser;
            user.is_staff = is_staff;
            user.is_active = is_active;
        }
    }

    pub(crate) async fn add_role(&self, name: &str, codenames: &[&str]) -> RoleId {
        let mut state = self.state.lock().await;
        let permission_ids = state
            .catalog
            .iter()
            .filter(|permission| codenames.contains(&permission.codename()))
            .map(CatalogPermission::permission_id)
            .collect();
        let role_id = RoleId::new();
        state.roles.push(StoredRole {
            role_id,
            name: RoleName::new(name).unwrap_or_else(|_| unreachable!()),
            description: None,
            permission_ids,
        });
        role_id
    }

    pub(crate) async fn events(&self) -> Vec<AuditEvent> {
        self.state.lock().await.events.clone()
    }

    pub(crate) async fn group_permission_count(&self, name: &str) -> Option<usize> {
        self.state
            .lock()
            .await
            .groups
            .iter()
            .find(|(group, _)| group.name == name)
            .map(|(_, permission_ids)| permission_ids.len())
    }

    pub(crate) async fn group(&self, name: &str) -> Option<BootstrapGroup> {
        self.state
            .lock()
            .await
            .groups
            .iter()
            .find(|(group, _)| group.name == name)
            .map(|(group, _)| group.clone())
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn list_roles(&self, query: &RoleQuery) -> AppResult<Vec<Role>> {
        self.check_lookup()?;
        let state = self.state.lock().await;
        let needle = query.search.as_deref().unwrap_or_default();
        let mut roles: Vec<Role> = state
            .roles
            .iter()
            .map(|role| state.project(role))
            .filter(|role| role.matches_search(needle))
            .collect();
        roles.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(roles)
    }

    async fn find_role(&self, lookup: &RoleLookup) -> AppResult<Option<Role>> {
        self.check_lookup()?;
        let state = self.state.lock().await;
        Ok(state
            .roles
            .iter()
            .find(|role| match lookup {
                RoleLookup::Id(role_id) => role.role_id == *role_id,
                RoleLookup::Name(name) => role.name.as_str() == name,
            })
            .map(|role| state.project(role)))
    }

    async fn insert_role(&self, role: NewRole) -> AppResult<Role> {
        let mut state = self.state.lock().await;
        if state.roles.iter().any(|stored| stored.name == role.name) {
            return Err(AppError::Conflict(format!("role '{}' exists", role.name)));
        }
        let stored = StoredRole {
            role_id: RoleId::new(),
            name: role.name,
            description: role.description,
            permission_ids: role.permission_ids,
        };
        state.roles.push(stored.clone());
        Ok(state.project(&stored))
    }

    async fn get_or_create_role(
        &self,
        name: &RoleName,
        description: Option<&str>,
    ) -> AppResult<(Role, bool)> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.roles.iter().find(|role| &role.name == name) {
            return Ok((state.project(existing), false));
        }
        let stored = StoredRole {
            role_id: RoleId::new(),
            name: name.clone(),
            description: description.map(ToOwned::to_owned),
            permission_ids: Vec::new(),
        };
        state.roles.push(stored.clone());
        Ok((state.project(&stored), true))
    }

    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Option<Role>> {
        let mut state = self.state.lock().await;
        if let Some(name) = changes.name.as_ref()
            && state
                .roles
                .iter()
                .any(|role| &role.name == name && role.role_id != role_id)
        {
            return Err(AppError::Conflict(format!("role '{name}' exists")));
        }

        let Some(stored) = state.roles.iter_mut().find(|role| role.role_id == role_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            stored.name = name;
        }
        if let Some(description) = changes.description {
            stored.description = description;
        }
        if let Some(permission_ids) = changes.permission_ids {
            stored.permission_ids = permission_ids;
        }
        let stored = stored.clone();
        Ok(Some(state.project(&stored)))
    }

    async fn set_role_permissions(
        &self,
        role_id: RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some(stored) = state.roles.iter_mut().find(|role| role.role_id == role_id) {
            stored.permission_ids = permission_ids.to_vec();
        }
        Ok(())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.roles.len();
        state.roles.retain(|role| role.role_id != role_id);
        state
            .assignments
            .retain(|assignment| assignment.role_id != role_id);
        for (group, _) in &mut state.groups {
            if group.role_id == Some(role_id) {
                group.role_id = None;
            }
        }
        Ok(state.roles.len() != before)
    }
}

#[async_trait]
impl AssignmentRepository for FakeRbacStore {
    async fn get_or_create_assignment(
        &self,
        user_id: UserId,
        role_id: RoleId,
        created_by: Option<UserId>,
    ) -> AppResult<(RoleAssignment, bool)> {
        let mut state = self.state.lock().await;
        if !state.users.iter().any(|user| user.id == user_id) {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        if let Some(existing) = state
            .assignments
            .iter()
            .find(|assignment| assignment.user_id == user_id && assignment.role_id == role_id)
        {
            let projected = state
                .project_assignment(existing)
                .ok_or_else(|| AppError::Internal("dangling assignment".to_owned()))?;
            return Ok((projected, false));
        }

        let stored = StoredAssignment {
            assignment_id: AssignmentId::new(),
            user_id,
            role_id,
            created_by,
        };
        state.assignments.push(stored.clone());
        let projected = state
            .project_assignment(&stored)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' does not exist")))?;
        Ok((projected, true))
    }

    async fn delete_assignments(&self, user_id: UserId, role_id: RoleId) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|assignment| !(assignment.user_id == user_id && assignment.role_id == role_id));
        Ok(u64::try_from(before - state.assignments.len()).unwrap_or_default())
    }

    async fn list_assignments_for_user(&self, user_id: UserId) -> AppResult<Vec<RoleAssignment>> {
        self.check_lookup()?;
        let state = self.state.lock().await;
        Ok(state
            .assignments
            .iter()
            .filter(|assignment| assignment.user_id == user_id)
            .filter_map(|assignment| state.project_assignment(assignment))
            .collect())
    }

    async fn list_roles_for_user(&self, user_id: UserId) -> AppResult<Vec<Role>> {
        self.check_lookup()?;
        Ok(self.state.lock().await.roles_for(user_id))
    }

    async fn user_has_role(&self, user_id: UserId, role_name: &str) -> AppResult<bool> {
        self.check_lookup()?;
        Ok(self
            .state
            .lock()
            .await
            .roles_for(user_id)
            .iter()
            .any(|role| role.name().as_str() == role_name))
    }

    async fn user_has_permission(&self, user_id: UserId, codename: &str) -> AppResult<bool> {
        self.check_lookup()?;
        Ok(self
            .state
            .lock()
            .await
            .roles_for(user_id)
            .iter()
            .any(|role| role.has_permission(codename)))
    }
}

#[async_trait]
impl PermissionCatalog for FakeRbacStore {
    async fn list_permissions(&self) -> AppResult<Vec<CatalogPermission>> {
        Ok(self.state.lock().await.catalog.clone())
    }

    async fn find_permission(&self, key: &PermissionKey) -> AppResult<Option<CatalogPermission>> {
        Ok(self
            .state
            .lock()
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
            .lock()
            .await
            .catalog
            .iter()
            .filter(|permission| permission_ids.contains(&permission.permission_id()))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BootstrapGroupRepository for FakeRbacStore {
    async fn get_or_create_group(&self, name: &str) -> AppResult<(BootstrapGroup, bool)> {
        let mut state = self.state.lock().await;
        if let Some((group, _)) = state.groups.iter().find(|(group, _)| group.name == name) {
            return Ok((group.clone(), false));
        }
        let group = BootstrapGroup {
            group_id: Uuid::new_v4(),
            name: name.to_owned(),
            role_id: None,
        };
        state.groups.push((group.clone(), Vec::new()));
        Ok((group, true))
    }

    async fn set_group_permissions(
        &self,
        group_id: Uuid,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some((_, granted)) = state
            .groups
            .iter_mut()
            .find(|(group, _)| group.group_id == group_id)
        {
            *granted = permission_ids.to_vec();
        }
        Ok(())
    }

    async fn link_group_role(&self, group_id: Uuid, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if let Some((group, _)) = state
            .groups
            .iter_mut()
            .find(|(group, _)| group.group_id == group_id)
        {
            group.role_id = Some(role_id);
        }
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for FakeRbacStore {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.state.lock().await.events.push(event);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeRbacStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .state
            .lock()
            .await
            .users
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut state = self.state.lock().await;
        if state
            .users
            .iter()
            .any(|existing| existing.email == user.email.as_str())
        {
            return Err(AppError::Conflict("email already registered".to_owned()));
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
        state.users.push(record.clone());
        Ok(record)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.users.len();
        state.users.retain(|user| user.id != user_id);
        state
            .assignments
            .retain(|assignment| assignment.user_id != user_id);
        for assignment in &mut state.assignments {
            if assignment.created_by == Some(user_id) {
                assignment.created_by = None;
            }
        }
        Ok(state.users.len() != before)
    }
}

/// Hasher that prefixes the plaintext, so tests can assert on stored hashes.
#[derive(Default)]
pub(crate) struct FakePasswordHasher {
    pub(crate) hash_calls: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

pub(crate) fn authorization(store: &Arc<FakeRbacStore>) -> AuthorizationService {
    AuthorizationService::new(store.clone())
}

pub(crate) fn guard(store: &Arc<FakeRbacStore>) -> AccessGuard {
    AccessGuard::new(authorization(store))
}

pub(crate) fn role_service(store: &Arc<FakeRbacStore>) -> RoleService {
    RoleService::new(store.clone(), store.clone())
}

pub(crate) fn assignment_service(store: &Arc<FakeRbacStore>) -> AssignmentService {
    AssignmentService::new(store.clone(), store.clone())
}

pub(crate) fn bootstrap_service(store: &Arc<FakeRbacStore>) -> RbacBootstrapService {
    RbacBootstrapService::new(store.clone(), store.clone(), store.clone())
}

pub(crate) fn admin_service(store: &Arc<FakeRbacStore>) -> RbacAdminService {
    RbacAdminService::new(
        guard(store),
        role_service(store),
        assignment_service(store),
        store.clone(),
    )
}

pub(crate) fn user_service(
    store: &Arc<FakeRbacStore>,
    hasher: Arc<FakePasswordHasher>,
) -> UserService {
    UserService::new(store.clone(), hasher, guard(store), store.clone())
}

pub(crate) fn anonymous() -> Principal {
    Principal::Anonymous
}

pub(crate) fn identity_of(principal: &Principal) -> UserIdentity {
    principal.identity().cloned().unwrap_or_else(|| unreachable!())
}
