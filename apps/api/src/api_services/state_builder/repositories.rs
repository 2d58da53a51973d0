use std::sync::Arc;

use sqlx::PgPool;
use tasklane_application::{
    AssignmentRepository, AuditRepository, BootstrapGroupRepository, PermissionCatalog,
    RoleRepository, UserRepository,
};
use tasklane_infrastructure::{
    PostgresAuditRepository, PostgresRbacRepository, PostgresUserRepository,
};

pub(crate) struct RepositorySet {
    pub(crate) role_repository: Arc<dyn RoleRepository>,
    pub(crate) assignment_repository: Arc<dyn AssignmentRepository>,
    pub(crate) permission_catalog: Arc<dyn PermissionCatalog>,
    pub(crate) group_repository: Arc<dyn BootstrapGroupRepository>,
    pub(crate) user_repository: Arc<dyn UserRepository>,
    pub(crate) audit_repository: Arc<dyn AuditRepository>,
}

impl RepositorySet {
    pub(crate) fn postgres(pool: &PgPool) -> Self {
        let rbac_repository = Arc::new(PostgresRbacRepository::new(pool.clone()));

        Self {
            role_repository: rbac_repository.clone(),
            assignment_repository: rbac_repository.clone(),
            permission_catalog: rbac_repository.clone(),
            group_repository: rbac_repository,
            user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
        }
    }

    #[cfg(test)]
    pub(crate) fn in_memory(
        repository: Arc<tasklane_infrastructure::InMemoryRbacRepository>,
    ) -> Self {
        Self {
            role_repository: repository.clone(),
            assignment_repository: repository.clone(),
            permission_catalog: repository.clone(),
            group_repository: repository.clone(),
            user_repository: repository.clone(),
            audit_repository: repository,
        }
    }
}
