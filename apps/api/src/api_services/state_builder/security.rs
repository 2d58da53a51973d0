use tasklane_application::{
    AccessGuard, AssignmentService, AuthorizationService, RbacAdminService, RbacBootstrapService,
    RoleService,
};

use super::repositories::RepositorySet;

pub(super) struct RbacServices {
    pub(super) authorization_service: AuthorizationService,
    pub(super) access_guard: AccessGuard,
    pub(super) assignment_service: AssignmentService,
    pub(super) rbac_admin_service: RbacAdminService,
    pub(super) rbac_bootstrap_service: RbacBootstrapService,
}

pub(super) fn build_rbac_services(repositories: &RepositorySet) -> RbacServices {
    let authorization_service =
        AuthorizationService::new(repositories.assignment_repository.clone());
    let access_guard = AccessGuard::new(authorization_service.clone());

    let role_service = RoleService::new(
        repositories.role_repository.clone(),
        repositories.permission_catalog.clone(),
    );
    let assignment_service = AssignmentService::new(
        repositories.role_repository.clone(),
        repositories.assignment_repository.clone(),
    );

    let rbac_admin_service = RbacAdminService::new(
        access_guard.clone(),
        role_service,
        assignment_service.clone(),
        repositories.audit_repository.clone(),
    );
    let rbac_bootstrap_service = RbacBootstrapService::new(
        repositories.role_repository.clone(),
        repositories.permission_catalog.clone(),
        repositories.group_repository.clone(),
    );

    RbacServices {
        authorization_service,
        access_guard,
        assignment_service,
        rbac_admin_service,
        rbac_bootstrap_service,
    }
}
