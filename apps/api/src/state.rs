use sqlx::PgPool;
use tasklane_application::{
    AssignmentService, AuthorizationService, RbacAdminService, RbacBootstrapService, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub authorization_service: AuthorizationService,
    pub assignment_service: AssignmentService,
    pub rbac_admin_service: RbacAdminService,
    pub rbac_bootstrap_service: RbacBootstrapService,
    pub user_service: UserService,
    pub postgres_pool: PgPool,
    pub frontend_url: String,
}
