use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

mod repositories;
mod security;
mod users;

pub(crate) use repositories::RepositorySet;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let repositories = RepositorySet::postgres(&pool);
    assemble_app_state(&repositories, pool, config.frontend_url.clone())
}

pub(crate) fn assemble_app_state(
    repositories: &RepositorySet,
    postgres_pool: PgPool,
    frontend_url: String,
) -> AppState {
    let rbac_services = security::build_rbac_services(repositories);
    let user_service = users::build_user_service(repositories, rbac_services.access_guard.clone());

    AppState {
        authorization_service: rbac_services.authorization_service,
        assignment_service: rbac_services.assignment_service,
        rbac_admin_service: rbac_services.rbac_admin_service,
        rbac_bootstrap_service: rbac_services.rbac_bootstrap_service,
        user_service,
        postgres_pool,
        frontend_url,
    }
}
