use std::sync::Arc;

use tasklane_application::{AccessGuard, UserService};
use tasklane_infrastructure::Argon2PasswordHasher;

use super::repositories::RepositorySet;

pub(super) fn build_user_service(
    repositories: &RepositorySet,
    access_guard: AccessGuard,
) -> UserService {
    UserService::new(
        repositories.user_repository.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        access_guard,
        repositories.audit_repository.clone(),
    )
}
