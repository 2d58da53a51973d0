use std::sync::Arc;

use tasklane_core::Principal;
use tasklane_domain::{AccessDecision, DenialReason};

use crate::AssignmentRepository;

mod access_context;


pub use access_context::AccessContext;

/// Read-only role and permission predicates over the assignment store.
///
/// Predicates are total: lookup failures are logged and resolve to a denial.
#[derive(Clone)]
pub struct AuthorizationService {
    assignment_repository: Arc<dyn AssignmentRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from a repository implementation.
    #[must_use]
    pub fn new(assignment_repository: Arc<dyn AssignmentRepository>) -> Self {
        Self {
            assignment_repository,
        }
    }

    /// Decides whether the principal holds a role with exactly this name.
    ///
    /// Superusers get no special treatment here.
    pub async fn check_role(&self, principal: &Principal, role_name: &str) -> AccessDecision {
        let Some(user_id) = principal.user_id() else {
            return AccessDecision::Denied(DenialReason::Unauthenticated);
        };

        match self
            .assignment_repository
            .user_has_role(user_id, role_name)
            .await
        {
            Ok(true) => AccessDecision::Allowed,
            Ok(false) => AccessDecision::Denied(DenialReason::MissingRole(role_name.to_owned())),
            Err(error) => {
                tracing::warn!(%user_id, role_name, %error, "role lookup failed");
                AccessDecision::Denied(DenialReason::LookupFailed)
            }
        }
    }

    /// Decides whether any role held by the principal grants `codename`.
    ///
    /// Superusers are always allowed.
    pub async fn check_permission(&self, principal: &Principal, codename: &str) -> AccessDecision {
        let Some(user_id) = principal.user_id() else {
            return AccessDecision::Denied(DenialReason::Unauthenticated);
        };

        if principal.is_superuser() {
            return AccessDecision::Allowed;
        }

        match self
            .assignment_repository
            .user_has_permission(user_id, codename)
            .await
        {
            Ok(true) => AccessDecision::Allowed,
            Ok(false) => {
                AccessDecision::Denied(DenialReason::MissingPermission(codename.to_owned()))
            }
            Err(error) => {
                tracing::warn!(%user_id, codename, %error, "permission lookup failed");
                AccessDecision::Denied(DenialReason::LookupFailed)
            }
        }
    }

    /// Returns whether the principal holds the role.
    pub async fn user_has_role(&self, principal: &Principal, role_name: &str) -> bool {
        self.check_role(principal, role_name).await.is_allowed()
    }

    /// Returns whether the principal has the permission.
    pub async fn user_has_permission(&self, principal: &Principal, codename: &str) -> bool {
        self.check_permission(principal, codename).await.is_allowed()
    }

    /// Loads the role and permission snapshot used by presentation layers.
    pub async fn access_context(&self, principal: &Principal) -> AccessContext {
        let Some(user_id) = principal.user_id() else {
            return AccessContext::anonymous();
        };

        let roles = match self.assignment_repository.list_roles_for_user(user_id).await {
            Ok(roles) => roles,
            Err(error) => {
                tracing::warn!(%user_id, %error, "role snapshot lookup failed");
                Vec::new()
            }
        };

        AccessContext::for_user(principal.is_superuser(), principal.is_staff(), &roles)
    }
}
