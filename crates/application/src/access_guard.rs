use tasklane_core::{AppError, AppResult, Principal, UserIdentity};
use tasklane_domain::{AccessDecision, DenialReason};

use crate::AuthorizationService;

#[cfg(test)]
mod tests;

/// Turns authorization predicates into `AppError`s for handlers and services.
///
/// Unauthenticated callers get `Unauthorized`, authenticated callers lacking
/// access get `Forbidden`. Mapping to HTTP stays in the API layer.
#[derive(Clone)]
pub struct AccessGuard {
    authorization_service: AuthorizationService,
}

impl AccessGuard {
    /// Creates a guard over the predicate service.
    #[must_use]
    pub fn new(authorization_service: AuthorizationService) -> Self {
        Self {
            authorization_service,
        }
    }

    /// Returns the predicate service backing this guard.
    #[must_use]
    pub fn authorization_service(&self) -> &AuthorizationService {
        &self.authorization_service
    }

    /// Requires a logged in user.
    pub fn require_authenticated<'a>(
        &self,
        principal: &'a Principal,
    ) -> AppResult<&'a UserIdentity> {
        principal
            .identity()
            .ok_or_else(|| AppError::Unauthorized(DenialReason::Unauthenticated.to_string()))
    }

    /// Requires the permission, with the superuser bypass of the predicate.
    pub async fn require_permission(&self, principal: &Principal, codename: &str) -> AppResult<()> {
        let decision = self
            .authorization_service
            .check_permission(principal, codename)
            .await;
        decision_to_result(decision)
    }

    /// Requires any of the listed roles. Superusers always pass.
    pub async fn require_any_role(
        &self,
        principal: &Principal,
        role_names: &[&str],
    ) -> AppResult<()> {
        let identity = self.require_authenticated(principal)?;
        if identity.is_superuser() {
            return Ok(());
        }

        for role_name in role_names {
            match self
                .authorization_service
                .check_role(principal, role_name)
                .await
            {
                AccessDecision::Allowed => return Ok(()),
                AccessDecision::Denied(DenialReason::LookupFailed) => {
                    return decision_to_result(AccessDecision::Denied(DenialReason::LookupFailed));
                }
                AccessDecision::Denied(_) => {}
            }
        }

        Err(AppError::Forbidden(format!(
            "one of the roles [{}] is required",
            role_names.join(", ")
        )))
    }

    /// Requires a staff account.
    pub fn require_staff(&self, principal: &Principal) -> AppResult<()> {
        let identity = self.require_authenticated(principal)?;
        if identity.is_staff() {
            return Ok(());
        }

        Err(AppError::Forbidden("staff access is required".to_owned()))
    }
}

fn decision_to_result(decision: AccessDecision) -> AppResult<()> {
    match decision {
        AccessDecision::Allowed => Ok(()),
        AccessDecision::Denied(DenialReason::Unauthenticated) => Err(AppError::Unauthorized(
            DenialReason::Unauthenticated.to_string(),
        )),
        AccessDecision::Denied(reason) => Err(AppError::Forbidden(reason.to_string())),
    }
}
