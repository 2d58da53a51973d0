use std::sync::Arc;

use tasklane_core::{AppResult, Principal, UserId};
use tasklane_domain::AuditAction;

use crate::{AccessGuard, AssignmentService, AuditEvent, AuditRepository, RoleService};

mod assignments;
mod roles;


/// Maximum number of suggestions returned by role autocomplete.
const AUTOCOMPLETE_LIMIT: usize = 10;

/// Staff-only management surface over roles and assignments.
///
/// Every mutation emits an audit event attributed to the acting user.
#[derive(Clone)]
pub struct RbacAdminService {
    access_guard: AccessGuard,
    role_service: RoleService,
    assignment_service: AssignmentService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl RbacAdminService {
    /// Creates a new management service.
    #[must_use]
    pub fn new(
        access_guard: AccessGuard,
        role_service: RoleService,
        assignment_service: AssignmentService,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            access_guard,
            role_service,
            assignment_service,
            audit_repository,
        }
    }

    async fn record(
        &self,
        actor: &Principal,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) -> AppResult<()> {
        self.audit_repository
            .append_event(AuditEvent {
                actor: actor.user_id(),
                action,
                resource_type: resource_type.to_owned(),
                resource_id,
                detail: Some(detail),
            })
            .await
    }
}

fn assignment_resource_id(user_id: UserId, role_name: &str) -> String {
    format!("{user_id}:{role_name}")
}
