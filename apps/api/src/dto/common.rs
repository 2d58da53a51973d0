use serde::Serialize;
use tasklane_application::AccessContext;
use tasklane_core::UserIdentity;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub postgres: &'static str,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub is_superuser: bool,
    pub is_staff: bool,
}

impl From<&UserIdentity> for UserIdentityResponse {
    fn from(identity: &UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            email: identity.email().to_owned(),
            display_name: identity.display_name().to_owned(),
            is_superuser: identity.is_superuser(),
            is_staff: identity.is_staff(),
        }
    }
}

/// Role and permission snapshot the frontend uses to toggle controls.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/access-context-response.ts"
)]
pub struct AccessContextResponse {
    pub authenticated: bool,
    pub is_superuser: bool,
    pub is_staff: bool,
    pub is_admin: bool,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<AccessContext> for AccessContextResponse {
    fn from(value: AccessContext) -> Self {
        Self {
            authenticated: value.authenticated,
            is_superuser: value.is_superuser,
            is_staff: value.is_staff,
            is_admin: value.is_admin,
            roles: value.roles.into_iter().collect(),
            permissions: value.permissions.into_iter().collect(),
        }
    }
}

/// Payload of `GET /auth/me`.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/me-response.ts"
)]
pub struct MeResponse {
    pub user: Option<UserIdentityResponse>,
    pub access: AccessContextResponse,
}
