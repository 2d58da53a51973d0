use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::UserIdentityResponse;

/// Incoming payload for email/password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-request.ts"
)]
pub struct AuthLoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response carrying the established identity.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/auth-login-response.ts"
)]
pub struct AuthLoginResponse {
    pub status: String,
    pub user: UserIdentityResponse,
}
