use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tasklane_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::{AccessContextResponse, MeResponse, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{session_principal, stored_identity};

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let identity = stored_identity(&session).await?;

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(identity) = identity {
        info!(user_id = %identity.user_id(), "user logged out");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Current user and the access snapshot used by the frontend.
pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<MeResponse>> {
    let principal = session_principal(&state, &session).await?;
    let access = state
        .authorization_service
        .access_context(&principal)
        .await;

    Ok(Json(MeResponse {
        user: principal.identity().map(UserIdentityResponse::from),
        access: AccessContextResponse::from(access),
    }))
}
