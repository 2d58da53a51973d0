use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tasklane_core::{Principal, UserId};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;

/// DELETE /api/users/{user_id} - Removes an account together with its role assignments.
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete_user(&principal, UserId::from_uuid(user_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
