use tasklane_core::{AppError, Principal, UserIdentity};
use tower_sessions::Session;
use tracing::warn;

use crate::state::AppState;

mod login;
mod session;

pub use login::login_handler;
pub use session::{logout_handler, me_handler};

pub const SESSION_USER_KEY: &str = "user_identity";
/// Absolute session creation timestamp.
pub const SESSION_CREATED_AT_KEY: &str = "session_created_at";

/// Identity written by the login handler, if any.
pub async fn stored_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}

/// Resolves the request principal, reloading the account behind the session.
///
/// Sessions without an identity are anonymous. A session whose account was deleted
/// or deactivated is flushed and rejected; changed superuser or staff flags are
/// written back so the session mirrors the user directory.
pub async fn session_principal(state: &AppState, session: &Session) -> Result<Principal, AppError> {
    let Some(identity) = stored_identity(session).await? else {
        return Ok(Principal::Anonymous);
    };

    let principal = state.user_service.current_principal(&identity).await?;
    match principal.identity() {
        None => {
            session.flush().await.map_err(|error| {
                AppError::Internal(format!("failed to flush session: {error}"))
            })?;
            warn!(user_id = %identity.user_id(), "session dropped for unavailable account");
            return Err(AppError::Unauthorized(
                "session account is no longer available".to_owned(),
            ));
        }
        Some(current) if current != &identity => {
            session
                .insert(SESSION_USER_KEY, current)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to refresh session identity: {error}"))
                })?;
        }
        Some(_) => {}
    }

    Ok(principal)
}
