use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tasklane_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/rbac/roles",
            get(handlers::rbac::list_roles_handler).post(handlers::rbac::create_role_handler),
        )
        .route(
            "/api/rbac/roles/autocomplete",
            get(handlers::rbac::autocomplete_roles_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}",
            get(handlers::rbac::get_role_handler)
                .put(handlers::rbac::update_role_handler)
                .delete(handlers::rbac::delete_role_handler),
        )
        .route(
            "/api/rbac/roles/{role_id}/permissions",
            get(handlers::rbac::list_role_permissions_handler),
        )
        .route(
            "/api/rbac/permissions",
            get(handlers::rbac::list_permissions_handler),
        )
        .route(
            "/api/rbac/users/{user_id}/roles",
            get(handlers::rbac::list_user_roles_handler)
                .post(handlers::rbac::assign_user_role_handler),
        )
        .route(
            "/api/rbac/users/{user_id}/roles/{role_name}",
            delete(handlers::rbac::revoke_user_role_handler),
        )
        .route(
            "/api/rbac/users/{user_id}/available-roles",
            get(handlers::rbac::available_roles_handler),
        )
        .route(
            "/api/users/{user_id}",
            delete(handlers::users::delete_user_handler),
        )
        .route_layer(from_fn_with_state(app_state.clone(), middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/auth/me", get(auth::me_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}

fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
        .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE]))
}
