use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let check = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.postgres_pool)
        .await;

    match check {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                postgres: "ok",
            }),
        ),
        Err(error) => {
            warn!(%error, "postgres health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    postgres: "error",
                }),
            )
        }
    }
}
