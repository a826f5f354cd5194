//! Liveness and readiness probes.

use axum::extract::State;
use axum::routing::get;
use axum::Router;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 503 until the polygon cache has been built.
async fn readiness(State(state): State<AppState>) -> Result<&'static str, AppError> {
    if state.is_ready() {
        Ok("ready")
    } else {
        Err(AppError::Unavailable(
            "region polygon cache not initialized".to_string(),
        ))
    }
}
