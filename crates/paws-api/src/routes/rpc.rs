//! # PAWS JSON-RPC Endpoint
//!
//! The body is handed to the router as raw bytes so that malformed JSON
//! still gets a protocol-level `-201` answer instead of an HTTP rejection.
//! Every protocol outcome, error or not, is returned with HTTP 200.

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use paws_core::ResponseEnvelope;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/paws", post(handle))
        .route("/", post(handle))
}

/// POST /paws: route one PAWS request.
async fn handle(State(state): State<AppState>, body: Bytes) -> Json<ResponseEnvelope> {
    Json(state.router.handle_request(&body).await)
}
