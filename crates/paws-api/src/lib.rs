//! # paws-api — PAWS JSON-RPC Service
//!
//! Hosts the PAWS request router over HTTP. A request is decoded, its
//! method resolved, its location checked against the active region's
//! polygons, and it is then dispatched to the business manager, which
//! validates it and consults the spectrum driver. Every call is audited.
//!
//! ## API Surface
//!
//! | Route                  | Module               | Purpose                  |
//! |------------------------|----------------------|--------------------------|
//! | `POST /paws`, `POST /` | [`routes::rpc`]      | PAWS JSON-RPC            |
//! | `GET /health/*`        | [`routes::health`]   | Liveness and readiness   |
//! | `GET /v1/audit/recent` | [`routes::audit`]    | Recent audit records     |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - Protocol outcomes are data. Handlers on `/paws` never return an HTTP
//!   error status.
//! - Blocking store and driver work runs on the blocking pool.
//! - No `.unwrap()` outside tests.

pub mod bootstrap;
pub mod config;
pub mod driver;
pub mod error;
pub mod filter;
pub mod manager;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod validation;

use axum::Router;

use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::rpc::router())
        .merge(routes::audit::router())
        .layer(middleware::tracing_layer::layer())
        .with_state(state)
}
