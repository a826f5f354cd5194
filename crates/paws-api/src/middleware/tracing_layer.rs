//! # Request/Response Tracing
//!
//! Configures `tower_http::trace::TraceLayer` so every HTTP request runs in
//! a `paws_request` span carrying the HTTP method, URI and a request id.
//! The span also declares an empty `rpc_method` field; the request router
//! records the PAWS wire method into it once the envelope is decoded, so
//! every log line of a call can be correlated by id and PAWS method.
//!
//! PAWS errors travel inside HTTP 200 bodies, so only 5xx responses are
//! classified as failures here. Protocol failures show up in the audit
//! trail instead.

use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::Level;

/// Header a caller may set to choose its own request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Span field the router fills with the PAWS wire method.
pub const RPC_METHOD_FIELD: &str = "rpc_method";

/// Builds the per-request `paws_request` span.
#[derive(Debug, Clone, Copy, Default)]
pub struct PawsMakeSpan;

impl<B> MakeSpan<B> for PawsMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        tracing::info_span!(
            "paws_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id(request),
            rpc_method = tracing::field::Empty,
        )
    }
}

/// The caller's `x-request-id` if it is valid text, otherwise a fresh UUID.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Build the `TraceLayer` for the PAWS HTTP surface.
pub fn layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    PawsMakeSpan,
    DefaultOnRequest,
    DefaultOnResponse,
> {
    TraceLayer::new_for_http()
        .make_span_with(PawsMakeSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}
