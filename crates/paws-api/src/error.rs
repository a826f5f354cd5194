//! # Router and HTTP Errors
//!
//! [`RouterError`] covers the faults the request router catches at its
//! boundary; each is converted into a `-201` protocol response, never an
//! HTTP error. [`AppError`] is for the non-protocol endpoints, which use
//! ordinary HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use paws_core::RequestEnvelope;
use thiserror::Error;

use crate::manager::ManagerError;

/// The request body could not be read as a JSON-RPC envelope.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("body is not a JSON object")]
    NotAnObject,

    #[error("malformed request envelope: {0}")]
    Envelope(#[source] serde_json::Error),
}

/// Faults caught at the router boundary.
#[derive(Error, Debug)]
pub enum RouterError {
    #[error(transparent)]
    Manager(#[from] ManagerError),

    #[error("request deadline of {0} ms exceeded")]
    Timeout(u128),

    #[error("request handler panicked")]
    Panicked,

    #[error("request handler was cancelled")]
    Cancelled,
}

/// A decode attempt. The request id is recovered whenever the body is a
/// JSON object, so even a malformed envelope gets its id echoed.
#[derive(Debug)]
pub struct Decoded {
    pub id: Option<serde_json::Value>,
    pub request: Result<RequestEnvelope, DecodeError>,
}

pub fn decode(raw: &[u8]) -> Decoded {
    let value: serde_json::Value = match serde_json::from_slice(raw) {
        Ok(v) => v,
        Err(e) => {
            return Decoded {
                id: None,
                request: Err(DecodeError::Json(e)),
            }
        }
    };
    let Some(object) = value.as_object() else {
        return Decoded {
            id: None,
            request: Err(DecodeError::NotAnObject),
        };
    };
    let id = object.get("id").cloned();
    Decoded {
        id,
        request: serde_json::from_value(value).map_err(DecodeError::Envelope),
    }
}

// ---------------------------------------------------------------------------
// HTTP errors for the auxiliary endpoints
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
