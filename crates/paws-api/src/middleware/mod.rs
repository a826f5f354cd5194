//! # HTTP Middleware
//!
//! - `tracing_layer`: `paws_request` spans with request id and PAWS method.

pub mod tracing_layer;
