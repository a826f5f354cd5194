//! # HTTP Route Modules
//!
//! - `rpc`: the PAWS JSON-RPC endpoint.
//! - `health`: liveness and readiness probes.
//! - `audit`: read-only view of recent audit records.

pub mod audit;
pub mod health;
pub mod rpc;
