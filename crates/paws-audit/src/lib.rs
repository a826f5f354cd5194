//! # paws-audit — Audit Trail for PAWS Business Calls
//!
//! Every routed request produces exactly one [`AuditRecord`], tagged with the
//! [`AuditId`](paws_core::AuditId) of the method it invoked (or
//! `PAWSInvalidMethod` when no method matched). Records are fire-and-forget:
//! an [`Auditor`] never fails the call it describes.
//!
//! ## Key Design Principles
//!
//! 1. **One record per unit of work.** [`AuditedOperation`] emits on
//!    `succeed`/`fail`, and emits a failure from `Drop` if neither was
//!    reached (panic, cancellation).
//!
//! 2. **Sinks are pluggable.** [`AuditTrail`] keeps a bounded in-memory
//!    history for the HTTP surface; [`TracingAuditor`] writes structured log
//!    events; [`FanoutAuditor`] sends to several sinks.

pub mod operation;
pub mod record;
pub mod sink;

pub use operation::{audit_target, AuditedOperation};
pub use record::{AuditRecord, AuditStatus};
pub use sink::{AuditTrail, Auditor, FanoutAuditor, TracingAuditor};
