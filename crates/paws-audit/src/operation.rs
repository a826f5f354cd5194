//! # Audited Operations
//!
//! A stopwatch around one unit of work that reports exactly one
//! [`AuditRecord`] to an [`Auditor`].

use std::sync::Arc;
use std::time::Instant;

use paws_core::{AuditId, PawsMethod};

use crate::record::{AuditRecord, AuditStatus};
use crate::sink::Auditor;

/// Audit tag and label for a wire method name. Anything that is not one of
/// the seven PAWS methods audits as `PAWSInvalidMethod`.
pub fn audit_target(method: Option<&str>) -> (AuditId, &'static str) {
    match method.and_then(PawsMethod::from_wire) {
        Some(m) => m.audit(),
        None => (AuditId::PawsInvalidMethod, "invalid PAWS method"),
    }
}

/// An in-progress audited unit of work.
///
/// Finish it with [`succeed`](Self::succeed) or [`fail`](Self::fail). If it
/// is dropped unfinished (a panic unwound through it, or its future was
/// cancelled) a failure record is emitted instead.
pub struct AuditedOperation {
    auditor: Arc<dyn Auditor>,
    audit_id: AuditId,
    label: &'static str,
    started: Instant,
    finished: bool,
}

impl AuditedOperation {
    pub fn start(auditor: Arc<dyn Auditor>, audit_id: AuditId, label: &'static str) -> Self {
        Self {
            auditor,
            audit_id,
            label,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Start an operation for a wire method name.
    pub fn for_method(auditor: Arc<dyn Auditor>, method: Option<&str>) -> Self {
        let (audit_id, label) = audit_target(method);
        Self::start(auditor, audit_id, label)
    }

    pub fn audit_id(&self) -> AuditId {
        self.audit_id
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn succeed(mut self, message: impl AsRef<str>) {
        self.emit(AuditStatus::Success, message.as_ref());
    }

    pub fn fail(mut self, message: impl AsRef<str>) {
        self.emit(AuditStatus::Failure, message.as_ref());
    }

    fn emit(&mut self, status: AuditStatus, message: &str) {
        if self.finished {
            return;
        }
        self.finished = true;
        let message = if message.is_empty() {
            self.label.to_string()
        } else {
            format!("{}: {message}", self.label)
        };
        self.auditor.audit(AuditRecord::new(
            self.audit_id,
            status,
            self.elapsed_ms(),
            message,
        ));
    }
}

impl Drop for AuditedOperation {
    fn drop(&mut self) {
        if !self.finished {
            self.emit(AuditStatus::Failure, "operation did not complete");
        }
    }
}

impl std::fmt::Debug for AuditedOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditedOperation")
            .field("audit_id", &self.audit_id)
            .field("finished", &self.finished)
            .finish()
    }
}
