//! # Audit Sinks
//!
//! [`AuditTrail`] is a bounded in-memory history: when it exceeds capacity
//! the oldest 10% of records are trimmed. Trimmed records survive only in
//! whatever other sink received them (normally the log via
//! [`TracingAuditor`]).

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use paws_core::AuditId;

use crate::record::{AuditRecord, AuditStatus};

/// Destination for audit records. Implementations must not block for long
/// and must not fail the caller.
pub trait Auditor: Send + Sync {
    fn audit(&self, record: AuditRecord);
}

// ---------------------------------------------------------------------------
// TracingAuditor
// ---------------------------------------------------------------------------

/// Emits each record as a structured `tracing` event on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditor;

impl Auditor for TracingAuditor {
    fn audit(&self, record: AuditRecord) {
        match record.status {
            AuditStatus::Success => tracing::info!(
                target: "audit",
                audit_id = %record.audit_id,
                status = %record.status,
                elapsed_ms = record.elapsed_ms,
                message = %record.message,
                "audit"
            ),
            AuditStatus::Failure => tracing::warn!(
                target: "audit",
                audit_id = %record.audit_id,
                status = %record.status,
                elapsed_ms = record.elapsed_ms,
                message = %record.message,
                "audit"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// AuditTrail
// ---------------------------------------------------------------------------

/// Thread-safe bounded audit history.
pub struct AuditTrail {
    records: Mutex<VecDeque<AuditRecord>>,
    max_records: usize,
}

impl AuditTrail {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            max_records: max_records.max(1),
        }
    }

    pub fn append(&self, record: AuditRecord) {
        let mut records = self.records.lock();
        records.push_back(record);
        if records.len() > self.max_records {
            let trim_count = (self.max_records / 10).max(1);
            records.drain(..trim_count);
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_records
    }

    /// The last `n` records, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<AuditRecord> {
        let records = self.records.lock();
        let start = records.len().saturating_sub(n);
        records.iter().skip(start).cloned().collect()
    }

    pub fn records_by_id(&self, audit_id: AuditId) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.audit_id == audit_id)
            .cloned()
            .collect()
    }

    pub fn failures(&self) -> Vec<AuditRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.is_failure())
            .cloned()
            .collect()
    }
}

impl Auditor for AuditTrail {
    fn audit(&self, record: AuditRecord) {
        self.append(record);
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl std::fmt::Debug for AuditTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditTrail")
            .field("records", &self.len())
            .field("max_records", &self.max_records)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// FanoutAuditor
// ---------------------------------------------------------------------------

/// Sends every record to each inner sink in order.
#[derive(Clone, Default)]
pub struct FanoutAuditor {
    sinks: Vec<Arc<dyn Auditor>>,
}

impl FanoutAuditor {
    pub fn new(sinks: Vec<Arc<dyn Auditor>>) -> Self {
        Self { sinks }
    }

    pub fn with(mut self, sink: Arc<dyn Auditor>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl Auditor for FanoutAuditor {
    fn audit(&self, record: AuditRecord) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.audit(record.clone());
            }
            last.audit(record);
        }
    }
}

impl std::fmt::Debug for FanoutAuditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanoutAuditor")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
