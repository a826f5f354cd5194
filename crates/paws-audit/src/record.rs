//! # Audit Records

use chrono::{DateTime, Utc};
use paws_core::AuditId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// AuditStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
    Success,
    Failure,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failure => "Failure",
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditRecord
// ---------------------------------------------------------------------------

/// One audited unit of work. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: Uuid,
    pub audit_id: AuditId,
    pub status: AuditStatus,
    pub elapsed_ms: u64,
    pub message: String,
    /// UTC time the record was created.
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    /// Create a new record stamped with the current UTC time.
    pub fn new(
        audit_id: AuditId,
        status: AuditStatus,
        elapsed_ms: u64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            audit_id,
            status,
            elapsed_ms,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == AuditStatus::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_creation() {
        let rec = AuditRecord::new(AuditId::PawsInitReq, AuditStatus::Success, 12, "ok");
        assert_eq!(rec.audit_id, AuditId::PawsInitReq);
        assert!(!rec.is_failure());
        assert_eq!(rec.elapsed_ms, 12);
    }

    #[test]
    fn record_serializes_wire_tags() {
        let rec = AuditRecord::new(AuditId::PawsInvalidMethod, AuditStatus::Failure, 0, "bad");
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["auditId"], "PAWSInvalidMethod");
        assert_eq!(json["status"], "Failure");
        assert_eq!(json["elapsedMs"], 0);
    }

    #[test]
    fn records_get_distinct_ids() {
        let a = AuditRecord::new(AuditId::PawsValidReq, AuditStatus::Success, 1, "");
        let b = AuditRecord::new(AuditId::PawsValidReq, AuditStatus::Success, 1, "");
        assert_ne!(a.id, b.id);
    }
}
