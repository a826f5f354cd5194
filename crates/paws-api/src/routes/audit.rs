//! # Audit Console
//!
//! Read-only access to the in-memory audit trail, newest records last.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use paws_audit::AuditRecord;
use paws_core::AuditId;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    /// Only records with this audit tag, e.g. `PAWSInitReq`.
    #[serde(default)]
    pub audit_id: Option<String>,
    #[serde(default)]
    pub failures_only: bool,
}

#[derive(Debug, Serialize)]
pub struct RecentResponse {
    pub count: usize,
    pub capacity: usize,
    pub records: Vec<AuditRecord>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/v1/audit/recent", get(recent))
}

/// GET /v1/audit/recent: the most recent audit records.
async fn recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RecentResponse>, AppError> {
    let trail = &state.audit_trail;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > trail.capacity() {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            trail.capacity()
        )));
    }
    let audit_id = query.audit_id.as_deref().map(parse_audit_id).transpose()?;

    let mut records: Vec<AuditRecord> = match audit_id {
        Some(id) => trail.records_by_id(id),
        None => trail.last_n(trail.capacity()),
    };
    if query.failures_only {
        records.retain(AuditRecord::is_failure);
    }
    let skip = records.len().saturating_sub(limit);
    let records: Vec<AuditRecord> = records.into_iter().skip(skip).collect();

    Ok(Json(RecentResponse {
        count: records.len(),
        capacity: trail.capacity(),
        records,
    }))
}

fn parse_audit_id(raw: &str) -> Result<AuditId, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| AppError::Validation(format!("unknown audit id {raw:?}")))
}
