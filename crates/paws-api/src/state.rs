//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor. Everything in it is behind an `Arc`, so
//! cloning per request is cheap.

use std::sync::Arc;

use paws_audit::AuditTrail;
use paws_geo::RegionPolygonCache;

use crate::config::ServiceConfig;
use crate::router::RequestRouter;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub router: Arc<RequestRouter>,
    /// Polygon cache behind the router's location filter. Held here for the
    /// readiness probe and shutdown.
    pub cache: Arc<RegionPolygonCache>,
    pub audit_trail: Arc<AuditTrail>,
}

impl AppState {
    /// Ready once the polygon cache has been built, or immediately when no
    /// region has location validation enabled.
    pub fn is_ready(&self) -> bool {
        self.cache.enabled_regions().is_empty() || self.cache.is_initialized()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("active_region", &self.config.active_region)
            .field("router", &self.router)
            .field("cache", &self.cache)
            .field("audit_records", &self.audit_trail.len())
            .finish()
    }
}
