//! # Service Bootstrap
//!
//! Assembles the application state from a [`ServiceConfig`].
//!
//! ## Bootstrap Sequence
//!
//! 1. **Load seed**: Read polygon and rule-set records into the in-memory
//!    entity store, if a seed file is configured.
//! 2. **Build cache**: One slot per region with location validation on.
//!    Nothing is fetched yet.
//! 3. **Select provider**: The active region's authority picks the value
//!    provider variant.
//! 4. **Wire router**: Manager, location filter and audit sinks.
//! 5. **Log identity**: Structured startup banner.

use std::path::Path;
use std::sync::Arc;

use paws_audit::{AuditTrail, Auditor, FanoutAuditor, TracingAuditor};
use paws_core::{EntityStore, InMemoryEntityStore, StoreSeed};
use paws_geo::RegionPolygonCache;
use paws_provider::RegionalValueProvider;

use crate::config::ServiceConfig;
use crate::driver::{SpectrumDriver, StaticSpectrumDriver};
use crate::filter::LocationFilter;
use crate::manager::PawsManager;
use crate::router::{RequestRouter, RouterConfig};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors while loading configuration or assembling the service.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Config or seed file not found.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// Config or seed file could not be parsed.
    #[error("invalid {what} in {path}: {reason}")]
    Parse {
        what: &'static str,
        path: String,
        reason: String,
    },

    /// Configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Build the application state with the in-memory store and the static
/// spectrum driver described by `config`.
pub fn bootstrap(config: ServiceConfig) -> Result<AppState, BootstrapError> {
    let store = match &config.seed {
        Some(path) => InMemoryEntityStore::from_seed(load_seed(path)?),
        None => InMemoryEntityStore::new(),
    };
    let driver = StaticSpectrumDriver::new(config.driver.clone());
    bootstrap_with(config, Arc::new(store), Arc::new(driver))
}

/// Build the application state over explicit collaborators.
pub fn bootstrap_with(
    config: ServiceConfig,
    store: Arc<dyn EntityStore>,
    driver: Arc<dyn SpectrumDriver>,
) -> Result<AppState, BootstrapError> {
    config.validate()?;
    let region = config
        .active_region_config()
        .cloned()
        .ok_or_else(|| BootstrapError::Invalid("no active region".to_string()))?;

    let cache = Arc::new(RegionPolygonCache::new(
        Arc::clone(&store),
        config.validated_regions(),
        config.cache_config(),
    ));

    let provider =
        RegionalValueProvider::for_authority(region.authority, region.code.clone(), store);
    let manager = PawsManager::new(
        Arc::new(provider),
        driver,
        config.paws_api_version.clone(),
        config.jsonrpc_version.clone(),
    );

    let audit_trail = Arc::new(AuditTrail::new(config.audit_capacity));
    let auditor = FanoutAuditor::new(vec![
        Arc::clone(&audit_trail) as Arc<dyn Auditor>,
        Arc::new(TracingAuditor),
    ]);

    let mut router = RequestRouter::new(
        Arc::new(manager),
        Arc::new(auditor),
        RouterConfig {
            jsonrpc_version: config.jsonrpc_version.clone(),
            request_timeout: config.request_timeout(),
            expose_fault_details: config.expose_fault_details,
        },
    );
    if region.location_validation {
        router = router.with_location_filter(LocationFilter::new(
            Arc::clone(&cache),
            region.code.clone(),
        ));
    }

    tracing::info!(
        region = %region.code,
        authority = region.authority.as_str(),
        location_validation = region.location_validation,
        validated_regions = config.validated_regions().len(),
        paws_version = %config.paws_api_version,
        culture = %config.culture,
        "PAWS service bootstrapped"
    );

    Ok(AppState {
        config: Arc::new(config),
        router: Arc::new(router),
        cache,
        audit_trail,
    })
}

/// Parse a seed file. YAML is a superset of JSON, so either format loads.
pub fn load_seed(path: &Path) -> Result<StoreSeed, BootstrapError> {
    if !path.exists() {
        return Err(BootstrapError::NotFound {
            path: path.display().to_string(),
        });
    }
    let text = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&text).map_err(|e| BootstrapError::Parse {
        what: "seed",
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
