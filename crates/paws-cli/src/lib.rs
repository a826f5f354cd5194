//! # paws-cli — Operator CLI for the PAWS Service
//!
//! Offline tools over the same configuration and seed files the service
//! reads.
//!
//! ## Subcommands
//!
//! - `paws check-location`: Is a point inside a region's polygons?
//! - `paws inspect-polygons`: Parse and summarize stored polygon records.
//! - `paws request`: Route JSON-RPC request files through an in-process
//!   router and print the responses.
//!
//! ```bash
//! paws --config deploy/paws.yaml check-location --lat 35.0 --lon -95.0
//! paws --seed deploy/seed.yaml inspect-polygons --region US
//! paws --config deploy/paws.yaml request register.json init.json
//! ```

pub mod check_location;
pub mod inspect;
pub mod request;

use std::path::Path;

use anyhow::{Context, Result};
use paws_api::bootstrap::load_seed;
use paws_api::config::ServiceConfig;
use paws_core::{InMemoryEntityStore, RegionCode};

/// Load the service configuration, or the defaults when no file is given.
/// A `seed` argument replaces the file's seed path.
pub fn load_service_config(config: Option<&Path>, seed: Option<&Path>) -> Result<ServiceConfig> {
    let mut service = match config {
        Some(path) => ServiceConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(seed) = seed {
        service.seed = Some(seed.to_path_buf());
    }
    Ok(service)
}

/// The in-memory store described by the config's seed file. Empty when no
/// seed is configured.
pub fn load_store(config: &ServiceConfig) -> Result<InMemoryEntityStore> {
    match &config.seed {
        Some(path) => {
            let seed = load_seed(path)
                .with_context(|| format!("failed to load seed {}", path.display()))?;
            tracing::info!(
                polygons = seed.polygons.len(),
                rulesets = seed.rulesets.len(),
                "loaded seed"
            );
            Ok(InMemoryEntityStore::from_seed(seed))
        }
        None => {
            tracing::warn!("no seed configured; the store is empty");
            Ok(InMemoryEntityStore::new())
        }
    }
}

/// `region` if given, otherwise the config's active region.
pub fn resolve_region(region: Option<&str>, config: &ServiceConfig) -> Result<RegionCode> {
    match region {
        Some(code) => RegionCode::new(code).with_context(|| format!("invalid region {code:?}")),
        None => Ok(config.active_region.clone()),
    }
}
