//! # Service Configuration
//!
//! [`ServiceConfig`] is read from the YAML file named by `PAWS_CONFIG` (all
//! fields optional), then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `PORT` | `port` |
//! | `PAWS_REFRESH_INTERVAL_MIN` | `refresh_interval_minutes` |
//! | `PAWS_API_VERSION` | `paws_api_version` |
//!
//! Without a file the service runs a single FCC region (`US`) with location
//! validation off, backed by an empty in-memory store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use paws_core::{NumberCulture, RegionCode, RegulatoryAuthority};
use paws_geo::{CacheConfig, SchedulerConfig};
use serde::{Deserialize, Serialize};

use crate::bootstrap::BootstrapError;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// One regulatory region the service knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub code: RegionCode,
    pub authority: RegulatoryAuthority,
    /// Gate requests on the region's polygons.
    #[serde(default)]
    pub location_validation: bool,
}

/// A channel the static driver offers everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticChannel {
    pub start_hz: f64,
    pub stop_hz: f64,
    pub max_power_dbm: f64,
}

/// Settings for the configuration-backed spectrum driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticDriverConfig {
    /// Device ids accepted by `init` before any `register` call. Empty means
    /// every device must register first.
    pub registered_devices: Vec<String>,
    /// Device ids reported valid by `verifyDevice`. Empty accepts any
    /// registered device.
    pub authorized_devices: Vec<String>,
    pub channels: Vec<StaticChannel>,
    /// Length of each returned spectrum schedule.
    pub schedule_hours: i64,
    /// Simulate the external device-validation service being down.
    pub validation_service_down: bool,
}

impl Default for StaticDriverConfig {
    fn default() -> Self {
        Self {
            registered_devices: Vec::new(),
            authorized_devices: Vec::new(),
            channels: vec![StaticChannel {
                start_hz: 470_000_000.0,
                stop_hz: 476_000_000.0,
                max_power_dbm: 36.0,
            }],
            schedule_hours: 48,
            validation_service_down: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub port: u16,
    pub jsonrpc_version: String,
    pub paws_api_version: String,
    /// Culture tag governing stored polygon text, e.g. `en-US` or `fr-FR`.
    pub culture: String,
    /// The region this instance serves.
    pub active_region: RegionCode,
    pub regions: Vec<RegionConfig>,
    pub refresh_interval_minutes: u64,
    pub staleness_check_seconds: u64,
    pub request_timeout_ms: u64,
    /// Put internal fault messages in `-201` error data. When off, clients
    /// see `internal error` and the detail is only logged.
    pub expose_fault_details: bool,
    pub audit_capacity: usize,
    /// JSON or YAML file of polygon and rule-set records for the in-memory
    /// store. Relative paths resolve against the config file's directory.
    pub seed: Option<PathBuf>,
    pub driver: StaticDriverConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            jsonrpc_version: "2.0".to_string(),
            paws_api_version: "1.0".to_string(),
            culture: "en-US".to_string(),
            active_region: RegionCode::us(),
            regions: vec![RegionConfig {
                code: RegionCode::us(),
                authority: RegulatoryAuthority::Fcc,
                location_validation: false,
            }],
            refresh_interval_minutes: 12 * 60,
            staleness_check_seconds: 300,
            request_timeout_ms: 30_000,
            expose_fault_details: true,
            audit_capacity: 10_000,
            seed: None,
            driver: StaticDriverConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from `PAWS_CONFIG` (if set) and apply environment overrides.
    pub fn from_env() -> Result<Self, BootstrapError> {
        let mut config = match std::env::var_os("PAWS_CONFIG") {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML config file. A relative `seed` path is resolved against
    /// the file's directory.
    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        if !path.exists() {
            return Err(BootstrapError::NotFound {
                path: path.display().to_string(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&text).map_err(|e| BootstrapError::Parse {
            what: "configuration",
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        if let (Some(seed), Some(dir)) = (&config.seed, path.parent()) {
            if seed.is_relative() {
                config.seed = Some(dir.join(seed));
            }
        }
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), BootstrapError> {
        if let Some(value) = lookup("PORT") {
            self.port = value.parse().map_err(|_| BootstrapError::Env {
                var: "PORT",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("PAWS_REFRESH_INTERVAL_MIN") {
            self.refresh_interval_minutes = value.parse().map_err(|_| BootstrapError::Env {
                var: "PAWS_REFRESH_INTERVAL_MIN",
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("PAWS_API_VERSION") {
            self.paws_api_version = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.active_region_config().is_none() {
            return Err(BootstrapError::Invalid(format!(
                "active region {} is not listed in regions",
                self.active_region
            )));
        }
        if self.refresh_interval_minutes == 0 {
            return Err(BootstrapError::Invalid(
                "refresh_interval_minutes must be positive".to_string(),
            ));
        }
        if self.staleness_check_seconds == 0 {
            return Err(BootstrapError::Invalid(
                "staleness_check_seconds must be positive".to_string(),
            ));
        }
        let mut codes: Vec<_> = self.regions.iter().map(|r| &r.code).collect();
        codes.sort();
        if codes.windows(2).any(|w| w[0] == w[1]) {
            return Err(BootstrapError::Invalid("duplicate region code".to_string()));
        }
        Ok(())
    }

    pub fn active_region_config(&self) -> Option<&RegionConfig> {
        self.regions.iter().find(|r| r.code == self.active_region)
    }

    /// Regions whose polygons the cache keeps.
    pub fn validated_regions(&self) -> Vec<RegionCode> {
        self.regions
            .iter()
            .filter(|r| r.location_validation)
            .map(|r| r.code.clone())
            .collect()
    }

    pub fn number_culture(&self) -> NumberCulture {
        NumberCulture::from_tag(&self.culture)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_minutes * 60)
    }

    pub fn staleness_check_interval(&self) -> Duration {
        Duration::from_secs(self.staleness_check_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            culture: self.number_culture(),
            staleness_check_interval: self.staleness_check_interval(),
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            refresh_interval: self.refresh_interval(),
            staleness_check_interval: self.staleness_check_interval(),
            enabled: !self.validated_regions().is_empty(),
        }
    }
}
