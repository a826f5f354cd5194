//! # Spectrum Driver Boundary
//!
//! The white-space computation behind the business layer. The router only
//! ever sees integer status codes and schedule JSON from a driver; how the
//! availability is computed is the driver's business.
//!
//! [`StaticSpectrumDriver`] answers from configuration: a registration set
//! kept in memory and a fixed channel list offered at every location. It
//! backs development deployments, the CLI and the test suite.

use std::collections::HashSet;

use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::RwLock;
use paws_core::{DeviceDescriptor, Incumbent, Parameters};
use serde_json::{json, Value};

use crate::config::StaticDriverConfig;

/// Driver status: success.
pub const STATUS_OK: i32 = 0;
/// Driver status: the device has not registered.
pub const STATUS_NOT_REGISTERED: i32 = -302;
/// Driver status: the device is not authorized.
pub const STATUS_UNAUTHORIZED: i32 = -301;
/// Driver status: a request value was rejected.
pub const STATUS_INVALID_VALUE: i32 = -202;
/// Driver status: the device-validation service is down.
pub const STATUS_SERVICE_DOWN: i32 = -32000;
/// Driver status: no used spectrum recorded for the location.
pub const STATUS_INCUMBENT_NOT_FOUND: i32 = 200;
/// `validate_device` status for a valid device.
pub const STATUS_VALID: i32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("spectrum backend unavailable: {0}")]
    Unavailable(String),

    #[error("spectrum computation failed: {0}")]
    Computation(String),
}

/// Result of a spectrum-use notification.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverReply {
    pub code: i32,
    pub message: Option<String>,
}

impl DriverReply {
    pub fn ok() -> Self {
        Self {
            code: STATUS_OK,
            message: None,
        }
    }
}

/// White-space computation backend.
pub trait SpectrumDriver: Send + Sync {
    fn initialize(&self, device_id: Option<&str>, params: &Parameters) -> Result<i32, DriverError>;

    fn register(&self, device_id: Option<&str>, params: &Parameters) -> Result<i32, DriverError>;

    /// Spectrum schedules available to one incumbent.
    fn spectrum_schedules(&self, incumbent: &Incumbent) -> Result<Vec<Value>, DriverError>;

    /// One geo-spectrum spec per incumbent, in order.
    fn batch_spectrum(&self, incumbents: &[Incumbent]) -> Result<Vec<Value>, DriverError>;

    fn notify(&self, device_id: Option<&str>, params: &Parameters)
        -> Result<DriverReply, DriverError>;

    /// [`STATUS_VALID`] for a valid device, [`STATUS_SERVICE_DOWN`] if the
    /// validation backend cannot answer, anything else for invalid.
    fn validate_device(
        &self,
        device_id: Option<&str>,
        device: &DeviceDescriptor,
    ) -> Result<i32, DriverError>;

    fn interference_query(&self, params: &Parameters) -> Result<i32, DriverError>;
}

// ---------------------------------------------------------------------------
// Configuration-backed driver
// ---------------------------------------------------------------------------

pub struct StaticSpectrumDriver {
    config: StaticDriverConfig,
    registered: RwLock<HashSet<String>>,
}

impl StaticSpectrumDriver {
    pub fn new(config: StaticDriverConfig) -> Self {
        let registered = config.registered_devices.iter().cloned().collect();
        Self {
            config,
            registered: RwLock::new(registered),
        }
    }

    pub fn is_registered(&self, device_id: &str) -> bool {
        self.registered.read().contains(device_id)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.read().len()
    }

    fn schedules(&self) -> Vec<Value> {
        let start = Utc::now();
        let stop = start + ChronoDuration::hours(self.config.schedule_hours);
        let profiles: Vec<Value> = self
            .config
            .channels
            .iter()
            .map(|c| {
                json!([
                    {"hz": c.start_hz, "dbm": c.max_power_dbm},
                    {"hz": c.stop_hz, "dbm": c.max_power_dbm}
                ])
            })
            .collect();
        vec![json!({
            "eventTime": {
                "startTime": start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                "stopTime": stop.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            },
            "spectra": [{
                "resolutionBwHz": 6_000_000.0,
                "profiles": profiles,
            }],
        })]
    }
}

impl std::fmt::Debug for StaticSpectrumDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticSpectrumDriver")
            .field("channels", &self.config.channels.len())
            .field("registered", &self.registered_count())
            .finish()
    }
}

impl SpectrumDriver for StaticSpectrumDriver {
    fn initialize(&self, device_id: Option<&str>, _params: &Parameters) -> Result<i32, DriverError> {
        Ok(match device_id {
            Some(id) if self.is_registered(id) => STATUS_OK,
            _ => STATUS_NOT_REGISTERED,
        })
    }

    fn register(&self, device_id: Option<&str>, _params: &Parameters) -> Result<i32, DriverError> {
        match device_id {
            Some(id) => {
                self.registered.write().insert(id.to_string());
                tracing::info!(device_id = id, "device registered");
                Ok(STATUS_OK)
            }
            None => Ok(STATUS_INVALID_VALUE),
        }
    }

    fn spectrum_schedules(&self, _incumbent: &Incumbent) -> Result<Vec<Value>, DriverError> {
        Ok(self.schedules())
    }

    fn batch_spectrum(&self, incumbents: &[Incumbent]) -> Result<Vec<Value>, DriverError> {
        Ok(incumbents
            .iter()
            .map(|inc| {
                json!({
                    "location": {
                        "point": {"center": {"latitude": inc.latitude, "longitude": inc.longitude}}
                    },
                    "spectrumSchedules": self.schedules(),
                })
            })
            .collect())
    }

    fn notify(
        &self,
        _device_id: Option<&str>,
        params: &Parameters,
    ) -> Result<DriverReply, DriverError> {
        let reported = params
            .spectra
            .as_deref()
            .map_or(0, |spectra| spectra.iter().map(|s| s.profiles.len()).sum::<usize>());
        if reported == 0 {
            return Ok(DriverReply {
                code: STATUS_INVALID_VALUE,
                message: Some("no spectrum profiles reported".to_string()),
            });
        }
        Ok(DriverReply::ok())
    }

    fn validate_device(
        &self,
        device_id: Option<&str>,
        _device: &DeviceDescriptor,
    ) -> Result<i32, DriverError> {
        if self.config.validation_service_down {
            return Ok(STATUS_SERVICE_DOWN);
        }
        let Some(id) = device_id else {
            return Ok(STATUS_UNAUTHORIZED);
        };
        let authorized = if self.config.authorized_devices.is_empty() {
            self.is_registered(id)
        } else {
            self.config.authorized_devices.iter().any(|d| d == id)
        };
        Ok(if authorized {
            STATUS_VALID
        } else {
            STATUS_UNAUTHORIZED
        })
    }

    fn interference_query(&self, _params: &Parameters) -> Result<i32, DriverError> {
        Ok(if self.registered_count() == 0 {
            STATUS_INCUMBENT_NOT_FOUND
        } else {
            STATUS_OK
        })
    }
}
