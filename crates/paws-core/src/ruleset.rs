//! # Rule Sets and Result Payload Types
//!
//! Regulatory parameters returned to devices, and the payload pieces built
//! from them.

use serde::{Deserialize, Serialize};

use crate::params::DeviceDescriptor;

/// Regulatory parameters for one rule set, as returned to a device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetInfo {
    pub authority: String,
    pub ruleset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_location_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_polling_secs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_eirp_dbm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_bw_mhz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nominal_channel_bw_mhz: Option<f64>,
}

/// Available spectrum under one rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpectrumSpec {
    pub ruleset_info: RulesetInfo,
    #[serde(default)]
    pub spectrum_schedules: Vec<serde_json::Value>,
    pub needs_spectrum_report: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_total_bw_hz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_contiguous_bw_hz: Option<f64>,
}

impl SpectrumSpec {
    /// Build the spec for one rule set. Spectrum reports are always requested.
    pub fn for_ruleset(ruleset_info: RulesetInfo, spectrum_schedules: Vec<serde_json::Value>) -> Self {
        let max_total_bw_hz = ruleset_info.max_total_bw_mhz;
        let max_contiguous_bw_hz = ruleset_info.max_nominal_channel_bw_mhz;
        Self {
            ruleset_info,
            spectrum_schedules,
            needs_spectrum_report: true,
            max_total_bw_hz,
            max_contiguous_bw_hz,
        }
    }
}

/// Validity verdict for one device in a verify-device request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceValidity {
    #[serde(rename = "deviceDesc")]
    pub device_descriptor: DeviceDescriptor,
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
