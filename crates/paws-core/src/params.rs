//! # Request Parameters
//!
//! The `params` object of a PAWS request. One flat struct covers all seven
//! methods; which fields are meaningful depends on the method. Unrecognized
//! keys are kept in [`Parameters::unknown`] rather than rejected, so devices
//! sending vendor extensions are still served.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::GeoLocation;

/// Device identity as sent by the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ruleset_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcc_tvbd_device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etsi_en_device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etsi_en_device_emissions_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etsi_en_technology_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etsi_en_device_category: Option<String>,
}

/// Owner / operator contact cards. Cards are passed through opaquely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceOwner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntennaCharacteristics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_uncertainty: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRange {
    pub start_hz: f64,
    pub stop_hz: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilities {
    #[serde(default)]
    pub frequency_ranges: Vec<FrequencyRange>,
}

/// A spectrum block reported in a use notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spectrum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_bw_hz: Option<f64>,
    #[serde(default)]
    pub profiles: Vec<Vec<serde_json::Value>>,
}

/// The `params` object of a PAWS request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, rename = "deviceDesc", skip_serializing_if = "Option::is_none")]
    pub device_descriptor: Option<DeviceDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_device_location: Option<GeoLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_owner: Option<DeviceOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antenna: Option<AntennaCharacteristics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<DeviceOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<DeviceCapabilities>,
    #[serde(default, rename = "masterDeviceDesc", skip_serializing_if = "Option::is_none")]
    pub master_device_descriptor: Option<DeviceDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<GeoLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spectra: Option<Vec<Spectrum>>,
    #[serde(default, rename = "deviceDescs", skip_serializing_if = "Option::is_none")]
    pub device_descriptors: Option<Vec<DeviceDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requestor: Option<DeviceOwner>,
    #[serde(default, rename = "starttime", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, rename = "endtime", skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incumbent_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefsens: Option<f64>,
    #[serde(default, rename = "maxMasterEIRP", skip_serializing_if = "Option::is_none")]
    pub max_master_eirp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testing_stage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmse_assignment_table_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

impl Parameters {
    /// Devices whose validity is being asked about: `deviceDescs`, then the
    /// master device descriptor if one was sent.
    pub fn devices_to_validate(&self) -> Vec<DeviceDescriptor> {
        let mut devices = self.device_descriptors.clone().unwrap_or_default();
        if let Some(master) = &self.master_device_descriptor {
            devices.push(master.clone());
        }
        devices
    }
}
