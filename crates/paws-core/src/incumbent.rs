//! # Incumbent Projection
//!
//! The regional projection of a request's device, location and antenna data
//! into the shape the availability computation consumes. Built fresh per
//! request by a regional value provider and not mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoLocation, LocationShape};
use crate::params::{DeviceCapabilities, DeviceDescriptor, DeviceOwner};

/// Device class as understood by the availability computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncumbentType {
    /// FCC fixed TVBD.
    Fixed,
    /// FCC Mode I personal/portable.
    Mode1,
    /// FCC Mode II personal/portable.
    Mode2,
    /// ETSI type A (fixed-location) device.
    TypeA,
    /// ETSI type B device.
    TypeB,
}

impl IncumbentType {
    /// Parse the names used on the wire by FCC and ETSI device descriptors.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Some(Self::Fixed),
            "mode_1" | "mode1" => Some(Self::Mode1),
            "mode_2" | "mode2" => Some(Self::Mode2),
            "a" | "typea" => Some(Self::TypeA),
            "b" | "typeb" => Some(Self::TypeB),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incumbent {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_major_axis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_minor_axis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incumbent_type: Option<IncumbentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_descriptor: Option<DeviceDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_device_descriptor: Option<DeviceDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_owner: Option<DeviceOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<DeviceCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefsens: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_master_eirp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testing_stage: Option<i32>,
    #[serde(default)]
    pub is_testing_stage: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmse_assignment_table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_hz: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_id: Option<String>,
}

impl Incumbent {
    /// An incumbent positioned at `location`'s anchor coordinate, carrying the
    /// ellipse axes of a point location. `None` if the location has no shape.
    pub fn at(location: &GeoLocation) -> Option<Self> {
        let anchor = location.anchor()?;
        let (semi_major_axis, semi_minor_axis) = match location.shape() {
            Some(LocationShape::Point(e)) => (e.semi_major_axis, e.semi_minor_axis),
            _ => (None, None),
        };
        Some(Self {
            latitude: anchor.lat,
            longitude: anchor.lon,
            semi_major_axis,
            semi_minor_axis,
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incumbent_at_point_copies_center() {
        let inc = Incumbent::at(&GeoLocation::point(51.5, -0.1)).unwrap();
        assert_eq!(inc.latitude, 51.5);
        assert_eq!(inc.longitude, -0.1);
        assert!(inc.height.is_none());
    }

    #[test]
    fn incumbent_at_region_uses_first_vertex() {
        let loc = GeoLocation::region(&[(10.0, 20.0), (11.0, 20.0), (11.0, 21.0)]);
        let inc = Incumbent::at(&loc).unwrap();
        assert_eq!((inc.latitude, inc.longitude), (10.0, 20.0));
    }

    #[test]
    fn incumbent_type_from_wire() {
        assert_eq!(IncumbentType::from_wire("MODE_2"), Some(IncumbentType::Mode2));
        assert_eq!(IncumbentType::from_wire("A"), Some(IncumbentType::TypeA));
        assert_eq!(IncumbentType::from_wire("tower"), None);
    }
}
