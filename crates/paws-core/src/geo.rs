//! # Geolocation Shapes
//!
//! Request-side location types. A [`GeoLocation`] is either a point (an
//! ellipse centered on a coordinate) or a region (a polygon with an exterior
//! ring and optional interior exclusions). Values are immutable once parsed.
//!
//! Coordinates are decimal degrees as `f64`. Devices in the field sometimes
//! send them as JSON strings; both forms are accepted.

use serde::{Deserialize, Deserializer, Serialize};

/// A bare coordinate pair used by the geometry code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A PAWS point: latitude and longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(deserialize_with = "coordinate")]
    pub latitude: f64,
    #[serde(deserialize_with = "coordinate")]
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn lat_lon(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }
}

/// A point location with optional uncertainty ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    pub center: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_major_axis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_minor_axis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<f64>,
}

/// A region location: exterior ring plus optional holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonShape {
    pub exterior: Vec<Point>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interior: Vec<Vec<Point>>,
}

/// A device location as carried in request parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Ellipse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<PolygonShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
}

/// Borrowed view of which shape a [`GeoLocation`] carries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationShape<'a> {
    Point(&'a Ellipse),
    Region(&'a PolygonShape),
}

impl GeoLocation {
    /// A point location with no uncertainty.
    pub fn point(latitude: f64, longitude: f64) -> Self {
        Self {
            point: Some(Ellipse {
                center: Point::new(latitude, longitude),
                semi_major_axis: None,
                semi_minor_axis: None,
                orientation: None,
            }),
            region: None,
            confidence: None,
        }
    }

    /// A region location from `(lat, lon)` exterior vertices.
    pub fn region(vertices: &[(f64, f64)]) -> Self {
        Self {
            point: None,
            region: Some(PolygonShape {
                exterior: vertices
                    .iter()
                    .map(|&(lat, lon)| Point::new(lat, lon))
                    .collect(),
                interior: Vec::new(),
            }),
            confidence: None,
        }
    }

    /// The shape carried by this location. A point wins if both are present;
    /// `None` if neither is.
    pub fn shape(&self) -> Option<LocationShape<'_>> {
        match (&self.point, &self.region) {
            (Some(point), _) => Some(LocationShape::Point(point)),
            (None, Some(region)) => Some(LocationShape::Region(region)),
            (None, None) => None,
        }
    }

    /// The representative coordinate: the point center, or the first
    /// exterior vertex of a region.
    pub fn anchor(&self) -> Option<LatLon> {
        match self.shape()? {
            LocationShape::Point(ellipse) => Some(ellipse.center.lat_lon()),
            LocationShape::Region(region) => region.exterior.first().map(Point::lat_lon),
        }
    }
}

fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(v) => Ok(v),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate {s:?}: {e}"))),
    }
}
