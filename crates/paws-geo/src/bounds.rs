//! # Bounding Boxes
//!
//! Axis-aligned boxes in decimal degrees. Used as a cheap prefilter before
//! the ray-casting test and as the sort key for polygons and subregions.

use paws_core::LatLon;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Smallest box enclosing `points`, or `None` for an empty slice.
    pub fn from_points(points: &[LatLon]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(first.lat, first.lat, first.lon, first.lon);
        for p in &points[1..] {
            bounds.min_lat = bounds.min_lat.min(p.lat);
            bounds.max_lat = bounds.max_lat.max(p.lat);
            bounds.min_lon = bounds.min_lon.min(p.lon);
            bounds.max_lon = bounds.max_lon.max(p.lon);
        }
        Some(bounds)
    }

    /// Inclusive containment.
    pub fn contains(&self, point: LatLon) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lon >= self.min_lon
            && point.lon <= self.max_lon
    }

    /// Area in square degrees. Only meaningful as a sort key.
    pub fn area(&self) -> f64 {
        (self.max_lat - self.min_lat).abs() * (self.max_lon - self.min_lon).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_encloses_all() {
        let b = BoundingBox::from_points(&[
            LatLon::new(1.0, 5.0),
            LatLon::new(-2.0, 3.0),
            LatLon::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(b, BoundingBox::new(-2.0, 4.0, -1.0, 5.0));
        assert_eq!(b.area(), 36.0);
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn contains_is_inclusive() {
        let b = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        assert!(b.contains(LatLon::new(0.0, 0.0)));
        assert!(b.contains(LatLon::new(1.0, 0.5)));
        assert!(!b.contains(LatLon::new(1.01, 0.5)));
        assert!(!b.contains(LatLon::new(0.5, -0.01)));
    }

    #[test]
    fn nan_is_never_contained() {
        let b = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        assert!(!b.contains(LatLon::new(f64::NAN, 0.5)));
    }
}
