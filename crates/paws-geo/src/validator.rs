//! # Location Validation
//!
//! Decides whether a requester's location lies inside a region's regulatory
//! domain.
//!
//! - A point location is valid when its center is inside some subregion.
//! - A region location is valid when every exterior vertex is inside some
//!   subregion (vertices may fall in different subregions).
//! - A batch is valid when any one of its locations is valid.
//!
//! Coordinates are plain degrees. Polygons crossing the antimeridian or
//! enclosing a pole are not handled specially.

use paws_core::{GeoLocation, LatLon, LocationShape};

use crate::polygon::RegionPolygon;
use crate::subregion::SubregionPolygons;

/// Stateless validator over a region's cached subregions.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoValidator;

impl GeoValidator {
    /// `true` on the first polygon containing `(lat, lon)`. `polygons` is
    /// expected largest first.
    pub fn is_point_in_region(lat: f64, lon: f64, polygons: &[RegionPolygon]) -> bool {
        let point = LatLon::new(lat, lon);
        polygons.iter().any(|p| p.contains(point))
    }

    pub fn is_point_in_subregions(point: LatLon, subregions: &[SubregionPolygons]) -> bool {
        if !point.lat.is_finite() || !point.lon.is_finite() {
            return false;
        }
        subregions.iter().any(|s| s.contains(point))
    }

    /// Validate one location. A location carrying neither shape is invalid,
    /// as is a region with no exterior vertices.
    pub fn validate_single_location(
        location: &GeoLocation,
        subregions: &[SubregionPolygons],
    ) -> bool {
        match location.shape() {
            Some(LocationShape::Point(ellipse)) => {
                Self::is_point_in_subregions(ellipse.center.lat_lon(), subregions)
            }
            Some(LocationShape::Region(region)) => {
                !region.exterior.is_empty()
                    && region
                        .exterior
                        .iter()
                        .all(|v| Self::is_point_in_subregions(v.lat_lon(), subregions))
            }
            None => false,
        }
    }

    /// Any-of semantics, short-circuiting on the first valid location.
    pub fn validate_batch_locations(
        locations: &[GeoLocation],
        subregions: &[SubregionPolygons],
    ) -> bool {
        locations
            .iter()
            .any(|loc| Self::validate_single_location(loc, subregions))
    }
}
