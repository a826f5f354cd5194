//! # Subregions
//!
//! One cached subregion per stored polygon record: the record's bounding
//! box, its polygons sorted largest first, and the record timestamp.

use paws_core::{LatLon, NumberCulture, RegionPolygonRecord, Timestamp};

use crate::bounds::BoundingBox;
use crate::error::GeoError;
use crate::polygon::{parse_polygons_with_rectangles, RegionPolygon};

#[derive(Debug, Clone, PartialEq)]
pub struct SubregionPolygons {
    pub name: String,
    pub bounds: BoundingBox,
    pub polygons: Vec<RegionPolygon>,
    pub last_modified: Timestamp,
}

impl SubregionPolygons {
    pub fn from_record(
        record: &RegionPolygonRecord,
        culture: &NumberCulture,
    ) -> Result<Self, GeoError> {
        Ok(Self {
            name: record.name.clone(),
            bounds: BoundingBox::new(
                record.min_latitude,
                record.max_latitude,
                record.min_longitude,
                record.max_longitude,
            ),
            polygons: parse_polygons_with_rectangles(
                &record.name,
                &record.polygons,
                record.location_rectangles.as_deref(),
                culture,
            )?,
            last_modified: record.timestamp,
        })
    }

    /// The first polygon containing `point`, checked largest first after
    /// the subregion's own bounding-box prefilter.
    pub fn containing_polygon(&self, point: LatLon) -> Option<&RegionPolygon> {
        if !self.bounds.contains(point) {
            return None;
        }
        self.polygons.iter().find(|p| p.contains(point))
    }

    pub fn contains(&self, point: LatLon) -> bool {
        self.containing_polygon(point).is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices().len()).sum()
    }
}

/// Order subregions largest bounding box first.
pub fn sort_subregions(subregions: &mut [SubregionPolygons]) {
    subregions.sort_by(|a, b| b.bounds.area().total_cmp(&a.bounds.area()));
}
