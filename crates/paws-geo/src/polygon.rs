//! # Region Polygons
//!
//! A [`RegionPolygon`] is an implicitly closed ring of `(lat, lon)` vertices
//! with a precomputed bounding box. Stored subregions carry their polygons as
//! one text blob; [`parse_polygon_blob`] turns that blob into polygons using
//! the configured [`NumberCulture`].
//!
//! ## Blob format
//!
//! Polygons are separated by the culture's list separator (`,` for the
//! invariant culture, `;` for decimal-comma cultures). Each polygon is a
//! whitespace-separated sequence `lat lon lat lon ...`, numbers written with
//! the culture's decimal separator.
//!
//! A record may also carry one prefilter rectangle per polygon, in the same
//! order as the polygons and with the same separators, each written as
//! `south west north east`.

use paws_core::{LatLon, NumberCulture};

use crate::bounds::BoundingBox;
use crate::error::GeoError;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolygon {
    vertices: Vec<LatLon>,
    bounds: BoundingBox,
}

impl RegionPolygon {
    /// Build a polygon. Requires at least three vertices, all finite.
    pub fn new(vertices: Vec<LatLon>) -> Result<Self, GeoError> {
        if vertices.len() < 3 {
            return Err(GeoError::InvalidPolygon(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(bad) = vertices
            .iter()
            .find(|v| !v.lat.is_finite() || !v.lon.is_finite())
        {
            return Err(GeoError::InvalidPolygon(format!(
                "non-finite vertex ({}, {})",
                bad.lat, bad.lon
            )));
        }
        let bounds = BoundingBox::from_points(&vertices).ok_or_else(|| {
            GeoError::InvalidPolygon("polygon has no vertices".to_string())
        })?;
        Ok(Self { vertices, bounds })
    }

    pub fn vertices(&self) -> &[LatLon] {
        &self.vertices
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Replace the computed prefilter box with a stored one.
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = bounds;
        self
    }

    /// Bounding-box prefilter followed by the ray-casting test.
    pub fn contains(&self, point: LatLon) -> bool {
        self.bounds.contains(point) && ray_cast(&self.vertices, point)
    }
}

/// Ray-casting point-in-polygon over an implicitly closed ring.
///
/// Casts along latitude at the point's longitude. Points exactly on an edge
/// may land on either side.
pub fn ray_cast(vertices: &[LatLon], point: LatLon) -> bool {
    let Some(last) = vertices.len().checked_sub(1) else {
        return false;
    };
    let mut inside = false;
    let mut j = last;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        let straddles = (vi.lon < point.lon && vj.lon >= point.lon)
            || (vj.lon < point.lon && vi.lon >= point.lon);
        if straddles {
            let crossing_lat = vi.lat + (point.lon - vi.lon) / (vj.lon - vi.lon) * (vj.lat - vi.lat);
            if crossing_lat < point.lat {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Sort largest bounding box first. Stable, so equal areas keep store order.
pub fn sort_by_area_desc(polygons: &mut [RegionPolygon]) {
    polygons.sort_by(|a, b| b.bounds.area().total_cmp(&a.bounds.area()));
}

/// Parse a stored polygon blob into polygons sorted largest first.
///
/// `record` names the subregion for error messages.
pub fn parse_polygon_blob(
    record: &str,
    blob: &str,
    culture: &NumberCulture,
) -> Result<Vec<RegionPolygon>, GeoError> {
    let mut polygons = parse_polygons_in_order(record, blob, culture)?;
    sort_by_area_desc(&mut polygons);
    Ok(polygons)
}

/// Parse polygons, then attach the stored rectangles pairwise in record
/// order before sorting largest first. Without rectangles this is
/// [`parse_polygon_blob`].
pub fn parse_polygons_with_rectangles(
    record: &str,
    blob: &str,
    rectangles: Option<&str>,
    culture: &NumberCulture,
) -> Result<Vec<RegionPolygon>, GeoError> {
    let mut polygons = parse_polygons_in_order(record, blob, culture)?;
    if let Some(rectangles) = rectangles.filter(|r| !r.trim().is_empty()) {
        let boxes = parse_location_rectangles(record, rectangles, culture)?;
        if boxes.len() != polygons.len() {
            return Err(GeoError::Parse {
                record: record.to_string(),
                reason: format!(
                    "{} location rectangles for {} polygons",
                    boxes.len(),
                    polygons.len()
                ),
            });
        }
        polygons = polygons
            .into_iter()
            .zip(boxes)
            .map(|(polygon, bounds)| polygon.with_bounds(bounds))
            .collect();
    }
    sort_by_area_desc(&mut polygons);
    Ok(polygons)
}

/// Parse stored `south west north east` rectangles.
pub fn parse_location_rectangles(
    record: &str,
    blob: &str,
    culture: &NumberCulture,
) -> Result<Vec<BoundingBox>, GeoError> {
    let mut boxes = Vec::new();
    for (index, chunk) in blob.split(culture.list_separator()).enumerate() {
        if chunk.trim().is_empty() {
            continue;
        }
        let numbers = parse_numbers(record, "rectangle", index, chunk, culture)?;
        let &[south, west, north, east] = numbers.as_slice() else {
            return Err(GeoError::Parse {
                record: record.to_string(),
                reason: format!("rectangle {index}: expected 4 numbers, got {}", numbers.len()),
            });
        };
        boxes.push(BoundingBox::new(south, north, west, east));
    }
    Ok(boxes)
}

fn parse_polygons_in_order(
    record: &str,
    blob: &str,
    culture: &NumberCulture,
) -> Result<Vec<RegionPolygon>, GeoError> {
    let mut polygons = Vec::new();
    for (index, chunk) in blob.split(culture.list_separator()).enumerate() {
        if chunk.trim().is_empty() {
            continue;
        }
        let numbers = parse_numbers(record, "polygon", index, chunk, culture)?;
        if numbers.len() % 2 != 0 {
            return Err(GeoError::Parse {
                record: record.to_string(),
                reason: format!("polygon {index}: odd coordinate count {}", numbers.len()),
            });
        }
        let vertices = numbers
            .chunks_exact(2)
            .map(|pair| LatLon::new(pair[0], pair[1]))
            .collect();
        let polygon = RegionPolygon::new(vertices).map_err(|e| GeoError::Parse {
            record: record.to_string(),
            reason: format!("polygon {index}: {e}"),
        })?;
        polygons.push(polygon);
    }
    Ok(polygons)
}

fn parse_numbers(
    record: &str,
    what: &str,
    index: usize,
    chunk: &str,
    culture: &NumberCulture,
) -> Result<Vec<f64>, GeoError> {
    chunk
        .split_whitespace()
        .map(|token| {
            culture.parse_decimal(token).ok_or_else(|| GeoError::Parse {
                record: record.to_string(),
                reason: format!("{what} {index}: invalid number {token:?}"),
            })
        })
        .collect()
}
