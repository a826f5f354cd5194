//! # Entity Store Boundary
//!
//! The narrow interface through which regulatory data is read: polygon
//! records per region and rule-set rows per region. Production deployments
//! back it with a table store; [`InMemoryEntityStore`] serves development,
//! the CLI and tests.
//!
//! Calls are synchronous. Callers on an async runtime run them on the
//! blocking pool.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::region::RegionCode;
use crate::temporal::Timestamp;

/// One stored subregion: a named area with its bounding box and polygon blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionPolygonRecord {
    pub region: RegionCode,
    pub name: String,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
    /// Polygons separated by the culture's list separator; each polygon is
    /// whitespace-separated `lat lon` pairs.
    pub polygons: String,
    /// Optional prefilter rectangles, one `south west north east` entry per
    /// polygon in blob order. When absent each polygon's box is computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_rectangles: Option<String>,
    pub timestamp: Timestamp,
}

/// A stored rule-set row, including store-internal keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetRecord {
    #[serde(default)]
    pub partition_key: String,
    #[serde(default)]
    pub row_key: String,
    pub region: RegionCode,
    pub authority: String,
    pub ruleset_id: String,
    #[serde(default)]
    pub max_location_change: Option<f64>,
    #[serde(default)]
    pub max_polling_secs: Option<u32>,
    #[serde(default)]
    pub max_eirp_dbm: Option<f64>,
    #[serde(default)]
    pub max_total_bw_mhz: Option<f64>,
    #[serde(default)]
    pub max_nominal_channel_bw_mhz: Option<f64>,
    pub timestamp: Timestamp,
}

/// Read access to regulatory data.
pub trait EntityStore: Send + Sync {
    /// All polygon records for `region`.
    fn fetch_region_polygons(&self, region: &RegionCode)
        -> Result<Vec<RegionPolygonRecord>, StoreError>;

    /// Latest record timestamp among `region`'s polygon records, or `None`
    /// if the region has none.
    fn polygons_last_modified(&self, region: &RegionCode) -> Result<Option<Timestamp>, StoreError> {
        Ok(self
            .fetch_region_polygons(region)?
            .iter()
            .map(|r| r.timestamp)
            .max())
    }

    /// All rule-set rows for `region`.
    fn fetch_ruleset_info(&self, region: &RegionCode) -> Result<Vec<RulesetRecord>, StoreError>;
}

/// Seed data for [`InMemoryEntityStore`], loaded from a JSON or YAML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSeed {
    #[serde(default)]
    pub polygons: Vec<RegionPolygonRecord>,
    #[serde(default)]
    pub rulesets: Vec<RulesetRecord>,
}

/// Thread-safe, cloneable in-memory entity store.
///
/// The lock is `parking_lot` and is never held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntityStore {
    polygons: Arc<RwLock<HashMap<RegionCode, Vec<RegionPolygonRecord>>>>,
    rulesets: Arc<RwLock<HashMap<RegionCode, Vec<RulesetRecord>>>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: StoreSeed) -> Self {
        let store = Self::new();
        for record in seed.polygons {
            store.insert_polygon(record);
        }
        for record in seed.rulesets {
            store.insert_ruleset(record);
        }
        store
    }

    /// Add a polygon record to its region.
    pub fn insert_polygon(&self, record: RegionPolygonRecord) {
        self.polygons
            .write()
            .entry(record.region.clone())
            .or_default()
            .push(record);
    }

    /// Replace every polygon record of `region`.
    pub fn replace_polygons(&self, region: &RegionCode, records: Vec<RegionPolygonRecord>) {
        self.polygons.write().insert(region.clone(), records);
    }

    pub fn insert_ruleset(&self, record: RulesetRecord) {
        self.rulesets
            .write()
            .entry(record.region.clone())
            .or_default()
            .push(record);
    }

    /// Number of polygon records across all regions.
    pub fn polygon_count(&self) -> usize {
        self.polygons.read().values().map(Vec::len).sum()
    }
}

impl EntityStore for InMemoryEntityStore {
    fn fetch_region_polygons(
        &self,
        region: &RegionCode,
    ) -> Result<Vec<RegionPolygonRecord>, StoreError> {
        Ok(self.polygons.read().get(region).cloned().unwrap_or_default())
    }

    fn fetch_ruleset_info(&self, region: &RegionCode) -> Result<Vec<RulesetRecord>, StoreError> {
        Ok(self.rulesets.read().get(region).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(code: &str) -> RegionCode {
        RegionCode::new(code).unwrap()
    }

    fn record(code: &str, name: &str, ts: &str) -> RegionPolygonRecord {
        RegionPolygonRecord {
            region: region(code),
            name: name.into(),
            min_latitude: 0.0,
            max_latitude: 1.0,
            min_longitude: 0.0,
            max_longitude: 1.0,
            polygons: "0 0 0 1 1 1 1 0".into(),
            location_rectangles: None,
            timestamp: Timestamp::parse(ts).unwrap(),
        }
    }

    #[test]
    fn store_new_is_empty() {
        let store = InMemoryEntityStore::new();
        assert_eq!(store.polygon_count(), 0);
        assert!(store.fetch_region_polygons(&region("US")).unwrap().is_empty());
        assert!(store.polygons_last_modified(&region("US")).unwrap().is_none());
    }

    #[test]
    fn store_partitions_by_region() {
        let store = InMemoryEntityStore::new();
        store.insert_polygon(record("US", "a", "2026-01-01T00:00:00Z"));
        store.insert_polygon(record("GB", "b", "2026-01-01T00:00:00Z"));
        assert_eq!(store.fetch_region_polygons(&region("US")).unwrap().len(), 1);
        assert_eq!(store.polygon_count(), 2);
    }

    #[test]
    fn last_modified_is_max_timestamp() {
        let store = InMemoryEntityStore::new();
        store.insert_polygon(record("US", "a", "2026-01-01T00:00:00Z"));
        store.insert_polygon(record("US", "b", "2026-03-01T00:00:00Z"));
        let latest = store.polygons_last_modified(&region("US")).unwrap().unwrap();
        assert_eq!(latest.to_iso8601(), "2026-03-01T00:00:00Z");
    }

    #[test]
    fn replace_polygons_swaps_region() {
        let store = InMemoryEntityStore::new();
        store.insert_polygon(record("US", "a", "2026-01-01T00:00:00Z"));
        store.replace_polygons(&region("US"), vec![]);
        assert!(store.fetch_region_polygons(&region("US")).unwrap().is_empty());
    }

    #[test]
    fn clones_share_data() {
        let store = InMemoryEntityStore::new();
        let clone = store.clone();
        clone.insert_polygon(record("US", "a", "2026-01-01T00:00:00Z"));
        assert_eq!(store.polygon_count(), 1);
    }

    #[test]
    fn seed_parses_from_json() {
        let seed: StoreSeed = serde_json::from_value(serde_json::json!({
            "polygons": [{
                "region": "us", "name": "conus",
                "minLatitude": 24.0, "maxLatitude": 50.0,
                "minLongitude": -125.0, "maxLongitude": -66.0,
                "polygons": "24 -125 50 -125 50 -66 24 -66",
                "locationRectangles": "24 -125 50 -66",
                "timestamp": "2026-01-01T00:00:00Z"
            }],
            "rulesets": [{
                "region": "US", "authority": "US", "rulesetId": "FccTvBandWhiteSpace-2010",
                "partitionKey": "US", "rowKey": "1",
                "timestamp": "2026-01-01T00:00:00Z"
            }]
        }))
        .unwrap();
        let store = InMemoryEntityStore::from_seed(seed);
        assert_eq!(store.polygon_count(), 1);
        let stored = store.fetch_region_polygons(&region("US")).unwrap();
        assert_eq!(stored[0].location_rectangles.as_deref(), Some("24 -125 50 -66"));
        assert_eq!(store.fetch_ruleset_info(&region("US")).unwrap().len(), 1);
    }
}
