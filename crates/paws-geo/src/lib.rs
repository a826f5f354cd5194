//! # paws-geo — Regulatory-Region Geometry
//!
//! Decides whether a requester stands inside a region's regulatory domain,
//! and keeps the polygons needed to answer that question in memory.
//!
//! - [`polygon`]: stored polygon blob parsing and ray-casting containment.
//! - [`subregion`]: one named area per store record, with a bounding-box
//!   prefilter.
//! - [`validator`]: point, region and batch location validation.
//! - [`cache`]: the region-partitioned [`RegionPolygonCache`] with atomic
//!   per-region snapshot swaps and single-flight initialization.
//! - [`scheduler`]: the periodic refresh task.
//!
//! ## Crate Policy
//!
//! - Depends only on `paws-core` internally.
//! - Store calls are synchronous; async callers use the blocking pool.
//! - No lock is held across an `.await`.

pub mod bounds;
pub mod cache;
pub mod error;
pub mod polygon;
pub mod scheduler;
pub mod subregion;
pub mod validator;

pub use bounds::BoundingBox;
pub use cache::{CacheConfig, RefreshKind, RefreshSummary, RegionPolygonCache, RegionSnapshot};
pub use error::GeoError;
pub use polygon::{
    parse_location_rectangles, parse_polygon_blob, parse_polygons_with_rectangles, RegionPolygon,
};
pub use scheduler::{RefreshScheduler, SchedulerConfig};
pub use subregion::SubregionPolygons;
pub use validator::GeoValidator;
