//! # Geometry and Cache Errors

use paws_core::{RegionCode, StoreError};
use thiserror::Error;

/// Errors raised while parsing polygon data or refreshing the cache.
#[derive(Error, Debug)]
pub enum GeoError {
    /// A polygon blob could not be parsed.
    #[error("polygon parse error in {record:?}: {reason}")]
    Parse {
        /// Subregion name of the offending record.
        record: String,
        /// What was wrong.
        reason: String,
    },

    /// A polygon has too few vertices or a non-finite coordinate.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// Refresh requested for a region without location validation enabled.
    #[error("location validation is not enabled for region {0}")]
    RegionNotEnabled(RegionCode),

    /// The entity store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
