//! # Check-Location Subcommand
//!
//! Loads a region's polygons from the seed and reports whether a point is
//! inside, and in which subregion.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use paws_api::config::ServiceConfig;
use paws_core::{GeoLocation, LatLon};
use paws_geo::{GeoValidator, RegionPolygonCache};

#[derive(Args, Debug)]
pub struct CheckLocationArgs {
    /// Region code. Defaults to the config's active region.
    #[arg(long)]
    pub region: Option<String>,

    /// Latitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
}

/// Exit code 0 if inside, 1 if outside.
pub fn run_check_location(args: &CheckLocationArgs, config: &ServiceConfig) -> Result<u8> {
    let region = crate::resolve_region(args.region.as_deref(), config)?;
    let store = crate::load_store(config)?;
    let cache = RegionPolygonCache::new(
        Arc::new(store),
        [region.clone()],
        config.cache_config(),
    );
    let count = cache.refresh(&region)?;
    if count == 0 {
        bail!("no polygons stored for region {region}");
    }

    let subregions = cache.get_polygons(&region);
    let location = GeoLocation::point(args.lat, args.lon);
    if GeoValidator::validate_single_location(&location, &subregions) {
        let point = LatLon::new(args.lat, args.lon);
        let name = subregions
            .iter()
            .find(|s| s.contains(point))
            .map_or("?", |s| s.name.as_str());
        println!("INSIDE {region} ({name}): {}, {}", args.lat, args.lon);
        Ok(0)
    } else {
        println!("OUTSIDE {region}: {}, {}", args.lat, args.lon);
        Ok(1)
    }
}
