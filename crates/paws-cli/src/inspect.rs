//! # Inspect-Polygons Subcommand
//!
//! Parses every stored polygon record of a region with the configured
//! culture and prints one line per subregion, largest first. Records that
//! fail to parse are listed and make the command exit 1.

use anyhow::Result;
use clap::Args;
use paws_api::config::ServiceConfig;
use paws_core::EntityStore;
use paws_geo::SubregionPolygons;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Region code. Defaults to the config's active region.
    #[arg(long)]
    pub region: Option<String>,
}

/// Parse outcome for one region.
#[derive(Debug, Default)]
pub struct InspectReport {
    pub subregions: Vec<SubregionPolygons>,
    pub failures: Vec<(String, String)>,
}

pub fn inspect_region(args: &InspectArgs, config: &ServiceConfig) -> Result<InspectReport> {
    let region = crate::resolve_region(args.region.as_deref(), config)?;
    let store = crate::load_store(config)?;
    let culture = config.number_culture();

    let mut report = InspectReport::default();
    for record in store.fetch_region_polygons(&region)? {
        match SubregionPolygons::from_record(&record, &culture) {
            Ok(subregion) => report.subregions.push(subregion),
            Err(e) => report.failures.push((record.name.clone(), e.to_string())),
        }
    }
    paws_geo::subregion::sort_subregions(&mut report.subregions);
    Ok(report)
}

pub fn run_inspect(args: &InspectArgs, config: &ServiceConfig) -> Result<u8> {
    let report = inspect_region(args, config)?;

    println!(
        "{} subregion(s), {} unparsable",
        report.subregions.len(),
        report.failures.len()
    );
    for s in &report.subregions {
        let b = &s.bounds;
        println!(
            "  {:<24} polygons={:<4} vertices={:<6} lat=[{}, {}] lon=[{}, {}] modified={}",
            s.name,
            s.polygons.len(),
            s.vertex_count(),
            b.min_lat,
            b.max_lat,
            b.min_lon,
            b.max_lon,
            s.last_modified.to_iso8601(),
        );
    }
    for (name, reason) in &report.failures {
        println!("  FAIL: {name}: {reason}");
    }

    Ok(if report.failures.is_empty() { 0 } else { 1 })
}
