//! # paws CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paws_cli::check_location::{run_check_location, CheckLocationArgs};
use paws_cli::inspect::{run_inspect, InspectArgs};
use paws_cli::request::{run_request, RequestArgs};

/// PAWS operator CLI
///
/// Checks locations against regulatory region polygons, inspects the
/// polygon store, and routes PAWS requests offline.
#[derive(Parser, Debug)]
#[command(name = "paws", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the service configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed file of polygon and rule-set records. Overrides the config's.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether a point lies inside a region's polygons.
    CheckLocation(CheckLocationArgs),

    /// Parse stored polygon records and print a summary per subregion.
    #[command(name = "inspect-polygons")]
    Inspect(InspectArgs),

    /// Route JSON-RPC request files through an in-process router.
    Request(RequestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match paws_cli::load_service_config(cli.config.as_deref(), cli.seed.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };

    let result = match cli.command {
        Commands::CheckLocation(args) => run_check_location(&args, &config),
        Commands::Inspect(args) => run_inspect(&args, &config),
        Commands::Request(args) => run_request(&args, config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
