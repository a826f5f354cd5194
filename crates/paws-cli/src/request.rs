//! # Request Subcommand
//!
//! Bootstraps the full service in-process and routes each request file
//! through it in order, so state such as registrations carries from one
//! file to the next. Responses are printed as JSON, one per file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use paws_api::config::ServiceConfig;
use paws_core::ResponseEnvelope;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// JSON-RPC request files, routed in order.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Pretty-print responses.
    #[arg(long)]
    pub pretty: bool,
}

/// Route every file and collect the responses.
pub fn route_files(files: &[PathBuf], config: ServiceConfig) -> Result<Vec<ResponseEnvelope>> {
    let state = paws_api::bootstrap::bootstrap(config).context("failed to bootstrap service")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let mut responses = Vec::with_capacity(files.len());
    for file in files {
        let body = std::fs::read(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let response = runtime.block_on(state.router.handle_request(&body));
        tracing::debug!(file = %file.display(), error = response.is_error(), "routed");
        responses.push(response);
    }
    Ok(responses)
}

/// Exit code 0 if every response is a result, 1 if any is an error.
pub fn run_request(args: &RequestArgs, config: ServiceConfig) -> Result<u8> {
    let responses = route_files(&args.files, config)?;
    for response in &responses {
        let text = if args.pretty {
            serde_json::to_string_pretty(response)?
        } else {
            serde_json::to_string(response)?
        };
        println!("{text}");
    }
    Ok(if responses.iter().any(ResponseEnvelope::is_error) {
        1
    } else {
        0
    })
}
