//! metmasker - rainfall totals from Met Office radar PNGs inside a region mask
//!
//! This is the main entry point for the metmasker command-line tool.

use anyhow::Context;
use std::process::ExitCode;
use tracing::{error, info};

use metmasker::commands;
use metmasker::{init_tracing, Config};

fn main() -> anyhow::Result<ExitCode> {
    // Load configuration
    let (config, command) = Config::load().context("Failed to load configuration")?;

    // Validate configuration before anything is logged with it
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.log_level);
    info!("Starting metmasker v{}", env!("CARGO_PKG_VERSION"));

    let report = commands::run(&command, &config).map_err(|e| {
        error!("Command failed: {}", e);
        e
    })?;

    let rendered = report.render(&config).context("Failed to render report")?;
    print!("{rendered}");
    if config.output.format == "json" {
        println!();
    }

    if report.has_failures() {
        error!("One or more inputs failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
