// src/main.rs
use std::process::exit;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use taskexec::cli::{App, Args};

fn main() -> Result<()> {
    let args = Args::parse();

    let app = App::from_args(&args).context("Failed to load settings")?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(app.log_level(&args)?)
        .with_writer(std::io::stderr)
        .init();

    let runtime = app.build_runtime().context("Failed to start tokio runtime")?;

    if let Err(e) = runtime.block_on(app.run(&args)) {
        error!("Command execution failed: {}", e);
        exit(1);
    }

    Ok(())
}
