// SPDX-License-Identifier: Apache-2.0

//! Cordon - hardened command dispatch over untrusted input.
//!
//! A CLI tool that accepts untrusted text from arguments, stdin, or a
//! socket and executes a small command grammar through a safety boundary.

mod cli;
mod commands;
mod errors;
mod logging;
mod output;
mod reader;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use crate::cli::{Cli, OutputContext};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.output, cli.verbose);

    let output_ctx = OutputContext::from_cli(cli.output, cli.quiet);

    let mut config = cordon_core::load_config().context("Failed to load configuration")?;
    debug!("Configuration loaded successfully");

    // Apply CLI overrides to config
    if let Some(root) = &cli.root {
        config.paths.allowed_root.clone_from(root);
        debug!(root = %root.display(), "Overriding allowed root");
    }

    match commands::run(cli.command, output_ctx, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let formatted = errors::format_error(&e);
            eprintln!("Error: {formatted}");
            Err(e)
        }
    }
}
