// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the Cordon CLI.
//!
//! Each input source gets its own handler module; this module wires the
//! configuration snapshot, the user directory, and the dispatcher together
//! and routes to the right handler.

mod completion;
mod line;
mod repl;
mod serve;

use std::sync::Arc;

use anyhow::Result;
use cordon_core::{CommandDispatcher, CordonConfig, Credential, MemoryDirectory};

use crate::cli::{Commands, OutputContext};

/// Runs the selected subcommand.
pub async fn run(command: Commands, ctx: OutputContext, config: CordonConfig) -> Result<()> {
    if let Commands::Completion(cmd) = &command {
        completion::run(cmd);
        return Ok(());
    }

    let config = Arc::new(config);
    let directory = build_directory(&config);
    let dispatcher = Arc::new(CommandDispatcher::new(Arc::clone(&config), directory)?);

    match command {
        Commands::Line { input } => line::run(&input, &ctx, &config, &dispatcher).await,
        Commands::Repl => repl::run(&ctx, &config, &dispatcher).await,
        Commands::Serve { bind } => serve::run(&bind, &ctx, config, dispatcher).await,
        Commands::Completion(_) => Ok(()),
    }
}

/// Seeds the in-memory user directory from configuration.
///
/// Secrets are wrapped in [`Credential`] here and never touched as plain
/// strings again.
fn build_directory(config: &CordonConfig) -> Arc<MemoryDirectory> {
    let mut directory = MemoryDirectory::new();
    for (username, secret) in &config.auth.users {
        directory.add_user(username.clone(), Credential::new(secret.clone()));
    }
    tracing::debug!(users = directory.len(), "user directory seeded");
    Arc::new(directory)
}
