// SPDX-License-Identifier: Apache-2.0

//! One-shot dispatch of a single argument line.

use anyhow::Result;
use cordon_core::{BoundedBuffer, CommandDispatcher, CommandParser, CordonConfig, InputSource};

use crate::cli::OutputContext;
use crate::output;

/// Classifies and dispatches one input line supplied as an argument.
pub async fn run(
    input: &str,
    ctx: &OutputContext,
    config: &CordonConfig,
    dispatcher: &CommandDispatcher,
) -> Result<()> {
    let buffer = BoundedBuffer::new(config.limits.max_input_bytes);
    let raw = buffer.ingest(input.as_bytes(), InputSource::Argument)?;
    let command = CommandParser::default().parse(&raw)?;
    let outcome = dispatcher.dispatch(command).await?;

    output::render_outcome(&outcome, ctx);
    Ok(())
}
