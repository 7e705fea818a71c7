// SPDX-License-Identifier: Apache-2.0

//! Interactive stdin loop.
//!
//! Reads newline-terminated lines through the bounded reader, dispatches
//! each one, and keeps going on recoverable errors. Every error is
//! recoverable at this boundary.

use anyhow::Result;
use tokio::io::BufReader;

use cordon_core::{BoundedBuffer, CommandDispatcher, CommandParser, CordonConfig, InputSource};

use crate::cli::OutputContext;
use crate::output;
use crate::reader::read_bounded_line;

/// Runs the interactive loop until end of input.
pub async fn run(
    ctx: &OutputContext,
    config: &CordonConfig,
    dispatcher: &CommandDispatcher,
) -> Result<()> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let buffer = BoundedBuffer::new(config.limits.max_input_bytes);
    let parser = CommandParser::default();

    while let Some(line) = read_bounded_line(&mut stdin, buffer.max_len()).await? {
        if line.is_empty() {
            continue;
        }

        let result = async {
            let raw = buffer.ingest(&line, InputSource::Stdin)?;
            let command = parser.parse(&raw)?;
            dispatcher.dispatch(command).await
        }
        .await;

        match result {
            Ok(outcome) => output::render_outcome(&outcome, ctx),
            Err(e) => eprintln!("{}", output::render_error_line(&e)),
        }
    }

    Ok(())
}
