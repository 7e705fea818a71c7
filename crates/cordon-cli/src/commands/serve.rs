// SPDX-License-Identifier: Apache-2.0

//! TCP listener source.
//!
//! One task per connection; each task owns its buffer, parser, and every
//! per-request value it produces, so nothing mutable is shared between
//! connections. Parsing is strict here: remote peers get a typed error for
//! unknown input instead of an echo. Dropping a connection task releases
//! its file handles and in-flight allocations through ownership.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use cordon_core::{
    BoundedBuffer, CommandDispatcher, CommandParser, CordonConfig, CordonError, InputSource,
    Outcome, UnknownPrefix,
};

use crate::cli::{OutputContext, OutputFormat};
use crate::output;
use crate::reader::read_bounded_line;

/// Binds the listener and serves connections until interrupted.
pub async fn run(
    bind: &str,
    ctx: &OutputContext,
    config: Arc<CordonConfig>,
    dispatcher: Arc<CommandDispatcher>,
) -> Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;

    tracing::info!(%addr, "listening");
    if !ctx.quiet {
        println!("listening on {addr}");
    }

    loop {
        let (stream, peer) = listener.accept().await.context("accept failed")?;
        tracing::info!(%peer, "connection opened");

        let config = Arc::clone(&config);
        let dispatcher = Arc::clone(&dispatcher);
        tokio::spawn(async move {
            match handle_connection(stream, &config, &dispatcher).await {
                Ok(()) => tracing::info!(%peer, "connection closed"),
                Err(e) => tracing::warn!(%peer, error = %e, "connection ended with error"),
            }
        });
    }
}

/// Serves one connection line by line.
async fn handle_connection(
    stream: TcpStream,
    config: &CordonConfig,
    dispatcher: &CommandDispatcher,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let buffer = BoundedBuffer::new(config.limits.max_input_bytes);
    let parser = CommandParser::new(UnknownPrefix::Reject);
    // Responses are always plain text; styling is for terminals.
    let plain = OutputContext {
        format: OutputFormat::Text,
        quiet: true,
        is_tty: false,
    };

    while let Some(line) = read_bounded_line(&mut reader, buffer.max_len()).await? {
        if line.is_empty() {
            continue;
        }

        let response = match process(&buffer, &parser, dispatcher, &line).await {
            Ok(outcome) => output::render_text(&outcome, &plain),
            Err(e) => output::render_error_line(&e),
        };

        write_half.write_all(response.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    Ok(())
}

/// Ingest, parse, dispatch for one socket line.
async fn process(
    buffer: &BoundedBuffer,
    parser: &CommandParser,
    dispatcher: &CommandDispatcher,
    line: &[u8],
) -> Result<Outcome, CordonError> {
    let raw = buffer.ingest(line, InputSource::Socket)?;
    let command = parser.parse(&raw)?;
    dispatcher.dispatch(command).await
}
