// SPDX-License-Identifier: Apache-2.0

//! Output rendering for CLI commands.
//!
//! Command handlers return an [`Outcome`]; this module handles
//! presentation. Payloads are always rendered as data arguments - nothing
//! that arrived as input is ever interpreted as a format or template
//! string.

use console::style;
use cordon_core::Outcome;

use crate::cli::{OutputContext, OutputFormat};

/// Renders an outcome to stdout.
pub fn render_outcome(outcome: &Outcome, ctx: &OutputContext) {
    match ctx.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(outcome)
                    .expect("Failed to serialize outcome to JSON")
            );
        }
        OutputFormat::Text => println!("{}", render_text(outcome, ctx)),
    }
}

/// Renders an outcome as a single text block.
///
/// Shared by the interactive renderers and the socket listener (which
/// writes the same text as a response line).
#[must_use]
pub fn render_text(outcome: &Outcome, ctx: &OutputContext) -> String {
    let styled = ctx.is_interactive();
    match outcome {
        Outcome::Executed { stdout } => {
            format!("{}{}", label("executed", styled), stdout.trim_end())
        }
        Outcome::Allocated { bytes } => {
            format!("{}{bytes} bytes held and released", label("allocated", styled))
        }
        Outcome::FileRead { content } => {
            format!("{}{content}", label("file", styled))
        }
        Outcome::Authenticated { username } => {
            format!("{}{username}", label("authenticated", styled))
        }
        Outcome::Found { users } => {
            if users.is_empty() {
                format!("{}no matches", label("lookup", styled))
            } else {
                format!("{}{}", label("lookup", styled), users.join(", "))
            }
        }
        Outcome::Echoed { text } => text.clone(),
    }
}

/// Renders an error as a single text line for stream responses.
#[must_use]
pub fn render_error_line(error: &cordon_core::CordonError) -> String {
    format!("error: {error}")
}

fn label(name: &str, styled: bool) -> String {
    if styled {
        format!("{} ", style(format!("{name}:")).dim())
    } else {
        format!("{name}: ")
    }
}
