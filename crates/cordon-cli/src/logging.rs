// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the Cordon CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging.
//! Log level can be controlled via the `RUST_LOG` environment variable,
//! which always wins. The `CORDON_DEBUG` environment variable is a
//! convenience flag that raises the default filter to debug level; its
//! value is only ever used as an on/off switch, never interpreted further.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! cordon repl
//!
//! # Debug output for troubleshooting
//! CORDON_DEBUG=1 cordon repl
//!
//! # Full control
//! RUST_LOG=cordon=trace cordon repl
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::OutputFormat;

/// Initialize the logging subsystem.
///
/// Structured formats keep stdout clean: all tracing output goes to stderr.
///
/// # Arguments
///
/// * `format` - Output format (determines if quiet mode is enabled)
/// * `verbose` - Whether the `-v` flag was passed
pub fn init_logging(format: OutputFormat, verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let quiet = matches!(format, OutputFormat::Json);

    let default_filter = if verbose || debug_flag_set() {
        "cordon_core=debug,cordon_cli=debug"
    } else if quiet {
        "cordon_core=error,cordon_cli=error"
    } else {
        "cordon_core=warn,cordon_cli=warn"
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

/// Reads the `CORDON_DEBUG` environment flag.
///
/// Treats `1`, `true`, and `yes` (any case) as set; anything else,
/// including junk, is off.
fn debug_flag_set() -> bool {
    std::env::var("CORDON_DEBUG")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
