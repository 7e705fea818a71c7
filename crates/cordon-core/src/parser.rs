// SPDX-License-Identifier: Apache-2.0

//! Classification of raw input into typed commands.
//!
//! The grammar is a fixed set of literal prefixes (`exec:`, `alloc:`,
//! `file:`, `auth:`, `lookup:`); the remainder of the line is the payload.
//! Anything that matches no prefix is handled according to the parser's
//! [`UnknownPrefix`] policy: echoed back as data (the safe default) or
//! rejected with a typed error. Unknown input never falls through to an
//! action.

use crate::credential::Credential;
use crate::error::CordonError;
use crate::input::RawInput;

/// A classified command, consumed exactly once by the dispatcher.
#[derive(Debug)]
pub enum Command {
    /// Run the configured external action with the payload as its single
    /// argument.
    Execute(String),
    /// Allocate the given number of bytes after validation.
    Allocate(usize),
    /// Read a file confined to the allowed root.
    ReadFile(String),
    /// Verify a credential for a username.
    AuthenticateAttempt {
        /// Username the attempt is for.
        username: String,
        /// Provided secret. Redacted from `Debug` output.
        secret: Credential,
    },
    /// Search the user directory with the payload as an exact parameter.
    Lookup(String),
    /// Return the input as data.
    Echo(String),
}

impl Command {
    /// Stable variant name for structured log fields.
    ///
    /// Never includes payload or secret material.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Execute(_) => "execute",
            Command::Allocate(_) => "allocate",
            Command::ReadFile(_) => "read_file",
            Command::AuthenticateAttempt { .. } => "authenticate",
            Command::Lookup(_) => "lookup",
            Command::Echo(_) => "echo",
        }
    }
}

/// Policy for input that matches no known prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPrefix {
    /// Classify unknown input as [`Command::Echo`]. The safe default:
    /// nothing unrecognized ever reaches an action.
    #[default]
    EchoFallback,
    /// Reject unknown input with [`CordonError::UnrecognizedCommand`].
    /// Used by the socket listener so remote peers get a typed error.
    Reject,
}

/// Classifies a line of validated-length input into a [`Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandParser {
    policy: UnknownPrefix,
}

impl CommandParser {
    /// Creates a parser with the given unknown-prefix policy.
    #[must_use]
    pub fn new(policy: UnknownPrefix) -> Self {
        Self { policy }
    }

    /// Parses raw input into a command.
    ///
    /// Trailing CR/LF from line-oriented sources is stripped before
    /// classification. Input that is not valid UTF-8 is rejected under both
    /// policies; it cannot be a command and echoing undecodable bytes back
    /// helps nobody.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::UnrecognizedCommand`] for non-text input, for
    /// a structurally invalid `auth:` payload, or (under
    /// [`UnknownPrefix::Reject`]) for input matching no known prefix.
    /// Returns [`CordonError::MalformedNumber`] if an `alloc:` payload fails
    /// checked integer parsing.
    pub fn parse(&self, input: &RawInput) -> Result<Command, CordonError> {
        let text =
            std::str::from_utf8(input.bytes()).map_err(|_| CordonError::UnrecognizedCommand)?;
        let line = text.trim_end_matches(['\r', '\n']);

        let command = if let Some(payload) = line.strip_prefix("exec:") {
            Command::Execute(payload.to_string())
        } else if let Some(payload) = line.strip_prefix("alloc:") {
            Command::Allocate(parse_count(payload)?)
        } else if let Some(payload) = line.strip_prefix("file:") {
            Command::ReadFile(payload.to_string())
        } else if let Some(payload) = line.strip_prefix("auth:") {
            let (username, secret) = payload
                .split_once(':')
                .ok_or(CordonError::UnrecognizedCommand)?;
            Command::AuthenticateAttempt {
                username: username.to_string(),
                secret: Credential::new(secret),
            }
        } else if let Some(payload) = line.strip_prefix("lookup:") {
            Command::Lookup(payload.to_string())
        } else {
            match self.policy {
                UnknownPrefix::EchoFallback => Command::Echo(line.to_string()),
                UnknownPrefix::Reject => return Err(CordonError::UnrecognizedCommand),
            }
        };

        tracing::debug!(
            source = input.source().as_str(),
            kind = command.kind(),
            "input classified"
        );

        Ok(command)
    }
}

/// Parses an allocation count with checked integer parsing.
///
/// Overflow and junk both fail; nothing is silently truncated or wrapped.
fn parse_count(payload: &str) -> Result<usize, CordonError> {
    payload
        .trim()
        .parse::<usize>()
        .map_err(|_| CordonError::MalformedNumber { field: "alloc" })
}
