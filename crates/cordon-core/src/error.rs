// SPDX-License-Identifier: Apache-2.0

//! Error types for the Cordon dispatch core.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Every variant is recoverable at the dispatch boundary and none of them
//! carries secret material in its message.

use thiserror::Error;

/// Errors that can occur while ingesting, classifying, or dispatching input.
#[derive(Error, Debug)]
pub enum CordonError {
    /// Input exceeded the configured maximum length.
    #[error("input of {actual} bytes exceeds the {limit}-byte limit")]
    InputTooLong {
        /// Length of the rejected input in bytes.
        actual: usize,
        /// Configured maximum length in bytes.
        limit: usize,
    },

    /// Input could not be classified as a command.
    #[error("unrecognized command")]
    UnrecognizedCommand,

    /// A numeric payload field failed checked parsing.
    #[error("malformed number in {field} field")]
    MalformedNumber {
        /// Name of the payload field that failed to parse.
        field: &'static str,
    },

    /// A size computation overflowed the platform size type.
    #[error("allocation size computation overflowed")]
    Overflow,

    /// Allocation size outside the configured bounds.
    #[error("allocation of {requested} bytes is outside the allowed range (max {max})")]
    SizeOutOfRange {
        /// Requested size in bytes.
        requested: usize,
        /// Configured maximum in bytes.
        max: usize,
    },

    /// Candidate path resolves outside the allowed root directory.
    #[error("path escapes the allowed root directory")]
    PathEscapesRoot,

    /// Candidate path is empty or does not exist under the allowed root.
    #[error("path not found")]
    PathNotFound,

    /// Requested action is not present in the allow-list.
    #[error("action `{0}` is not allowed")]
    ActionNotAllowed(String),

    /// External process failed to start, exited abnormally, or timed out.
    #[error("execution failed: {reason}")]
    ExecutionFailed {
        /// Short description of the failure. Never contains input payloads.
        reason: String,
    },

    /// Credential verification failed.
    ///
    /// Deliberately carries no detail: the message is identical for wrong
    /// secrets and unknown usernames.
    #[error("authentication failed")]
    AuthFailed,
}
