// SPDX-License-Identifier: Apache-2.0

//! CLI-specific error formatting with user-friendly hints.
//!
//! Downcasts `anyhow::Error` to `CordonError` and appends hints for the
//! error kinds a user can act on. Error text never includes secret
//! material; the library guarantees that and this layer preserves it.

use anyhow::Error;
use cordon_core::CordonError;

/// Formats an error for CLI display with helpful hints.
///
/// If the error is not a `CordonError`, returns the original error message.
///
/// # Arguments
///
/// * `error` - The error to format
///
/// # Returns
///
/// A formatted error message with hints
pub fn format_error(error: &Error) -> String {
    if let Some(cordon_err) = error.downcast_ref::<CordonError>() {
        match cordon_err {
            CordonError::InputTooLong { .. } => {
                format!("{cordon_err}\n\nTip: Raise limits.max_input_bytes in your config to accept longer input.")
            }
            CordonError::PathEscapesRoot | CordonError::PathNotFound => {
                format!(
                    "{cordon_err}\n\nTip: file: paths are confined to the allowed root. Check paths.allowed_root in your config."
                )
            }
            CordonError::ActionNotAllowed(_) => {
                format!(
                    "{cordon_err}\n\nTip: Only actions listed under [actions.allowed] in your config can run."
                )
            }
            CordonError::Overflow | CordonError::SizeOutOfRange { .. } => {
                format!(
                    "{cordon_err}\n\nTip: Allocation requests are bounded by limits.max_alloc_bytes."
                )
            }
            CordonError::UnrecognizedCommand => {
                format!(
                    "{cordon_err}\n\nTip: Commands start with exec:, alloc:, file:, auth:, or lookup:."
                )
            }
            // No hint: saying more would help an attacker more than a user.
            CordonError::AuthFailed => cordon_err.to_string(),
            _ => cordon_err.to_string(),
        }
    } else {
        error.to_string()
    }
}
