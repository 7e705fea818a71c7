// SPDX-License-Identifier: Apache-2.0

//! Command dispatch.
//!
//! One terminal transition per [`Command`] variant: validation completes
//! fully before any side effect (allocation, process spawn, file read)
//! begins, and every acquired resource is released on every exit path
//! through ownership. The dispatcher holds no mutable state; concurrent
//! requests share only the immutable configuration snapshot.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::alloc::{SafeAllocator, ScopedAllocation};
use crate::config::CordonConfig;
use crate::credential::{Credential, CredentialVerifier};
use crate::directory::UserDirectory;
use crate::error::CordonError;
use crate::invoke::{ActionRunner, ProcessInvoker};
use crate::parser::Command;
use crate::path::{self, PathValidator};

/// Result of a dispatched command, one variant per command variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// External action ran; captured stdout.
    Executed {
        /// Captured, size-capped standard output.
        stdout: String,
    },
    /// Allocation was validated, acquired, and released.
    Allocated {
        /// Number of bytes that were held.
        bytes: usize,
    },
    /// File was read inside the allowed root.
    FileRead {
        /// Size-capped file content.
        content: String,
    },
    /// Credential verified successfully.
    Authenticated {
        /// Username the verification succeeded for.
        username: String,
    },
    /// Directory search completed.
    Found {
        /// Matching usernames.
        users: Vec<String>,
    },
    /// Input echoed back as data.
    Echoed {
        /// The echoed text, length-capped.
        text: String,
    },
}

/// Routes parsed commands through the safety components.
pub struct CommandDispatcher {
    config: Arc<CordonConfig>,
    paths: PathValidator,
    allocator: SafeAllocator,
    invoker: ProcessInvoker,
    directory: Arc<dyn UserDirectory>,
    // Verified against when the username is unknown, so unknown users cost
    // the same comparison as wrong passwords.
    fallback: Credential,
}

impl CommandDispatcher {
    /// Creates a dispatcher over a configuration snapshot and a directory.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::PathNotFound`] if the configured allowed root
    /// does not exist.
    pub fn new(
        config: Arc<CordonConfig>,
        directory: Arc<dyn UserDirectory>,
    ) -> Result<Self, CordonError> {
        let invoker = ProcessInvoker::new(
            config.actions.allowed.clone(),
            Duration::from_secs(config.limits.exec_timeout_seconds),
            config.limits.max_output_bytes,
        );
        Self::with_invoker(config, directory, invoker)
    }

    /// Creates a dispatcher with a pre-built invoker. Used by tests to
    /// substitute a stub [`ActionRunner`].
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::PathNotFound`] if the configured allowed root
    /// does not exist.
    pub fn with_invoker(
        config: Arc<CordonConfig>,
        directory: Arc<dyn UserDirectory>,
        invoker: ProcessInvoker,
    ) -> Result<Self, CordonError> {
        let paths = PathValidator::new(&config.paths.allowed_root)?;
        let allocator = SafeAllocator::new(config.limits.max_alloc_bytes);
        Ok(Self {
            config,
            paths,
            allocator,
            invoker,
            directory,
            fallback: Credential::new("cordon-unknown-user-fallback"),
        })
    }

    /// Creates a dispatcher with a custom runner behind the default
    /// allow-list wiring.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::PathNotFound`] if the configured allowed root
    /// does not exist.
    pub fn with_runner(
        config: Arc<CordonConfig>,
        directory: Arc<dyn UserDirectory>,
        runner: Arc<dyn ActionRunner>,
    ) -> Result<Self, CordonError> {
        let invoker = ProcessInvoker::with_runner(
            config.actions.allowed.clone(),
            Duration::from_secs(config.limits.exec_timeout_seconds),
            config.limits.max_output_bytes,
            runner,
        );
        Self::with_invoker(config, directory, invoker)
    }

    /// Dispatches a command to its terminal transition.
    ///
    /// Consumes the command; there is no chaining.
    ///
    /// # Errors
    ///
    /// Propagates the typed error of whichever component rejected the
    /// request. No partial side effect survives an error return.
    #[tracing::instrument(skip_all, fields(kind = command.kind()))]
    pub async fn dispatch(&self, command: Command) -> Result<Outcome, CordonError> {
        match command {
            Command::Execute(payload) => {
                // The payload travels as one argv element, whatever is in it.
                let stdout = self
                    .invoker
                    .invoke(&self.config.actions.exec_action, &[payload])
                    .await?;
                Ok(Outcome::Executed { stdout })
            }

            Command::Allocate(count) => {
                let request = self.allocator.validate(count, 1)?;
                let allocation = ScopedAllocation::acquire(request);
                let bytes = allocation.len();
                drop(allocation);
                Ok(Outcome::Allocated { bytes })
            }

            Command::ReadFile(candidate) => {
                let validated = self.paths.resolve(&candidate)?;
                let content = path::read_bounded(&validated, self.config.limits.max_file_bytes)?;
                Ok(Outcome::FileRead { content })
            }

            Command::AuthenticateAttempt { username, secret } => {
                let expected = self.directory.secret_for(&username);
                let reference = expected.as_ref().unwrap_or(&self.fallback);
                let verified = CredentialVerifier::verify(&secret, reference);
                if verified && expected.is_some() {
                    tracing::info!(username, "authentication succeeded");
                    Ok(Outcome::Authenticated { username })
                } else {
                    Err(CordonError::AuthFailed)
                }
            }

            Command::Lookup(query) => Ok(Outcome::Found {
                users: self.directory.search(&query),
            }),

            Command::Echo(text) => Ok(Outcome::Echoed {
                text: cap_text(text, self.config.limits.max_output_bytes),
            }),
        }
    }
}

/// Truncates `text` to at most `max_bytes` without splitting a character.
fn cap_text(mut text: String, max_bytes: usize) -> String {
    if text.len() > max_bytes {
        let mut end = max_bytes;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MemoryDirectory;

    fn test_config() -> Arc<CordonConfig> {
        Arc::new(CordonConfig::default())
    }

    fn test_directory() -> Arc<MemoryDirectory> {
        let mut dir = MemoryDirectory::new();
        dir.add_user("admin", Credential::new("s3cret"));
        Arc::new(dir)
    }

    #[tokio::test]
    async fn test_dispatch_echo() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let outcome = dispatcher
            .dispatch(Command::Echo("hello".to_string()))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Echoed {
                text: "hello".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_allocate_releases_on_success() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let outcome = dispatcher.dispatch(Command::Allocate(512)).await.unwrap();
        assert_eq!(outcome, Outcome::Allocated { bytes: 512 });
    }

    #[tokio::test]
    async fn test_dispatch_allocate_rejects_oversize() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let err = dispatcher
            .dispatch(Command::Allocate(usize::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, CordonError::SizeOutOfRange { .. }));
    }

    #[tokio::test]
    async fn test_dispatch_auth_success() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let outcome = dispatcher
            .dispatch(Command::AuthenticateAttempt {
                username: "admin".to_string(),
                secret: Credential::new("s3cret"),
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Authenticated {
                username: "admin".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_auth_wrong_secret() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let err = dispatcher
            .dispatch(Command::AuthenticateAttempt {
                username: "admin".to_string(),
                secret: Credential::new("wrong"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CordonError::AuthFailed));
    }

    #[tokio::test]
    async fn test_dispatch_auth_unknown_user_same_error() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let err = dispatcher
            .dispatch(Command::AuthenticateAttempt {
                username: "mallory".to_string(),
                secret: Credential::new("anything"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CordonError::AuthFailed));
    }

    #[tokio::test]
    async fn test_dispatch_auth_fallback_value_is_not_accepted() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let err = dispatcher
            .dispatch(Command::AuthenticateAttempt {
                username: "mallory".to_string(),
                secret: Credential::new("cordon-unknown-user-fallback"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CordonError::AuthFailed));
    }

    #[tokio::test]
    async fn test_dispatch_lookup() {
        let dispatcher = CommandDispatcher::new(test_config(), test_directory()).unwrap();
        let outcome = dispatcher
            .dispatch(Command::Lookup("adm".to_string()))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Found {
                users: vec!["admin".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_dispatch_echo_is_capped() {
        let mut config = CordonConfig::default();
        config.limits.max_output_bytes = 8;
        let dispatcher =
            CommandDispatcher::new(Arc::new(config), test_directory()).unwrap();
        let outcome = dispatcher
            .dispatch(Command::Echo("a very long line of text".to_string()))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Echoed {
                text: "a very l".to_string()
            }
        );
    }

    #[test]
    fn test_cap_text_respects_char_boundary() {
        let capped = cap_text("héllo".to_string(), 2);
        assert_eq!(capped, "h");
    }

    #[test]
    fn test_outcome_serializes() {
        let outcome = Outcome::Executed {
            stdout: "hi\n".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("executed"));
        assert!(json.contains("hi"));
    }
}
