// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Cordon Core
//!
//! Hardened input-handling and command-dispatch core.
//!
//! Untrusted text enters through a size-checked buffer, is classified into
//! a small command grammar, and is executed behind a safety boundary:
//! bounded copies, parameterized lookups, constant-time credential
//! comparison, validated file paths, checked allocation sizes, and
//! allow-listed external process invocation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cordon_core::{
//!     BoundedBuffer, CommandDispatcher, CommandParser, CordonConfig, Credential,
//!     InputSource, MemoryDirectory,
//! };
//!
//! # async fn example() -> Result<(), cordon_core::CordonError> {
//! let config = Arc::new(CordonConfig::default());
//!
//! let mut directory = MemoryDirectory::new();
//! directory.add_user("admin", Credential::new("expected-secret"));
//!
//! let dispatcher = CommandDispatcher::new(config.clone(), Arc::new(directory))?;
//!
//! let buffer = BoundedBuffer::new(config.limits.max_input_bytes);
//! let raw = buffer.ingest(b"exec:hello", InputSource::Stdin)?;
//! let command = CommandParser::default().parse(&raw)?;
//! let outcome = dispatcher.dispatch(command).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`input`] - Size-checked ingestion ([`BoundedBuffer`], [`RawInput`])
//! - [`parser`] - Command grammar ([`CommandParser`], [`Command`])
//! - [`alloc`] - Checked allocation sizing ([`SafeAllocator`])
//! - [`path`] - Path confinement ([`PathValidator`])
//! - [`invoke`] - Allow-listed process invocation ([`ProcessInvoker`])
//! - [`credential`] - Constant-time verification ([`CredentialVerifier`])
//! - [`directory`] - Pluggable user lookup ([`UserDirectory`])
//! - [`dispatch`] - Orchestration ([`CommandDispatcher`], [`Outcome`])
//! - [`config`] - Configuration snapshot ([`CordonConfig`])
//! - [`error`] - Error types ([`CordonError`])

// ============================================================================
// Error Handling
// ============================================================================

pub use error::CordonError;

/// Convenience Result type for Cordon operations.
///
/// This is equivalent to `std::result::Result<T, CordonError>`.
pub type Result<T> = std::result::Result<T, CordonError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    ActionsConfig, AuthConfig, CordonConfig, LimitsConfig, PathsConfig, config_dir,
    config_file_path, load_config,
};

// ============================================================================
// Input Ingestion
// ============================================================================

pub use input::{BoundedBuffer, InputSource, RawInput};

// ============================================================================
// Command Grammar
// ============================================================================

pub use parser::{Command, CommandParser, UnknownPrefix};

// ============================================================================
// Safety Components
// ============================================================================

pub use alloc::{AllocationRequest, SafeAllocator, ScopedAllocation};
pub use credential::{Credential, CredentialVerifier};
pub use invoke::{ActionRunner, ProcessInvoker, TokioRunner};
pub use path::{PathValidator, ValidatedPath, read_bounded};

// ============================================================================
// Capabilities
// ============================================================================

pub use directory::{MemoryDirectory, UserDirectory};

// ============================================================================
// Dispatch
// ============================================================================

pub use dispatch::{CommandDispatcher, Outcome};

// ============================================================================
// Modules
// ============================================================================

pub mod alloc;
pub mod config;
pub mod credential;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod invoke;
pub mod parser;
pub mod path;
