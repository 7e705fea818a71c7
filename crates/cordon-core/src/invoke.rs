// SPDX-License-Identifier: Apache-2.0

//! Allow-listed external process invocation.
//!
//! Actions are named entries in a closed map from name to executable path;
//! anything not listed is denied before any process state exists. Arguments
//! travel as a discrete vector straight into process creation. No shell is
//! ever involved, so no character in any argument is ever interpreted.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::CordonError;

/// Seam between the invoker and actual process creation.
///
/// The production implementation is [`TokioRunner`]; tests substitute a
/// counting stub to prove that denied actions never spawn.
#[async_trait]
pub trait ActionRunner: Send + Sync {
    /// Runs `program` with `args`, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::ExecutionFailed`] on spawn failure, abnormal
    /// exit, or timeout.
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<Vec<u8>, CordonError>;
}

/// Process runner backed by `tokio::process`.
#[derive(Debug, Default)]
pub struct TokioRunner;

#[async_trait]
impl ActionRunner for TokioRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<Vec<u8>, CordonError> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(timeout, output).await {
            Err(_elapsed) => Err(CordonError::ExecutionFailed {
                reason: format!("timed out after {}s", timeout.as_secs()),
            }),
            Ok(Err(e)) => Err(CordonError::ExecutionFailed {
                reason: format!("spawn failed: {}", e.kind()),
            }),
            Ok(Ok(output)) if !output.status.success() => Err(CordonError::ExecutionFailed {
                reason: format!("exit status {}", output.status),
            }),
            Ok(Ok(output)) => Ok(output.stdout),
        }
    }
}

/// Runs external actions through a static allow-list.
pub struct ProcessInvoker {
    actions: BTreeMap<String, PathBuf>,
    runner: Arc<dyn ActionRunner>,
    timeout: Duration,
    max_output_bytes: usize,
}

impl ProcessInvoker {
    /// Creates an invoker over the given allow-list using [`TokioRunner`].
    #[must_use]
    pub fn new(
        actions: BTreeMap<String, PathBuf>,
        timeout: Duration,
        max_output_bytes: usize,
    ) -> Self {
        Self::with_runner(actions, timeout, max_output_bytes, Arc::new(TokioRunner))
    }

    /// Creates an invoker with a custom runner. Primarily a test seam.
    #[must_use]
    pub fn with_runner(
        actions: BTreeMap<String, PathBuf>,
        timeout: Duration,
        max_output_bytes: usize,
        runner: Arc<dyn ActionRunner>,
    ) -> Self {
        Self {
            actions,
            runner,
            timeout,
            max_output_bytes,
        }
    }

    /// Invokes an allow-listed action with a discrete argument vector.
    ///
    /// The allow-list check completes before any process state is created;
    /// for denied actions the runner is never consulted. Captured output is
    /// decoded lossily and capped at the configured maximum.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::ActionNotAllowed`] for unlisted actions and
    /// [`CordonError::ExecutionFailed`] for spawn, exit, or timeout
    /// failures.
    pub async fn invoke(&self, action: &str, args: &[String]) -> Result<String, CordonError> {
        let program = self
            .actions
            .get(action)
            .ok_or_else(|| CordonError::ActionNotAllowed(action.to_string()))?;

        tracing::debug!(action, args = args.len(), "invoking external action");

        let raw = self.runner.run(program, args, self.timeout).await?;
        let mut text = String::from_utf8_lossy(&raw).into_owned();
        if text.len() > self.max_output_bytes {
            let mut end = self.max_output_bytes;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
        }
        Ok(text)
    }

    /// Names of all allow-listed actions.
    #[must_use]
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }
}
