// SPDX-License-Identifier: Apache-2.0

//! Configuration management for Cordon.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `CORDON_`)
//! 2. Config file: `~/.config/cordon/config.toml`
//! 3. Built-in defaults
//!
//! The loaded [`CordonConfig`] is an immutable snapshot: it is shared as
//! `Arc<CordonConfig>` and never mutated after startup.
//!
//! # Examples
//!
//! ```bash
//! # Override the allowed file root via environment variable
//! CORDON_PATHS__ALLOWED_ROOT=/srv/data cordon repl
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CordonConfig {
    /// Size and time limits applied to every request.
    pub limits: LimitsConfig,
    /// Filesystem confinement settings.
    pub paths: PathsConfig,
    /// External action allow-list.
    pub actions: ActionsConfig,
    /// Authentication directory seed.
    pub auth: AuthConfig,
}

/// Size and time limits applied to every request.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum accepted input length in bytes.
    pub max_input_bytes: usize,
    /// Maximum allocation size in bytes.
    pub max_alloc_bytes: usize,
    /// Maximum bytes returned from a file read.
    pub max_file_bytes: u64,
    /// Maximum bytes of captured process output or echoed text.
    pub max_output_bytes: usize,
    /// Timeout for external actions in seconds.
    pub exec_timeout_seconds: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 1024,
            max_alloc_bytes: 1 << 20,
            max_file_bytes: 64 * 1024,
            max_output_bytes: 8192,
            exec_timeout_seconds: 5,
        }
    }
}

/// Filesystem confinement settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root directory that `file:` commands are confined to.
    pub allowed_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            allowed_root: PathBuf::from("."),
        }
    }
}

/// External action allow-list.
///
/// Anything not listed in `allowed` is denied. The map is deliberately a
/// `BTreeMap` so rendered output (help text, JSON) is deterministic.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Action invoked by `exec:` commands. Must be a key of `allowed`.
    pub exec_action: String,
    /// Map from action name to executable path.
    pub allowed: BTreeMap<String, PathBuf>,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        let mut allowed = BTreeMap::new();
        allowed.insert("echo".to_string(), PathBuf::from("/bin/echo"));
        Self {
            exec_action: "echo".to_string(),
            allowed,
        }
    }
}

/// Authentication directory seed.
///
/// Maps usernames to their expected secrets. Values are wrapped in
/// [`crate::Credential`] immediately after loading and are never logged;
/// the `Debug` implementation shows only the user count.
#[derive(Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Username to expected-secret map.
    pub users: BTreeMap<String, String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("users", &format!("<{} redacted>", self.users.len()))
            .finish()
    }
}

/// Returns the Cordon configuration directory.
///
/// Respects `CORDON_CONFIG_DIR` for testing, otherwise uses the platform
/// config directory (e.g., `~/.config/cordon` on Linux).
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CORDON_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cordon")
}

/// Returns the path to the Cordon config file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Loads configuration from defaults, the config file, and the environment.
///
/// Missing config files are not an error; defaults apply.
///
/// # Errors
///
/// Returns a [`config::ConfigError`] if the config file or an environment
/// override fails to deserialize.
pub fn load_config() -> Result<CordonConfig, config::ConfigError> {
    let file = config_file_path();

    Config::builder()
        .add_source(File::from(file).required(false))
        .add_source(Environment::with_prefix("CORDON").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = LimitsConfig::default();
        assert_eq!(limits.max_input_bytes, 1024);
        assert_eq!(limits.max_alloc_bytes, 1 << 20);
        assert!(limits.exec_timeout_seconds > 0);
    }

    #[test]
    fn test_default_actions_allow_echo_only() {
        let actions = ActionsConfig::default();
        assert_eq!(actions.allowed.len(), 1);
        assert_eq!(
            actions.allowed.get("echo"),
            Some(&PathBuf::from("/bin/echo"))
        );
        assert_eq!(actions.exec_action, "echo");
    }

    #[test]
    fn test_default_auth_is_empty() {
        let auth = AuthConfig::default();
        assert!(auth.users.is_empty());
    }

    #[test]
    fn test_auth_debug_redacts_secrets() {
        let mut auth = AuthConfig::default();
        auth.users
            .insert("admin".to_string(), "super-secret".to_string());
        let debug = format!("{auth:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_config_sections_deserialize_independently() {
        let config: CordonConfig = serde_json::from_str(
            r#"{"limits": {"max_input_bytes": 512}, "paths": {"allowed_root": "/srv/data"}}"#,
        )
        .unwrap();

        assert_eq!(config.limits.max_input_bytes, 512);
        // Unspecified fields in a specified section fall back to defaults
        assert_eq!(config.limits.max_output_bytes, 8192);
        assert_eq!(config.paths.allowed_root, PathBuf::from("/srv/data"));
        assert_eq!(config.actions.exec_action, "echo");
    }
}
