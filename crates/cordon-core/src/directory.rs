// SPDX-License-Identifier: Apache-2.0

//! Pluggable user directory.
//!
//! Abstracts the lookup backend behind a trait: queries are always passed
//! as parameter values, never assembled into query text. The shipped
//! implementation is an in-memory directory seeded from configuration.

use std::collections::BTreeMap;

use crate::credential::Credential;

/// Lookup capability over a set of users.
pub trait UserDirectory: Send + Sync {
    /// Returns usernames containing `name`. The query is an exact
    /// parameter; implementations must never splice it into query text.
    fn search(&self, name: &str) -> Vec<String>;

    /// Returns the expected secret for `username`, if the user exists.
    fn secret_for(&self, username: &str) -> Option<Credential>;
}

/// In-memory user directory.
#[derive(Default)]
pub struct MemoryDirectory {
    secrets: BTreeMap<String, Credential>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user with an expected secret.
    pub fn add_user(&mut self, username: impl Into<String>, secret: Credential) {
        self.secrets.insert(username.into(), secret);
    }

    /// Number of users in the directory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether the directory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl UserDirectory for MemoryDirectory {
    fn search(&self, name: &str) -> Vec<String> {
        self.secrets
            .keys()
            .filter(|user| user.contains(name))
            .cloned()
            .collect()
    }

    fn secret_for(&self, username: &str) -> Option<Credential> {
        self.secrets.get(username).cloned()
    }
}
