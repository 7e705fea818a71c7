// SPDX-License-Identifier: Apache-2.0

//! Opaque credentials and constant-time verification.
//!
//! # Security Properties
//!
//! - Secrets are held in [`secrecy::SecretString`], so `Debug` output is
//!   redacted and the value is zeroized on drop.
//! - Verification hashes both sides with SHA-256 and compares the
//!   fixed-length digests with `subtle::ConstantTimeEq`. Running time does
//!   not depend on where the values differ, and length differences are
//!   invisible because digests are length-normalized.
//! - No code path compares secret material with a short-circuiting
//!   equality check.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// An opaque secret value.
///
/// Construction consumes the plaintext; from then on it is only reachable
/// through [`CredentialVerifier`]. The `Debug` representation is redacted.
#[derive(Debug, Clone)]
pub struct Credential(SecretString);

impl Credential {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(SecretString::from(secret.into()))
    }

    fn expose_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

/// Fixed-time credential comparison.
pub struct CredentialVerifier;

impl CredentialVerifier {
    /// Compares `provided` against `expected` in constant time.
    ///
    /// Both values are digested first, so the comparison always covers the
    /// same number of bytes regardless of input lengths.
    #[must_use]
    pub fn verify(provided: &Credential, expected: &Credential) -> bool {
        let provided = Sha256::digest(provided.expose_bytes());
        let expected = Sha256::digest(expected.expose_bytes());
        provided.as_slice().ct_eq(expected.as_slice()).into()
    }
}
