// SPDX-License-Identifier: Apache-2.0

//! Size-checked ingestion of untrusted input.
//!
//! [`BoundedBuffer`] is the single entry point through which raw bytes enter
//! the core. Length is checked before any copy is made and carried alongside
//! the data from then on; nothing downstream ever assumes a trailing
//! terminator.

use crate::error::CordonError;

/// Where a piece of raw input came from.
///
/// Used for log attribution only; it never changes parsing semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// Process argument.
    Argument,
    /// Environment variable.
    Environment,
    /// Interactive input stream.
    Stdin,
    /// Socket read.
    Socket,
}

impl InputSource {
    /// Stable lowercase name for structured log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            InputSource::Argument => "argument",
            InputSource::Environment => "environment",
            InputSource::Stdin => "stdin",
            InputSource::Socket => "socket",
        }
    }
}

/// An immutable byte sequence with a known, bounded length and a declared
/// source.
///
/// Can only be produced by [`BoundedBuffer`], which guarantees the length
/// check happened before the copy.
#[derive(Debug)]
pub struct RawInput {
    bytes: Vec<u8>,
    source: InputSource,
}

impl RawInput {
    /// The ingested bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the input is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared source of this input.
    #[must_use]
    pub fn source(&self) -> InputSource {
        self.source
    }
}

/// Fixed-capacity ingestion gate for untrusted bytes.
#[derive(Debug, Clone, Copy)]
pub struct BoundedBuffer {
    max_len: usize,
}

impl BoundedBuffer {
    /// Creates a buffer that accepts at most `max_len` bytes.
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Ingests `bytes`, rejecting oversized input.
    ///
    /// The length check happens before the copy: when input exceeds the
    /// limit, no byte of it is copied.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::InputTooLong`] if `bytes` exceeds the limit.
    pub fn ingest(&self, bytes: &[u8], source: InputSource) -> Result<RawInput, CordonError> {
        if bytes.len() > self.max_len {
            return Err(CordonError::InputTooLong {
                actual: bytes.len(),
                limit: self.max_len,
            });
        }
        Ok(RawInput {
            bytes: bytes.to_vec(),
            source,
        })
    }

    /// Ingests `bytes`, truncating oversized input instead of rejecting it.
    ///
    /// The cut never lands inside a UTF-8 sequence: trailing continuation
    /// bytes are dropped along with the excess. A warning is logged so the
    /// truncation is visible to operators.
    #[must_use]
    pub fn ingest_lossy(&self, bytes: &[u8], source: InputSource) -> RawInput {
        if bytes.len() <= self.max_len {
            return RawInput {
                bytes: bytes.to_vec(),
                source,
            };
        }

        let mut end = self.max_len;
        while end > 0 && (bytes[end] & 0xC0) == 0x80 {
            end -= 1;
        }

        tracing::warn!(
            source = source.as_str(),
            dropped = bytes.len() - end,
            limit = self.max_len,
            "input truncated at ingestion"
        );

        RawInput {
            bytes: bytes[..end].to_vec(),
            source,
        }
    }

    /// The configured maximum length in bytes.
    #[must_use]
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}
