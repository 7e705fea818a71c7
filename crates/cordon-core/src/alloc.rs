// SPDX-License-Identifier: Apache-2.0

//! Checked allocation sizing and scoped acquisition.
//!
//! [`SafeAllocator::validate`] proves a `(count, unit)` request sound before
//! any memory is touched: the product is computed with overflow-checked
//! arithmetic and bounded by a configured maximum. The actual allocation is
//! a [`ScopedAllocation`], released on every exit path by RAII.

use crate::error::CordonError;

/// A validated `(size, unit)` pair.
///
/// Guarantees `count * unit` did not overflow and lies within the
/// allocator's configured maximum. Can only be produced by
/// [`SafeAllocator::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRequest {
    bytes: usize,
}

impl AllocationRequest {
    /// Total validated size in bytes.
    #[must_use]
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

/// Validates size requests before any allocation happens.
#[derive(Debug, Clone, Copy)]
pub struct SafeAllocator {
    max_bytes: usize,
    allow_zero: bool,
}

impl SafeAllocator {
    /// Creates an allocator bounded by `max_bytes`. Zero-size requests are
    /// rejected; use [`SafeAllocator::permit_zero`] for callers whose policy
    /// allows them.
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            allow_zero: false,
        }
    }

    /// Returns an allocator that accepts zero-size requests.
    #[must_use]
    pub fn permit_zero(mut self) -> Self {
        self.allow_zero = true;
        self
    }

    /// Validates a request for `count` elements of `unit` bytes each.
    ///
    /// # Errors
    ///
    /// Returns [`CordonError::Overflow`] if `count * unit` overflows the
    /// platform size type, and [`CordonError::SizeOutOfRange`] if the
    /// product is zero (when disallowed) or exceeds the configured maximum.
    pub fn validate(&self, count: usize, unit: usize) -> Result<AllocationRequest, CordonError> {
        let bytes = count.checked_mul(unit).ok_or(CordonError::Overflow)?;

        if bytes == 0 && !self.allow_zero {
            return Err(CordonError::SizeOutOfRange {
                requested: 0,
                max: self.max_bytes,
            });
        }
        if bytes > self.max_bytes {
            return Err(CordonError::SizeOutOfRange {
                requested: bytes,
                max: self.max_bytes,
            });
        }

        Ok(AllocationRequest { bytes })
    }
}

/// A zero-initialized buffer acquired from a validated request.
///
/// Dropping the value releases the memory; there is no separate free step
/// to forget or repeat.
#[derive(Debug)]
pub struct ScopedAllocation {
    buf: Vec<u8>,
}

impl ScopedAllocation {
    /// Acquires the memory described by a validated request.
    #[must_use]
    pub fn acquire(request: AllocationRequest) -> Self {
        Self {
            buf: vec![0u8; request.bytes()],
        }
    }

    /// Size of the acquired buffer in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Drop for ScopedAllocation {
    fn drop(&mut self) {
        tracing::trace!(bytes = self.buf.len(), "scoped allocation released");
    }
}
