//! Error types shared by the allocator family.

use thiserror::Error;

/// Failure of a raw aligned allocation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// The underlying heap returned no memory.
  #[error("out of memory: failed to allocate {requested} bytes")]
  OutOfMemory {
    /// Total bytes requested from the underlying heap.
    requested: usize,
  },

  /// Padding and header pushed the request past `usize::MAX`.
  #[error("allocation size overflow: {requested} bytes plus alignment header")]
  SizeOverflow {
    /// Payload bytes the caller asked for.
    requested: usize,
  },
}

/// Failure of a vector mutation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
  /// The element blob does not match the vector's element stride.
  #[error("element size mismatch: expected {expected} bytes, found {found}")]
  ElementSize {
    /// Stride fixed at creation.
    expected: usize,
    /// Length of the blob passed in.
    found: usize,
  },

  /// Growing the backing buffer failed; the vector is unchanged.
  #[error(transparent)]
  Alloc(#[from] AllocError),
}
