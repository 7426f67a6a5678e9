//! # Core Error Types
//!
//! Errors raised by storage primitives.

use thiserror::Error;

/// Errors that can occur when growing a buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// The buffer would exceed its configured element limit.
    #[error("buffer limit exceeded: requested {requested} elements, limit is {limit}")]
    CapacityExceeded {
        /// Total length the operation needed.
        requested: usize,
        /// Configured element limit.
        limit: usize,
    },

    /// The allocator refused to provide the memory.
    #[error("allocation failed while reserving {requested} elements")]
    AllocationFailed {
        /// Number of additional elements that were being reserved.
        requested: usize,
    },
}

/// Result type for storage operations.
pub type CoreResult<T> = Result<T, CoreError>;
