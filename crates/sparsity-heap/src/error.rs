//! Heap-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during heap operations.
///
/// Every variant describes a caller mistake or a resource failure; none of
/// them is transient and none should be retried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeapError {
    /// A page or pool was asked for a block of a size it does not serve.
    SizeClassMismatch {
        /// Block size the page or pool is configured for.
        expected: usize,
        /// Size that was passed in.
        actual: usize,
    },
    /// A handle whose address or size class does not belong to this heap.
    ///
    /// Usually a handle from another heap, or one that was already freed
    /// and then tampered with.
    NotOwned {
        /// Address carried by the handle.
        address: usize,
        /// Block size carried by the handle.
        byte_size: usize,
    },
    /// `grow` was called with a size that does not exceed the current one.
    ShrinkUnsupported {
        /// Current block size of the handle.
        current: usize,
        /// The requested new size.
        requested: usize,
    },
    /// The host allocator could not provide a new page.
    Exhausted {
        /// Number of bytes the failed page allocation asked for.
        requested: usize,
    },
    /// Page granularity and block size are incompatible, or the config
    /// itself failed validation.
    InvalidConfig {
        /// Human-readable description of the violated constraint.
        reason: String,
    },
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeClassMismatch { expected, actual } => {
                write!(
                    f,
                    "size class mismatch: block size is {expected} bytes, got {actual} bytes"
                )
            }
            Self::NotOwned { address, byte_size } => {
                write!(
                    f,
                    "handle 0x{address:x} ({byte_size} bytes) is not owned by this heap"
                )
            }
            Self::ShrinkUnsupported { current, requested } => {
                write!(
                    f,
                    "cannot grow a {current}-byte block to {requested} bytes (no shrinking)"
                )
            }
            Self::Exhausted { requested } => {
                write!(f, "host allocation of {requested} bytes failed")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid heap configuration: {reason}")
            }
        }
    }
}

impl Error for HeapError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_sizes() {
        let err = HeapError::SizeClassMismatch {
            expected: 16,
            actual: 8,
        };
        let text = err.to_string();
        assert!(text.contains("16"));
        assert!(text.contains('8'));
    }

    #[test]
    fn not_owned_prints_hex_address() {
        let err = HeapError::NotOwned {
            address: 0xdead,
            byte_size: 32,
        };
        assert!(err.to_string().contains("0xdead"));
    }
}
