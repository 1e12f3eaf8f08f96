//! Error types for warden-stack
//!
//! Uses thiserror for clean, idiomatic Rust error definitions. Every public
//! operation returns [`StackResult`]; nothing in this crate panics on bad
//! input.

use thiserror::Error;

#[cfg(feature = "logging")]
use warden_log::{error, warn};

// ============================================================================
// Main Error Type
// ============================================================================

/// Which protected region failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrityFault {
    /// Guard placed in the handle ahead of the metadata.
    FrontStructGuard,
    /// Guard placed in the handle after the metadata.
    BackStructGuard,
    /// Guard slot immediately before the element array.
    FrontDataGuard,
    /// Guard slot immediately after the element array.
    BackDataGuard,
    /// `len`/`capacity` disagree with each other or with the buffer.
    Bounds,
    /// Stored digest differs from the recomputed one.
    Digest,
}

impl core::fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::FrontStructGuard => "front structural guard",
            Self::BackStructGuard => "back structural guard",
            Self::FrontDataGuard => "front data guard",
            Self::BackDataGuard => "back data guard",
            Self::Bounds => "bounds",
            Self::Digest => "digest",
        };
        f.write_str(name)
    }
}

/// Stack operation errors
#[must_use = "errors should be handled"]
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    /// The backing buffer could not be obtained (heap exhaustion or the
    /// configured `max_capacity` ceiling).
    #[error("Stack allocation failed: {requested} slots ({bytes} bytes)")]
    AllocationFailure { requested: usize, bytes: usize },

    /// `pop`/`peek` on a stack holding no elements.
    #[error("Stack is empty")]
    Empty,

    /// No handle was supplied.
    #[error("Bad stack handle: {reason}")]
    BadHandle { reason: &'static str },

    /// The handle was never initialized or has already been freed.
    #[error("Stack is not initialized")]
    NotInitialized,

    /// A guard or the digest no longer matches.
    #[error("Stack corrupted: {fault} mismatch (expected {expected:#X}, found {found:#X})")]
    Corrupted {
        fault: IntegrityFault,
        expected: u64,
        found: u64,
    },

    /// `StackConfig` rejected by validation.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The diagnostic sink refused a write.
    #[error("Diagnostic dump failed: {reason}")]
    DumpFailed { reason: String },
}

impl StackError {
    /// `Empty` and `AllocationFailure` are ordinary outcomes the caller is
    /// expected to handle; everything else points at a caller bug or at
    /// memory damage of unknown extent.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Empty | Self::AllocationFailure { .. })
    }

    /// True for guard or digest mismatches.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupted { .. })
    }

    /// Get error code for categorization
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AllocationFailure { .. } => "STACK:ALLOC:FAILED",
            Self::Empty => "STACK:OP:EMPTY",
            Self::BadHandle { .. } => "STACK:HANDLE:BAD",
            Self::NotInitialized => "STACK:HANDLE:UNINIT",
            Self::Corrupted { .. } => "STACK:INTEGRITY:CORRUPTED",
            Self::InvalidConfig { .. } => "STACK:CONFIG:INVALID",
            Self::DumpFailed { .. } => "STACK:DUMP:FAILED",
        }
    }

    // ============================================================================
    // Convenience Constructors
    // ============================================================================

    /// Create allocation failure error for a request of `requested` slots
    pub fn allocation_failure(requested: usize) -> Self {
        let bytes = crate::layout::buffer_bytes(requested).unwrap_or(usize::MAX);

        #[cfg(feature = "logging")]
        warn!(requested, bytes, "stack allocation failed");

        Self::AllocationFailure { requested, bytes }
    }

    /// Create bad handle error
    pub fn bad_handle(reason: &'static str) -> Self {
        Self::BadHandle { reason }
    }

    /// Create corruption error
    pub fn corrupted(fault: IntegrityFault, expected: u64, found: u64) -> Self {
        #[cfg(feature = "logging")]
        error!(%fault, expected, found, "stack corruption detected");

        Self::Corrupted {
            fault,
            expected,
            found,
        }
    }

    /// Create invalid config error
    pub fn invalid_config(reason: &str) -> Self {
        Self::InvalidConfig {
            reason: reason.to_string(),
        }
    }

    /// Create dump failed error
    pub fn dump_failed(err: &std::io::Error) -> Self {
        Self::DumpFailed {
            reason: err.to_string(),
        }
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result type for stack operations
pub type StackResult<T> = core::result::Result<T, StackError>;

// ============================================================================
// Tests
// ============================================================================
