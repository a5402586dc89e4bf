//! Error types for trajcluster-core.

use crate::hit::ProductId;
use thiserror::Error;

/// Result type alias for trajcluster operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole processing call.
///
/// Slice-local failures and lookup misses are not errors; they are
/// recorded in [`crate::AssemblyDiagnostics`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Slice association references a different hit collection than the input.
    #[error("input hits {expected:?} have a different product id than hits referenced by slice {slice_id} ({found:?})")]
    HitCollectionMismatch {
        expected: ProductId,
        found: ProductId,
        slice_id: u32,
    },

    /// Slice association references a hit outside the input collection.
    #[error("invalid slice hit index {index} into the input hit collection of size {len}")]
    InvalidSliceHitIndex { index: usize, len: usize },

    /// The external algorithm refused the input hit collection.
    #[error("failed to process input hits: {0}")]
    InputRejected(String),

    /// A link between two output records could not be recorded.
    #[error("failed to associate {what}: {left} -> {right}")]
    Association {
        what: &'static str,
        left: usize,
        right: usize,
    },

    /// A shower references an input hit that no output hit has claimed.
    #[error("shower {shower} references input hit {hit} which has no output hit")]
    UnclaimedShowerHit { shower: usize, hit: usize },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
