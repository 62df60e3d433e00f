//! Error types for model construction and assignment validation.

use crate::ids::PoolId;

/// Errors raised while building model state from external input.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// An oracle assignment entry referenced a pool outside `[0, pool_count)`.
    #[error("unit {unit} assigned to pool {value}, valid range is [0, {pool_count})")]
    AssignmentOutOfRange {
        /// Index of the offending unit.
        unit: usize,
        /// The raw assignment value.
        value: i64,
        /// Number of pools in the design.
        pool_count: usize,
    },

    /// An assignment array did not cover every unit exactly once.
    #[error("assignment has {found} entries, expected {expected}")]
    AssignmentLengthMismatch {
        /// Number of units in the graph.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },

    /// A resource vector had the wrong dimensionality.
    #[error("resource vector has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        /// Dimensionality established by the design.
        expected: usize,
        /// Dimensionality found.
        found: usize,
    },

    /// A topology edge referenced a pool that does not exist.
    #[error("topology edge references unknown pool {pool}")]
    UnknownPool {
        /// The out-of-range pool ID.
        pool: PoolId,
    },
}
