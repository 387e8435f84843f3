//! Error types for the set-based graph core.
//!
//! Every failure here is a local precondition violation, not a transient
//! condition: there are no retry semantics anywhere in the core. Callers
//! (typically an evaluator layer) surface these to the end user as modeling
//! errors.

use thiserror::Error;

/// Top-level error type for the set and map algebra.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SbgError {
    /// Operand arity disagreement in an operation that accepts
    /// caller-supplied data. Arity mismatches inside the algebra itself are
    /// programming errors and panic instead.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Arity of the left operand.
        left: usize,
        /// Arity of the right operand.
        right: usize,
    },

    /// `min_elem`/`max_elem` requested on an empty set.
    #[error("{op} is undefined on an empty set")]
    EmptyOperation {
        /// The operation that was attempted.
        op: &'static str,
    },

    /// An affine law that does not send the domain's strided points to
    /// integral strided points.
    #[error("affine law does not preserve integral strides")]
    NonIntegralMap,

    /// Inversion requested on a non-injective restriction.
    #[error("inverse of a non-injective map restriction")]
    UndefinedInverse,

    /// Topological ordering requested on a graph with a cycle.
    #[error("graph contains a cycle")]
    CyclicGraph,
}

/// Result type using SbgError.
pub type SbgResult<T> = Result<T, SbgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SbgError::DimensionMismatch { left: 2, right: 3 };
        assert!(format!("{}", err).contains("2 vs 3"));

        let err = SbgError::EmptyOperation { op: "min_elem" };
        assert!(format!("{}", err).contains("min_elem"));
    }
}
