//! Error types for the SymNMF core.
//!
//! Every fallible operation in the crate returns [`Result`]. The variants keep
//! the failure kinds distinct so that embedders can tell an allocation failure
//! from a negative degree entry; only the command-line driver collapses them
//! into a single generic message.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, SymNmfError>;

/// Errors raised by the matrix primitives, graph pipeline and factorization engine.
#[derive(Debug, Error)]
pub enum SymNmfError {
    /// Memory for a matrix buffer could not be obtained.
    #[error("allocation failed for a {rows}x{cols} matrix")]
    Allocation {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },

    /// Point ingestion saw an unreadable or malformed row.
    #[error("malformed input at line {line}: {message}")]
    MalformedInput {
        /// One-based line number of the offending row (0 when not line-specific).
        line: usize,
        /// What was wrong with the row.
        message: String,
    },

    /// Operand shapes are incompatible for the requested operation.
    #[error("dimension mismatch in {op}: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch {
        /// Name of the operation that rejected the shapes.
        op: &'static str,
        /// Shape of the left operand as `(rows, cols)`.
        left: (usize, usize),
        /// Shape of the right operand as `(rows, cols)`.
        right: (usize, usize),
    },

    /// Inverse square root was requested for a negative entry.
    #[error("negative value {value} at ({row}, {col})")]
    NegativeValue {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The negative value itself.
        value: f64,
    },

    /// The multiplicative update hit an exactly-zero `H·Hᵗ·H` entry.
    #[error("division by zero in update at ({row}, {col})")]
    DivideByZero {
        /// Row of the zero denominator.
        row: usize,
        /// Column of the zero denominator.
        col: usize,
    },

    /// Target rank is outside `1..points`.
    #[error("invalid rank {rank} for {points} points")]
    InvalidRank {
        /// Requested rank `k`.
        rank: usize,
        /// Number of points `n`.
        points: usize,
    },

    /// A configuration value or argument is out of range.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what is wrong.
        message: String,
    },

    /// Underlying I/O failure while reading points or writing results.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl SymNmfError {
    /// Create an `Allocation` error.
    pub fn allocation(rows: usize, cols: usize) -> Self {
        Self::Allocation { rows, cols }
    }

    /// Create a `MalformedInput` error.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            line,
            message: message.into(),
        }
    }

    /// Create a `DimensionMismatch` error.
    pub fn dimension_mismatch(
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        Self::DimensionMismatch { op, left, right }
    }

    /// Create an `InvalidParameter` error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}
