/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for dense matrix operations

use crate::comm::CommError;
use thiserror::Error;

/// Result type for linear algebra operations
pub type Result<T> = std::result::Result<T, LinalgError>;

/// Errors raised by the factorizer, the inverter and the matrix helpers
#[derive(Error, Debug)]
pub enum LinalgError {
    /// The operation requires a square matrix
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// The operation requires at least one row
    #[error("Matrix is empty")]
    Empty,

    /// Operand shapes are incompatible
    #[error("Matrix dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A pivot was zero, subnormal or non-finite
    #[error("Singular pivot {value:e} at row {row}")]
    SingularPivot { row: usize, value: f64 },

    /// The message-passing layer failed
    #[error("Communication error: {0}")]
    Comm(#[from] CommError),
}
