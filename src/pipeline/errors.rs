/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Error types for the driver pipeline

use crate::comm::CommError;
use crate::matrix::LinalgError;
use std::io;
use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that end a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The requested matrix dimension was not a positive integer
    #[error("Invalid matrix dimension: {0}")]
    InvalidDimension(String),

    /// Factorization or inversion failed
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] LinalgError),

    /// A communication call failed outside the numeric stages
    #[error("Communication error: {0}")]
    Comm(#[from] CommError),

    /// Reading the dimension or a configuration file failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A configuration file could not be decoded
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
