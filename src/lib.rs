/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! # parlu-rs
//!
//! Dense matrix inversion by row-cyclic LU factorization across cooperating ranks.
//!
//! Every rank holds a full replica of the matrix. Rows are owned by rank
//! `row mod size`; the factorizer broadcasts each pivot row from its owner and lets
//! each rank eliminate its own rows, and the inverter solves one identity row per
//! owned row. Partial results are gathered on rank 0. Ranks only talk through a
//! [`comm::Communicator`].
//!
//! No pivoting is performed.

pub mod cli;
pub mod comm;
pub mod inverse;
pub mod lu;
pub mod matrix;
pub mod partition;
pub mod pipeline;
pub mod solve;

pub use comm::{Communicator, LocalCommunicator, LocalWorld};
pub use inverse::{invert, InverseLayout};
pub use lu::{factorize, FactorizeOptions};
pub use pipeline::{DimensionSource, RankReport, RunConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

/// Entry point for an in-process distributed inversion
#[derive(Debug, Clone, Default)]
pub struct ParLu {
    config: RunConfig,
}

impl ParLu {
    /// Create an instance with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every rank to completion and return the root's report
    pub fn run(&self, source: &DimensionSource) -> pipeline::Result<RankReport> {
        pipeline::run_local(source, &self.config)
    }
}
