/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Configuration for a pipeline run

use super::errors::Result;
use crate::inverse::InverseLayout;
use crate::lu::FactorizeOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::thread;

/// Settings shared by every rank of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of ranks
    pub processes: usize,
    /// Seed for the generated matrix; entropy when absent
    pub seed: Option<u64>,
    /// Orientation of the returned inverse
    pub layout: InverseLayout,
    /// Stop on zero or subnormal pivots instead of propagating non-finite values
    pub check_pivots: bool,
    /// Compute `max |A·A⁻¹ - I|` on the root after the timed stages
    pub verify: bool,
    /// Print the input, the factors and the result on the root
    pub print: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            processes: thread::available_parallelism().map_or(1, |n| n.get()),
            seed: None,
            layout: InverseLayout::default(),
            check_pivots: false,
            verify: false,
            print: false,
        }
    }
}

impl RunConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn factorize_options(&self) -> FactorizeOptions {
        FactorizeOptions {
            check_pivots: self.check_pivots,
        }
    }

    /// Whether the root needs to keep a copy of the input matrix
    pub fn keeps_input(&self) -> bool {
        self.verify || self.print
    }
}
