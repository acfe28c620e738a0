/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Per-rank driver
//!
//! Every rank runs [`run_rank`] with its own communicator:
//!
//! 1. the root obtains the dimension, all ranks meet at a barrier, the root
//!    broadcasts the dimension;
//! 2. the root generates the matrix and broadcasts it row by row;
//! 3. the factorizer and the inverter run under a wall-clock timer;
//! 4. the root assembles a [`RankReport`] with the elapsed time and, on request, the
//!    matrices and a residual check.
//!
//! The collective sequence is identical on every rank, including when the root
//! rejects the dimension: it broadcasts zero and every rank returns the error.

pub mod config;
pub mod errors;

pub use config::RunConfig;
pub use errors::{PipelineError, Result};

use crate::comm::{CommError, Communicator, LocalWorld, ROOT};
use crate::inverse::{invert, InverseLayout};
use crate::lu::factorize;
use crate::matrix::{self, identity, max_abs_diff, multiply, seeded_random, transpose, zeros};
use ndarray::{Array2, ArrayView1};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::time::Instant;

/// Prompt shown on the root when reading the dimension interactively
pub const PROMPT: &str = "Enter matrix size: ";

/// Where the root rank gets the matrix dimension from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionSource {
    /// Dimension already known
    Fixed(usize),
    /// Raw user text, parsed on the root
    Text(String),
    /// Prompt on stdout and read one line from stdin
    Stdin,
}

/// Parse a dimension typed by a user
pub fn parse_dimension(text: &str) -> Result<usize> {
    let trimmed = text.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n)
            .map_err(|_| PipelineError::InvalidDimension(format!("{} is too large", n))),
        Ok(n) => Err(PipelineError::InvalidDimension(format!(
            "{} is not positive",
            n
        ))),
        Err(_) => Err(PipelineError::InvalidDimension(format!(
            "{:?} is not an integer",
            trimmed
        ))),
    }
}

/// Write the prompt to `output` and parse one line from `input`
pub fn read_dimension<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<usize> {
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_dimension(&line)
}

impl DimensionSource {
    fn resolve(&self) -> Result<usize> {
        match self {
            DimensionSource::Fixed(0) => {
                Err(PipelineError::InvalidDimension("0 is not positive".to_string()))
            }
            DimensionSource::Fixed(n) => Ok(*n),
            DimensionSource::Text(text) => parse_dimension(text),
            DimensionSource::Stdin => {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                read_dimension(&mut input, &mut io::stdout())
            }
        }
    }
}

/// Outcome of a run on one rank
///
/// Matrices are only populated on the root; `input` is kept when the run verifies
/// or prints.
#[derive(Debug, Clone, Serialize)]
pub struct RankReport {
    pub rank: usize,
    pub size: usize,
    pub dimension: usize,
    /// Wall-clock time of factorization plus inversion
    pub elapsed_ms: u64,
    pub layout: InverseLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Array2<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factorized: Option<Array2<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<Array2<f64>>,
    /// `max |A·A⁻¹ - I|`, NaN when the factors went non-finite
    #[serde(skip_serializing_if = "Option::is_none")]
    pub residual: Option<f64>,
}

/// Agree on the dimension across all ranks
fn share_dimension<C: Communicator>(comm: &mut C, source: &DimensionSource) -> Result<usize> {
    let mut rejected = None;
    let mut buf = [0u64];

    if comm.is_root() {
        match source.resolve() {
            Ok(n) => buf[0] = n as u64,
            Err(err) => {
                log::error!("rank {} rejected dimension: {}", comm.rank(), err);
                rejected = Some(err);
            }
        }
    }

    comm.barrier()?;
    comm.broadcast(&mut buf, ROOT)?;

    match buf[0] {
        0 => Err(rejected.unwrap_or_else(|| {
            PipelineError::InvalidDimension("rejected by the coordinating rank".to_string())
        })),
        n => Ok(n as usize),
    }
}

/// Replace `matrix` on every rank with the root's copy, one row per broadcast
pub fn broadcast_matrix<C: Communicator>(matrix: &mut Array2<f64>, comm: &mut C) -> Result<()> {
    let mut row = vec![0.0; matrix.ncols()];
    for i in 0..matrix.nrows() {
        for (dst, &src) in row.iter_mut().zip(matrix.row(i).iter()) {
            *dst = src;
        }
        comm.broadcast(&mut row, ROOT)?;
        matrix.row_mut(i).assign(&ArrayView1::from(&row[..]));
    }
    Ok(())
}

/// `max |A·X - I|` where `X` is the inverse in the given layout
pub fn residual(
    input: &Array2<f64>,
    inverse: &Array2<f64>,
    layout: InverseLayout,
) -> matrix::Result<f64> {
    let product = match layout {
        InverseLayout::Inverse => multiply(input, inverse)?,
        InverseLayout::Transposed => multiply(input, &transpose(inverse))?,
    };
    max_abs_diff(&product, &identity(input.nrows()))
}

/// Run the full pipeline on one rank
pub fn run_rank<C: Communicator>(
    comm: &mut C,
    source: &DimensionSource,
    config: &RunConfig,
) -> Result<RankReport> {
    let n = share_dimension(comm, source)?;
    let is_root = comm.is_root();

    let mut a = if is_root {
        seeded_random(n, config.seed)
    } else {
        zeros(n)
    };
    broadcast_matrix(&mut a, comm)?;
    let input = (is_root && config.keeps_input()).then(|| a.clone());

    log::info!("rank {} of {} starting on {}x{} matrix", comm.rank(), comm.size(), n, n);

    let start = Instant::now();
    factorize(&mut a, comm, config.factorize_options())?;
    let inverse = invert(&a, comm, config.layout)?;
    let elapsed = start.elapsed();

    let residual = match (&input, config.verify && is_root) {
        (Some(input), true) => Some(residual(input, &inverse, config.layout)?),
        _ => None,
    };

    Ok(RankReport {
        rank: comm.rank(),
        size: comm.size(),
        dimension: n,
        elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        layout: config.layout,
        input,
        factorized: is_root.then_some(a),
        inverse: is_root.then_some(inverse),
        residual,
    })
}

/// Run the pipeline on `config.processes` in-process ranks and return the root report
pub fn run_local(source: &DimensionSource, config: &RunConfig) -> Result<RankReport> {
    let reports = LocalWorld::run(config.processes, |comm| run_rank(comm, source, config))?;

    let mut root_report = None;
    for report in reports {
        let report = report?;
        if report.rank == ROOT {
            root_report = Some(report);
        }
    }

    root_report.ok_or(PipelineError::Comm(CommError::InvalidSize(config.processes)))
}
