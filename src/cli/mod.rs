/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Command Line Interface (CLI) module
//!
//! Argument model for the `parlu` binary and rendering of the root report.

use crate::inverse::InverseLayout;
use crate::matrix::pretty;
use crate::pipeline::{DimensionSource, RankReport, RunConfig};
use clap::Parser;
use std::path::PathBuf;

/// Invert a random dense matrix with a row-cyclic parallel LU factorization
#[derive(Debug, Parser)]
#[command(name = "parlu", version, about)]
pub struct Cli {
    /// Matrix dimension; prompted for on stdin when omitted
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Number of ranks
    #[arg(short, long)]
    pub processes: Option<usize>,

    /// Seed for the generated matrix
    #[arg(long)]
    pub seed: Option<u64>,

    /// Orientation of the result
    #[arg(long, value_enum)]
    pub layout: Option<InverseLayout>,

    /// Fail on zero pivots instead of propagating non-finite values
    #[arg(long)]
    pub check_pivots: bool,

    /// Report max |A·A⁻¹ - I| after the timed stages
    #[arg(long)]
    pub verify: bool,

    /// Print the input, the packed factors and the result
    #[arg(long)]
    pub print: bool,

    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merge the configuration file (if any) with the command-line flags
    pub fn run_config(&self) -> crate::pipeline::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(processes) = self.processes {
            config.processes = processes;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        config.check_pivots |= self.check_pivots;
        config.verify |= self.verify;
        config.print |= self.print;

        Ok(config)
    }

    pub fn dimension_source(&self) -> DimensionSource {
        match self.size {
            Some(n) => DimensionSource::Fixed(n),
            None => DimensionSource::Stdin,
        }
    }
}

/// Human-readable report for the root rank
pub fn render_report(report: &RankReport, print: bool) -> String {
    let mut out = String::new();

    if print {
        let sections = [
            ("Input", &report.input),
            ("Packed LU", &report.factorized),
            ("Result", &report.inverse),
        ];
        for (title, matrix) in sections {
            if let Some(matrix) = matrix {
                out.push_str(&format!("{}:\n{}", title, pretty(matrix)));
            }
        }
    }

    if let Some(residual) = report.residual {
        out.push_str(&format!("Residual: {:e}\n", residual));
    }
    out.push_str(&format!("Time: {}\n", report.elapsed_ms));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "parlu",
            "-n",
            "5",
            "-p",
            "3",
            "--layout",
            "inverse",
            "--verify",
        ]);
        let config = cli.run_config().unwrap();

        assert_eq!(config.processes, 3);
        assert_eq!(config.layout, InverseLayout::Inverse);
        assert!(config.verify);
        assert!(!config.check_pivots);
        assert_eq!(cli.dimension_source(), DimensionSource::Fixed(5));
    }

    #[test]
    fn test_missing_size_prompts() {
        let cli = Cli::parse_from(["parlu"]);
        assert_eq!(cli.dimension_source(), DimensionSource::Stdin);
    }

    #[test]
    fn test_render_report() {
        let report = RankReport {
            rank: 0,
            size: 1,
            dimension: 1,
            elapsed_ms: 12,
            layout: InverseLayout::Transposed,
            input: Some(array![[2.0]]),
            factorized: Some(array![[2.0]]),
            inverse: Some(array![[0.5]]),
            residual: Some(0.0),
        };

        let quiet = render_report(&report, false);
        assert_eq!(quiet, "Residual: 0e0\nTime: 12\n");

        let loud = render_report(&report, true);
        assert!(loud.starts_with("Input:\n---------\n|  2.000|\n"));
        assert!(loud.contains("Result:\n---------\n|  0.500|\n"));
        assert!(loud.ends_with("Time: 12\n"));
    }
}
