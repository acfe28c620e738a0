/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Framed text rendering of dense matrices

use ndarray::Array2;
use std::fmt;

/// Display adapter that renders a matrix as a framed table
///
/// Each cell uses a fixed `{:7.3}` width, so columns line up for values below
/// one thousand in magnitude.
#[derive(Debug, Clone, Copy)]
pub struct Pretty<'a>(pub &'a Array2<f64>);

/// Wrap a matrix for printing
pub fn pretty(matrix: &Array2<f64>) -> Pretty<'_> {
    Pretty(matrix)
}

impl Pretty<'_> {
    fn rule(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "---------".repeat(self.0.nrows()))
    }
}

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.rule(f)?;

        for row in self.0.rows() {
            write!(f, "|")?;
            for (j, value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{:7.3}", value)?;
            }
            writeln!(f, "|")?;
        }

        self.rule(f)
    }
}
