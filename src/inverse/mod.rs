/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Inversion from a packed LU factorization
//!
//! Row `i` of the result is `U⁻¹ · L⁻¹ · e_i`, computed by the rank that owns row `i`
//! under the same row-cyclic scheme as the factorizer. Since `U⁻¹ L⁻¹ e_i` is column
//! `i` of the inverse, filling it in as a row produces the transpose of the inverse.
//! [`InverseLayout`] selects whether that transpose is kept or undone.

use crate::comm::Communicator;
use crate::matrix::{ensure_square, extract_lu, transpose, unit_vector, zeros, Result};
use crate::partition::{gather_rows, RowCyclic};
use crate::solve::{backward_solve, forward_solve};
use clap::ValueEnum;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Orientation of the assembled result on the root rank
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InverseLayout {
    /// One solve per row, no final transpose: the result is `(A⁻¹)ᵀ`
    #[default]
    Transposed,
    /// Transposed once on the root after the gather: the result is `A⁻¹`
    Inverse,
}

/// Invert from a packed `L\U` matrix
///
/// `packed` must be identical on every rank. The root returns the full result in the
/// requested layout; other ranks return a matrix where only their owned rows are
/// filled, always in transposed layout.
pub fn invert<C: Communicator>(
    packed: &Array2<f64>,
    comm: &mut C,
    layout: InverseLayout,
) -> Result<Array2<f64>> {
    let n = ensure_square(packed)?;
    let (l, u) = extract_lu(packed)?;
    let rows = RowCyclic::of(comm)?;
    let mut result = zeros(n);

    for i in rows.rows(n) {
        let e = unit_vector(n, i);
        let y = forward_solve(l.view(), e.view())?;
        let x = backward_solve(u.view(), y.view())?;
        result.row_mut(i).assign(&x);
    }
    log::debug!(
        "rank {} solved {} of {} rows",
        rows.rank(),
        rows.rows(n).count(),
        n
    );

    gather_rows(&mut result, comm)?;

    if comm.is_root() && layout == InverseLayout::Inverse {
        result = transpose(&result);
    }
    Ok(result)
}
