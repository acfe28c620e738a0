/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Triangular substitution
//!
//! Pure routines with no communication. The diagonal is always read explicitly, so a
//! unit-lower L must carry its ones. A zero diagonal entry is not reported: it turns
//! into an infinite or NaN component that propagates through the remaining rows.

use crate::matrix::{LinalgError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

fn check_system(matrix: &ArrayView2<f64>, rhs: &ArrayView1<f64>) -> Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    if rhs.len() != rows {
        return Err(LinalgError::DimensionMismatch(format!(
            "right-hand side has {} entries for a {}x{} system",
            rhs.len(),
            rows,
            cols
        )));
    }
    Ok(rows)
}

/// Solve `L · y = b` for lower-triangular `L`
///
/// Entries above the diagonal of `l` are ignored.
pub fn forward_solve(l: ArrayView2<f64>, b: ArrayView1<f64>) -> Result<Array1<f64>> {
    let n = check_system(&l, &b)?;
    let mut y = Array1::zeros(n);

    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    Ok(y)
}

/// Solve `U · x = y` for upper-triangular `U`
///
/// Entries below the diagonal of `u` are ignored.
pub fn backward_solve(u: ArrayView2<f64>, y: ArrayView1<f64>) -> Result<Array1<f64>> {
    let n = check_system(&u, &y)?;
    let mut x = Array1::zeros(n);

    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| u[[i, j]] * x[j]).sum();
        x[i] = (y[i] - sum) / u[[i, i]];
    }

    Ok(x)
}
