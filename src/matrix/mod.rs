/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Dense matrix helpers
//!
//! Matrices are plain `ndarray::Array2<f64>` values in standard (row-major) layout.
//! This module covers construction, the packed LU split used by the inverter, and
//! the checks the tests and the `--verify` path rely on.

#![allow(clippy::needless_range_loop)]

pub mod display;
pub mod errors;

pub use display::{pretty, Pretty};
pub use errors::{LinalgError, Result};

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Upper bound (exclusive) of generated matrix entries
pub const RANDOM_SCALE: f64 = 10.0;

/// Return the dimension of a non-empty square matrix
pub fn ensure_square(matrix: &Array2<f64>) -> Result<usize> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Err(LinalgError::Empty);
    }
    Ok(rows)
}

/// n×n matrix of zeros
pub fn zeros(n: usize) -> Array2<f64> {
    Array2::zeros((n, n))
}

/// n×n identity matrix
pub fn identity(n: usize) -> Array2<f64> {
    Array2::eye(n)
}

/// Standard basis vector `e_index` of length `n`
pub fn unit_vector(n: usize, index: usize) -> Array1<f64> {
    let mut e = Array1::zeros(n);
    e[index] = 1.0;
    e
}

/// n×n matrix with entries drawn uniformly from `[0, RANDOM_SCALE)`
pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |_| rng.gen::<f64>() * RANDOM_SCALE)
}

/// Random matrix from a fixed seed, or from OS entropy when no seed is given
pub fn seeded_random(n: usize, seed: Option<u64>) -> Array2<f64> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    random(n, &mut rng)
}

/// Dense product `a · b`
pub fn multiply(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let (m, inner) = a.dim();
    let (b_rows, p) = b.dim();
    if inner != b_rows {
        return Err(LinalgError::DimensionMismatch(format!(
            "cannot multiply {}x{} by {}x{}",
            m, inner, b_rows, p
        )));
    }

    Ok(a.dot(b))
}

/// Owned transpose
pub fn transpose(matrix: &Array2<f64>) -> Array2<f64> {
    matrix.t().to_owned()
}

/// Split a packed LU matrix into a unit-diagonal L and an upper-triangular U
pub fn extract_lu(packed: &Array2<f64>) -> Result<(Array2<f64>, Array2<f64>)> {
    let n = ensure_square(packed)?;
    let mut l = zeros(n);
    let mut u = zeros(n);

    for i in 0..n {
        for j in 0..n {
            if i > j {
                l[[i, j]] = packed[[i, j]];
            } else {
                if i == j {
                    l[[i, j]] = 1.0;
                }
                u[[i, j]] = packed[[i, j]];
            }
        }
    }

    Ok((l, u))
}

/// Rebuild `L · U` from a packed factorization
pub fn reconstruct(packed: &Array2<f64>) -> Result<Array2<f64>> {
    let (l, u) = extract_lu(packed)?;
    multiply(&l, &u)
}

/// Largest absolute elementwise difference
///
/// Any non-finite difference makes the result NaN, so corrupted matrices never
/// compare as close.
pub fn max_abs_diff(a: &Array2<f64>, b: &Array2<f64>) -> Result<f64> {
    if a.dim() != b.dim() {
        return Err(LinalgError::DimensionMismatch(format!(
            "cannot compare {:?} with {:?}",
            a.dim(),
            b.dim()
        )));
    }

    Ok(a.iter().zip(b.iter()).fold(0.0_f64, |acc, (x, y)| {
        let diff = (x - y).abs();
        if !diff.is_finite() || acc.is_nan() {
            f64::NAN
        } else {
            acc.max(diff)
        }
    }))
}
