/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Row-cyclic parallel LU factorization
//!
//! Factorizes a replicated square matrix in place without pivoting. At pivot step `i`
//! the owner of row `i` broadcasts it, then every rank eliminates column `i` from the
//! rows below `i` that it owns. The result is packed: multipliers of the unit-lower L
//! below the diagonal, U on and above it.
//!
//! After the last pivot every rank sends its owned rows to the root, so only the
//! root replica is guaranteed complete. Other ranks hold every pivot row they
//! received plus the rows they computed themselves.

use crate::comm::Communicator;
use crate::matrix::{ensure_square, LinalgError, Result};
use crate::partition::{gather_rows, RowCyclic};
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Factorization options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorizeOptions {
    /// Fail with [`LinalgError::SingularPivot`] instead of producing non-finite values
    ///
    /// The check reads the broadcast pivot row, so every rank stops at the same step.
    pub check_pivots: bool,
}

impl FactorizeOptions {
    pub fn checked() -> Self {
        Self { check_pivots: true }
    }
}

/// Factorize `matrix` in place as packed `L\U`
///
/// Every rank must call this with an identical replica. Without pivot checks, a
/// zero pivot yields infinities or NaNs in the factors rather than an error.
pub fn factorize<C: Communicator>(
    matrix: &mut Array2<f64>,
    comm: &mut C,
    options: FactorizeOptions,
) -> Result<()> {
    let n = ensure_square(matrix)?;
    let layout = RowCyclic::of(comm)?;
    let mut pivot_row = vec![0.0; n];

    for i in 0..n {
        let root = layout.owner(i);
        for (dst, &src) in pivot_row.iter_mut().zip(matrix.row(i).iter()) {
            *dst = src;
        }
        comm.broadcast(&mut pivot_row, root)?;
        matrix.row_mut(i).assign(&ArrayView1::from(&pivot_row[..]));

        let pivot = pivot_row[i];
        if options.check_pivots && !pivot.is_normal() {
            log::warn!("rank {} stopping at singular pivot {} (row {})", layout.rank(), pivot, i);
            return Err(LinalgError::SingularPivot { row: i, value: pivot });
        }

        log::trace!("rank {} eliminating with pivot row {} from rank {}", layout.rank(), i, root);

        for j in layout.rows_from(i + 1, n) {
            let multiplier = matrix[[j, i]] / pivot;
            matrix[[j, i]] = multiplier;
            for k in (i + 1)..n {
                matrix[[j, k]] -= pivot_row[k] * multiplier;
            }
        }
    }

    gather_rows(matrix, comm)?;

    log::debug!("rank {} finished factorizing {}x{} matrix", layout.rank(), n, n);
    Ok(())
}
