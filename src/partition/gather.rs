/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Collect owned rows on the coordinating rank

use super::RowCyclic;
use crate::comm::{Communicator, ROOT};
use crate::matrix::{LinalgError, Result};
use ndarray::{Array2, ArrayView1};

/// Send every row this rank owns to the root, tagged by row index
///
/// On the root, each row owned by another rank is overwritten with the received
/// copy. Rows the root owns are left untouched, and non-root matrices are not
/// modified.
pub fn gather_rows<C: Communicator>(matrix: &mut Array2<f64>, comm: &mut C) -> Result<()> {
    let (n, cols) = matrix.dim();
    let layout = RowCyclic::of(comm)?;

    if !comm.is_root() {
        for row in layout.rows(n) {
            let data = matrix.row(row).to_vec();
            comm.send(&data, ROOT, row)?;
        }
        return Ok(());
    }

    for row in (0..n).filter(|&row| !layout.owns(row)) {
        let source = layout.owner(row);
        let data: Vec<f64> = comm.receive(source, row)?;
        if data.len() != cols {
            return Err(LinalgError::DimensionMismatch(format!(
                "row {} from rank {} has {} entries, expected {}",
                row,
                source,
                data.len(),
                cols
            )));
        }
        matrix.row_mut(row).assign(&ArrayView1::from(&data[..]));
    }

    log::trace!("rank {} gathered {} rows", comm.rank(), n);
    Ok(())
}
