/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Row-cyclic ownership
//!
//! Row `i` belongs to rank `i mod size`. Ownership is recomputed from the index on
//! every query, so the factorizer and the inverter can never disagree about it.

pub mod gather;

pub use gather::gather_rows;

use crate::comm::{CommError, Communicator};
use std::iter::StepBy;
use std::ops::Range;

/// Rank that owns `row` in a world of `size` ranks
///
/// `size` must be non-zero.
pub fn owner(row: usize, size: usize) -> usize {
    row % size
}

/// Row-cyclic view of the rows held by a single rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCyclic {
    rank: usize,
    size: usize,
}

impl RowCyclic {
    /// View for `rank` in a world of `size` ranks
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or `rank >= size`. Use [`RowCyclic::of`] when the
    /// world comes from a communicator.
    pub fn new(rank: usize, size: usize) -> Self {
        assert!(size > 0, "world size must be non-zero");
        assert!(rank < size, "rank {} outside world of {}", rank, size);
        Self { rank, size }
    }

    /// View for the calling rank of a communicator
    pub fn of<C: Communicator>(comm: &C) -> Result<Self, CommError> {
        let (rank, size) = (comm.rank(), comm.size());
        if size == 0 {
            return Err(CommError::InvalidSize(size));
        }
        if rank >= size {
            return Err(CommError::InvalidRank {
                rank,
                peer: rank,
                size,
            });
        }
        Ok(Self::new(rank, size))
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Owner of `row`
    pub fn owner(&self, row: usize) -> usize {
        owner(row, self.size)
    }

    /// Whether this rank owns `row`
    pub fn owns(&self, row: usize) -> bool {
        self.owner(row) == self.rank
    }

    /// Rows of `0..n` owned by this rank, ascending
    pub fn rows(&self, n: usize) -> StepBy<Range<usize>> {
        self.rows_from(0, n)
    }

    /// Rows of `start..n` owned by this rank, ascending
    ///
    /// Starts at the first row `>= start` congruent to `rank` modulo `size`.
    pub fn rows_from(&self, start: usize, n: usize) -> StepBy<Range<usize>> {
        let first = start + (self.rank + self.size - start % self.size) % self.size;
        (first.min(n)..n).step_by(self.size)
    }
}
