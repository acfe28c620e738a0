/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Tests for row-cyclic ownership

use parlu_rs::comm::LocalWorld;
use parlu_rs::partition::{owner, RowCyclic};

#[test]
fn test_every_row_has_exactly_one_owner() {
    for n in 1..=24 {
        for size in 1..=n {
            let mut counts = vec![0usize; n];
            for rank in 0..size {
                for row in RowCyclic::new(rank, size).rows(n) {
                    assert_eq!(owner(row, size), rank);
                    counts[row] += 1;
                }
            }
            assert!(
                counts.iter().all(|&c| c == 1),
                "n={} size={} counts={:?}",
                n,
                size,
                counts
            );
        }
    }
}

#[test]
fn test_rows_from_matches_filter() {
    let n = 17;
    for size in 1..=6 {
        for rank in 0..size {
            let view = RowCyclic::new(rank, size);
            for start in 0..=n + 1 {
                let expected: Vec<usize> = (start..n).filter(|&row| view.owns(row)).collect();
                let actual: Vec<usize> = view.rows_from(start, n).collect();
                assert_eq!(actual, expected, "rank={} size={} start={}", rank, size, start);
            }
        }
    }
}

#[test]
fn test_more_ranks_than_rows() {
    let n = 3;
    let size = 5;
    let owned: usize = (0..size).map(|rank| RowCyclic::new(rank, size).rows(n).count()).sum();
    assert_eq!(owned, n);
    assert_eq!(RowCyclic::new(4, size).rows(n).count(), 0);
}

#[test]
fn test_view_of_communicator() {
    let views = LocalWorld::run(3, |comm| RowCyclic::of(comm).unwrap()).unwrap();

    for (rank, view) in views.iter().enumerate() {
        assert_eq!(view.rank(), rank);
        assert_eq!(view.size(), 3);
        assert_eq!(*view, RowCyclic::new(rank, 3));
    }
}
