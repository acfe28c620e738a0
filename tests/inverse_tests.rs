/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Tests for the triangular-solve inverter

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use parlu_rs::comm::LocalWorld;
use parlu_rs::inverse::{invert, InverseLayout};
use parlu_rs::lu::{factorize, FactorizeOptions};
use parlu_rs::matrix::{identity, multiply, transpose};
use rstest::rstest;

fn create_test_matrix(n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            n as f64 + 1.0
        } else {
            1.0 / (1.0 + i as f64 + 2.0 * j as f64)
        }
    })
}

// Factorize and invert on `size` ranks, returning the root result
fn invert_on(size: usize, input: &Array2<f64>, layout: InverseLayout) -> Array2<f64> {
    LocalWorld::run(size, |comm| {
        let mut a = input.clone();
        factorize(&mut a, comm, FactorizeOptions::default()).unwrap();
        invert(&a, comm, layout).unwrap()
    })
    .unwrap()
    .remove(0)
}

#[test]
fn test_identity_inverts_to_itself() {
    let result = invert_on(2, &identity(3), InverseLayout::Transposed);
    assert_abs_diff_eq!(result, identity(3), epsilon = 1e-15);
}

#[test]
fn test_two_by_two_scenario() {
    let a = array![[4.0, 3.0], [6.0, 3.0]];

    let transposed = invert_on(2, &a, InverseLayout::Transposed);
    assert_abs_diff_eq!(
        transposed,
        array![[-0.5, 1.0], [0.5, -2.0 / 3.0]],
        epsilon = 1e-12
    );

    let inverse = invert_on(2, &a, InverseLayout::Inverse);
    assert_abs_diff_eq!(
        inverse,
        array![[-0.5, 0.5], [1.0, -2.0 / 3.0]],
        epsilon = 1e-12
    );
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(8)]
fn test_inverse_layout_is_true_inverse(#[case] size: usize) {
    let a = create_test_matrix(8);
    let x = invert_on(size, &a, InverseLayout::Inverse);

    assert_abs_diff_eq!(multiply(&a, &x).unwrap(), identity(8), epsilon = 1e-10);
    assert_abs_diff_eq!(multiply(&x, &a).unwrap(), identity(8), epsilon = 1e-10);
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(6)]
fn test_result_independent_of_rank_count(#[case] size: usize) {
    let a = create_test_matrix(11);
    let serial = invert_on(1, &a, InverseLayout::Transposed);
    let parallel = invert_on(size, &a, InverseLayout::Transposed);

    assert_abs_diff_eq!(parallel, serial, epsilon = 1e-12);
}

#[test]
fn test_layouts_are_transposes() {
    let a = create_test_matrix(5);
    let transposed = invert_on(3, &a, InverseLayout::Transposed);
    let inverse = invert_on(3, &a, InverseLayout::Inverse);

    assert_abs_diff_eq!(transpose(&transposed), inverse, epsilon = 1e-15);
}

#[test]
fn test_followers_hold_only_owned_rows() {
    let a = create_test_matrix(5);
    let results = LocalWorld::run(2, |comm| {
        let mut m = a.clone();
        factorize(&mut m, comm, FactorizeOptions::default()).unwrap();
        invert(&m, comm, InverseLayout::Transposed).unwrap()
    })
    .unwrap();

    let follower = &results[1];
    for row in 0..5 {
        let is_zero = follower.row(row).iter().all(|&v| v == 0.0);
        assert_eq!(is_zero, row % 2 == 0, "row {}", row);
        if row % 2 == 1 {
            assert_abs_diff_eq!(follower.row(row), results[0].row(row), epsilon = 1e-15);
        }
    }
}
