/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! End-to-end tests for the per-rank driver

use approx::assert_abs_diff_eq;
use parlu_rs::comm::{CollectiveCall, LocalWorld};
use parlu_rs::inverse::InverseLayout;
use parlu_rs::matrix::{reconstruct, transpose};
use parlu_rs::pipeline::{run_local, run_rank, DimensionSource, PipelineError, RunConfig};
use parlu_rs::ParLu;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

fn config(processes: usize) -> RunConfig {
    RunConfig {
        processes,
        seed: Some(2024),
        verify: true,
        ..RunConfig::default()
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(4)]
fn test_run_local_verifies(#[case] processes: usize) {
    let report = run_local(&DimensionSource::Fixed(6), &config(processes)).unwrap();

    assert_eq!(report.rank, 0);
    assert_eq!(report.size, processes);
    assert_eq!(report.dimension, 6);
    assert!(report.residual.unwrap() < 1e-6);

    let input = report.input.unwrap();
    let rebuilt = reconstruct(&report.factorized.unwrap()).unwrap();
    assert_abs_diff_eq!(rebuilt, input, epsilon = 1e-8);
}

#[test]
fn test_same_seed_same_result_across_process_counts() {
    let serial = run_local(&DimensionSource::Fixed(7), &config(1)).unwrap();
    let parallel = run_local(&DimensionSource::Fixed(7), &config(3)).unwrap();

    assert_eq!(serial.input, parallel.input);
    assert_abs_diff_eq!(
        serial.inverse.unwrap(),
        parallel.inverse.unwrap(),
        epsilon = 1e-10
    );
}

#[test]
fn test_inverse_layout_report() {
    let transposed = run_local(&DimensionSource::Fixed(5), &config(2)).unwrap();
    let corrected = run_local(
        &DimensionSource::Fixed(5),
        &RunConfig {
            layout: InverseLayout::Inverse,
            ..config(2)
        },
    )
    .unwrap();

    assert_eq!(corrected.layout, InverseLayout::Inverse);
    assert!(corrected.residual.unwrap() < 1e-6);
    assert_abs_diff_eq!(
        transpose(&transposed.inverse.unwrap()),
        corrected.inverse.unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_text_dimension_is_parsed() {
    let report = ParLu::with_config(config(2))
        .run(&DimensionSource::Text("3\n".to_string()))
        .unwrap();
    assert_eq!(report.dimension, 3);
}

#[rstest]
#[case(DimensionSource::Fixed(0))]
#[case(DimensionSource::Text("-3".to_string()))]
#[case(DimensionSource::Text("abc".to_string()))]
fn test_invalid_dimension_rejected_on_every_rank(#[case] source: DimensionSource) {
    let results = LocalWorld::run(3, |comm| run_rank(comm, &source, &config(3))).unwrap();

    for result in results {
        assert!(matches!(result, Err(PipelineError::InvalidDimension(_))));
    }
}

#[test]
fn test_collective_sequence_is_identical_on_every_rank() {
    let n = 5;
    let size = 3;
    let traces = LocalWorld::run(size, |comm| {
        run_rank(comm, &DimensionSource::Fixed(n), &config(size)).unwrap();
        comm.trace().to_vec()
    })
    .unwrap();

    let mut expected = vec![
        CollectiveCall::Barrier,
        CollectiveCall::Broadcast { root: 0, len: 1 },
    ];
    expected.extend((0..n).map(|_| CollectiveCall::Broadcast { root: 0, len: n }));
    expected.extend((0..n).map(|i| CollectiveCall::Broadcast {
        root: i % size,
        len: n,
    }));

    for trace in traces {
        assert_eq!(trace, expected);
    }
}

#[test]
fn test_config_file_round_trip() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"processes": 2, "seed": 9, "layout": "inverse", "check_pivots": true}}"#
    )
    .unwrap();

    let config = RunConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.processes, 2);
    assert_eq!(config.seed, Some(9));
    assert_eq!(config.layout, InverseLayout::Inverse);
    assert!(config.check_pivots);
    assert!(!config.verify);
}

#[test]
fn test_malformed_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "processes = 2").unwrap();

    assert!(matches!(
        RunConfig::from_json_file(file.path()),
        Err(PipelineError::Config(_))
    ));
}

#[test]
fn test_zero_processes_rejected() {
    assert!(matches!(
        run_local(&DimensionSource::Fixed(3), &config(0)),
        Err(PipelineError::Comm(_))
    ));
}
