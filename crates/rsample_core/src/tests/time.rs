//! Rolling origin and ordered time splits

use super::{numeric_frame, rng};
use crate::config::ResampleBuilder;
use crate::data::Column;
use crate::engine::initial_time_split;
use crate::model::SplitKind;

#[test]
fn test_time_split_keeps_order() {
    let data = numeric_frame(200);
    let split = initial_time_split(data, 0.75, 0).unwrap();

    assert_eq!(split.kind(), SplitKind::Time);
    assert_eq!(split.in_id(), (0..150).collect::<Vec<_>>().as_slice());
    assert_eq!(split.out_id().as_ref(), (150..200).collect::<Vec<_>>().as_slice());

    let Some(Column::Numeric(train)) = split.analysis().column("x") else {
        panic!("expected numeric column");
    };
    assert_eq!(train.first(), Some(&0.0));
    assert_eq!(train.last(), Some(&149.0));
}

#[test]
fn test_time_split_rejects_lag_past_training() {
    let data = numeric_frame(10);
    let err = initial_time_split(data, 0.3, 4).unwrap_err();
    assert_eq!(err.param(), Some("lag"));
}

#[test]
fn test_slice_count_matches_formula() {
    for (n, initial, assess, skip) in [(20, 5, 1, 0), (20, 5, 3, 2), (37, 10, 4, 3), (9, 8, 1, 0)] {
        let data = numeric_frame(n);
        let slices = ResampleBuilder::rolling_origin(initial, assess)
            .skip(skip)
            .build(data, &mut rng(30))
            .unwrap();
        assert_eq!(slices.len(), (n - initial - assess) / (skip + 1) + 1);
    }
}

#[test]
fn test_windows_are_contiguous_and_precede_assessment() {
    let data = numeric_frame(30);
    let slices = ResampleBuilder::rolling_origin(6, 3)
        .cumulative(false)
        .skip(2)
        .build(data, &mut rng(31))
        .unwrap();

    for (split, _) in &slices {
        let rows = split.in_id();
        assert_eq!(rows.len(), 6);
        assert!(rows.windows(2).all(|w| w[1] == w[0] + 1));
        let out = split.out_id();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], rows[rows.len() - 1] + 1);
    }
}

#[test]
fn test_cumulative_windows_grow_from_first_row() {
    let data = numeric_frame(12);
    let slices = ResampleBuilder::rolling_origin(4, 2)
        .build(data, &mut rng(32))
        .unwrap();

    let lengths: Vec<usize> = slices.splits().iter().map(|s| s.in_id().len()).collect();
    assert_eq!(lengths, vec![4, 5, 6, 7, 8, 9, 10]);
    assert!(slices.splits().iter().all(|s| s.in_id()[0] == 0));
    assert_eq!(slices.ids()[0], "Slice1");
}

#[test]
fn test_window_longer_than_data_rejected() {
    let data = numeric_frame(5);
    let err = ResampleBuilder::rolling_origin(5, 1)
        .build(data, &mut rng(33))
        .unwrap_err();
    assert_eq!(err.param(), Some("initial"));
}

#[test]
fn test_huge_window_rejected_without_overflow() {
    for (initial, assess) in [(usize::MAX, 1), (1, usize::MAX), (usize::MAX, usize::MAX)] {
        let err = ResampleBuilder::rolling_origin(initial, assess)
            .build(numeric_frame(20), &mut rng(34))
            .unwrap_err();
        assert_eq!(err.param(), Some("initial"));
    }
}

#[test]
fn test_huge_skip_leaves_one_slice() {
    let slices = ResampleBuilder::rolling_origin(5, 1)
        .skip(usize::MAX)
        .build(numeric_frame(20), &mut rng(35))
        .unwrap();
    assert_eq!(slices.len(), 1);
    assert_eq!(slices.splits()[0].in_id(), &[0, 1, 2, 3, 4]);
}
