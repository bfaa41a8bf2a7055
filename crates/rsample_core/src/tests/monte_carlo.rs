//! Monte-Carlo cross-validation, validation splits and initial splits

use std::sync::Arc;

use super::{assert_partition, numeric_frame, rng};
use crate::config::{ResampleBuilder, StrataConfig};
use crate::data::Frame;
use crate::engine::initial_split;
use crate::model::{Assessment, SplitKind};

#[test]
fn test_resamples_keep_floor_of_prop() {
    let data = numeric_frame(50);
    let resamples = ResampleBuilder::monte_carlo(0.75, 8)
        .build(data, &mut rng(10))
        .unwrap();

    assert_eq!(resamples.len(), 8);
    assert_eq!(resamples.ids()[0], "Resample1");
    assert_eq!(resamples.ids()[7], "Resample8");
    for (split, _) in &resamples {
        assert_partition(split);
        // floor(50 * 0.75)
        assert_eq!(split.in_id().len(), 37);
        assert_eq!(split.out_id().len(), 13);
    }
}

#[test]
fn test_resamples_differ_from_each_other() {
    let data = numeric_frame(100);
    let resamples = ResampleBuilder::monte_carlo(0.5, 2)
        .build(data, &mut rng(11))
        .unwrap();
    assert_ne!(resamples.splits()[0].in_id(), resamples.splits()[1].in_id());
}

#[test]
fn test_out_prop_subsamples_assessment() {
    let data = numeric_frame(40);
    let resamples = ResampleBuilder::monte_carlo(0.5, 5)
        .out_prop(0.5)
        .build(data, &mut rng(12))
        .unwrap();

    for (split, _) in &resamples {
        assert!(matches!(split.assessment_form(), Assessment::Explicit(_)));
        let out = split.out_id();
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(|row| !split.in_id().contains(row)));
    }
}

#[test]
fn test_prop_out_of_range_rejected() {
    let data = numeric_frame(10);
    for prop in [0.0, 1.0, -0.5, f64::NAN] {
        let err = ResampleBuilder::monte_carlo(prop, 3)
            .build(Arc::clone(&data), &mut rng(13))
            .unwrap_err();
        assert_eq!(err.param(), Some("prop"));
    }
}

#[test]
fn test_prop_leaving_empty_analysis_rejected() {
    let data = numeric_frame(3);
    let err = ResampleBuilder::monte_carlo(0.1, 3)
        .build(data, &mut rng(14))
        .unwrap_err();
    assert_eq!(err.param(), Some("prop"));
    assert!(err.to_string().contains("analysis"));
}

#[test]
fn test_validation_split_sizes() {
    let data = numeric_frame(32);
    let set = ResampleBuilder::validation(0.75)
        .build(data, &mut rng(15))
        .unwrap();

    assert_eq!(set.len(), 1);
    assert_eq!(set.ids(), &["Validation".to_string()]);
    let split = &set.splits()[0];
    assert_eq!(split.kind(), SplitKind::Validation);
    assert_eq!(split.in_id().len(), 24);
    assert_eq!(split.out_id().len(), 8);
    assert_partition(split);
}

#[test]
fn test_initial_split_stratified() {
    let labels: Vec<&str> = (0..60).map(|i| if i < 40 { "a" } else { "b" }).collect();
    let data = Arc::new(Frame::new().with_categorical("y", labels).unwrap());
    let strata = StrataConfig::new("y");

    let split = initial_split(Arc::clone(&data), 0.5, Some(&strata), None, &mut rng(16)).unwrap();
    assert_partition(&split);
    let in_a = split.in_id().iter().filter(|&&row| row < 40).count();
    assert_eq!(in_a, 20);
    assert_eq!(split.in_id().len(), 30);
}

#[test]
fn test_out_prop_out_of_range_rejected() {
    let data = numeric_frame(10);
    let err = ResampleBuilder::monte_carlo(0.5, 2)
        .out_prop(1.5)
        .build(data, &mut rng(17))
        .unwrap_err();
    assert_eq!(err.param(), Some("out_prop"));
}
