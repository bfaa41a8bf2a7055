//! Scenario tests for the resampling engine
//!
//! Tests are organized by topic:
//! - `vfold` - V-fold partitions, repeats and fold balance
//! - `monte_carlo` - Monte-Carlo, validation and initial splits
//! - `bootstrap` - Bootstrap, leave-one-out and apparent resampling
//! - `time` - Rolling origin and ordered time splits
//! - `grouped` - Group leakage and group balancing
//! - `stratified` - Per-stratum balance
//! - `rset` - Set-level behavior: ids, sharing, determinism, rejected options

mod monte_carlo;
mod time;

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::data::Frame;
use crate::model::RSplit;

fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Frame with a numeric `x` column holding `0..rows`
fn numeric_frame(rows: usize) -> Arc<Frame> {
    Arc::new(
        Frame::new()
            .with_numeric("x", (0..rows).map(|i| i as f64).collect())
            .unwrap(),
    )
}

/// Analysis and assessment are disjoint and together cover every row exactly once
fn assert_partition<D>(split: &RSplit<D>) {
    let mut seen = vec![0usize; split.population()];
    for &row in split.in_id() {
        seen[row] += 1;
    }
    for &row in split.out_id().iter() {
        seen[row] += 1;
    }
    assert!(
        seen.iter().all(|&count| count == 1),
        "split is not a partition of the rows"
    );
}
