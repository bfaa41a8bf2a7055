use std::sync::Arc;

use super::Generated;
use crate::data::Table;
use crate::error::{ResampleError, Result};
use crate::model::{Assessment, RSplit, SplitKind, numbered_id};

/// Windows that slide forward through the rows in their stored order.
///
/// Each slice trains on `initial` rows (or everything so far when
/// `cumulative`) and assesses the `assess` rows right after, reaching back
/// `lag` rows into the training window.
pub(super) fn rolling_origin<D: Table>(
    data: &Arc<D>,
    initial: usize,
    assess: usize,
    cumulative: bool,
    skip: usize,
    lag: usize,
) -> Result<Generated<D>> {
    let nrow = data.nrow();
    if initial == 0 {
        return Err(ResampleError::invalid("initial", "must be at least 1"));
    }
    if assess == 0 {
        return Err(ResampleError::invalid("assess", "must be at least 1"));
    }
    if assess > nrow || initial > nrow - assess {
        return Err(ResampleError::invalid(
            "initial",
            format!(
                "plus assess must not exceed the number of rows ({initial} + {assess} > {nrow})"
            ),
        ));
    }
    if lag > initial {
        return Err(ResampleError::invalid(
            "lag",
            format!("must be less than or equal to initial ({lag} > {initial})"),
        ));
    }

    let ends: Vec<usize> = (initial - 1..=nrow - assess - 1)
        .step_by(skip.saturating_add(1))
        .collect();
    tracing::debug!(slices = ends.len(), initial, assess, skip, lag, "rolling origin");

    let mut splits = Vec::with_capacity(ends.len());
    let mut ids = Vec::with_capacity(ends.len());
    for (i, &end) in ends.iter().enumerate() {
        let start = if cumulative { 0 } else { end + 1 - initial };
        splits.push(RSplit::new(
            Arc::clone(data),
            (start..=end).collect(),
            Assessment::Explicit((end + 1 - lag..=end + assess).collect()),
            SplitKind::Time,
        )?);
        ids.push(numbered_id("Slice", i + 1, ends.len()));
    }

    Ok((splits, ids))
}

/// Split rows in their stored order: the first `prop` of them train, the
/// rest assess.
///
/// With `lag > 0` the assessment set also takes the last `lag` training rows,
/// so lagged predictors can be computed for its first rows.
pub fn initial_time_split<D: Table>(data: Arc<D>, prop: f64, lag: usize) -> Result<RSplit<D>> {
    if !(prop > 0.0 && prop < 1.0) {
        return Err(ResampleError::invalid(
            "prop",
            format!("must be in (0, 1) (got {prop})"),
        ));
    }

    let nrow = data.nrow();
    let n_train = (nrow as f64 * prop).floor() as usize;
    if n_train == 0 || n_train >= nrow {
        return Err(ResampleError::invalid(
            "prop",
            format!("leaves one side empty ({n_train} of {nrow} rows for analysis)"),
        ));
    }
    if lag > n_train {
        return Err(ResampleError::invalid(
            "lag",
            format!(
                "must be less than or equal to the number of training rows ({lag} > {n_train})"
            ),
        ));
    }

    RSplit::new(
        data,
        (0..n_train).collect(),
        Assessment::Explicit((n_train - lag..nrow).collect()),
        SplitKind::Time,
    )
}
