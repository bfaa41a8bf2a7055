use std::cmp::Reverse;
use std::sync::Arc;

use rand::Rng;

use super::{Generated, Layout, split_buffers};
use crate::config::GroupBalance;
use crate::data::Table;
use crate::error::{ResampleError, Result};
use crate::model::{Assessment, RSplit, SplitKind, numbered_id};
use crate::sampler::{permutation, shuffle};

const DEFAULT_FOLDS: usize = 10;

pub(super) fn vfold<D: Table, R: Rng + ?Sized>(
    data: &Arc<D>,
    layout: &Layout,
    v: Option<usize>,
    repeats: usize,
    balance: GroupBalance,
    rng: &mut R,
) -> Result<Generated<D>> {
    let units = layout.unit_count();
    // Grouped v-fold defaults to leave-one-group-out
    let v = v.unwrap_or(if layout.is_grouped() { units } else { DEFAULT_FOLDS });

    if v < 2 {
        return Err(ResampleError::invalid(
            "v",
            format!("must be at least 2 (got {v})"),
        ));
    }
    if v > units {
        return Err(ResampleError::invalid(
            "v",
            format!(
                "must be less than or equal to the number of {} ({v} > {units})",
                layout.unit_noun()
            ),
        ));
    }
    if repeats == 0 {
        return Err(ResampleError::invalid("repeats", "must be at least 1"));
    }
    let total = v.checked_mul(repeats).ok_or_else(|| {
        ResampleError::invalid(
            "repeats",
            format!("gives more than {} splits at v = {v}", usize::MAX),
        )
    })?;

    tracing::debug!(v, repeats, units, ?balance, "assigning folds");

    let kind = layout.kind(SplitKind::Plain);
    let (mut splits, mut ids) = split_buffers(total);

    for repeat in 0..repeats {
        let fold_of = match balance {
            GroupBalance::Observations => assign_by_observations(layout, v, rng),
            GroupBalance::Groups => assign_balanced(layout, v, rng),
        };

        for fold in 0..v {
            let analysis = (0..units).filter(|&unit| fold_of[unit] != fold);
            splits.push(RSplit::new(
                Arc::clone(data),
                layout.rows_of(analysis),
                Assessment::Complement,
                kind,
            )?);

            let fold_id = numbered_id("Fold", fold + 1, v);
            ids.push(if repeats == 1 {
                fold_id
            } else {
                format!("{}.{fold_id}", numbered_id("Repeat", repeat + 1, repeats))
            });
        }
    }

    Ok((splits, ids))
}

/// Fold per unit with per-stratum and overall counts balanced to within one.
///
/// Each stratum takes the next stretch of a cyclic fold sequence, so strata
/// never pile their remainders onto the same folds.
fn assign_balanced<R: Rng + ?Sized>(layout: &Layout, v: usize, rng: &mut R) -> Vec<usize> {
    let fold_order = permutation(v, rng);
    let mut fold_of = vec![0; layout.unit_count()];
    let mut offset = 0;

    for stratum in layout.strata() {
        let mut labels: Vec<usize> = (0..stratum.len())
            .map(|j| fold_order[(offset + j) % v])
            .collect();
        shuffle(&mut labels, rng);
        for (&unit, fold) in stratum.iter().zip(labels) {
            fold_of[unit] = fold;
        }
        offset = (offset + stratum.len()) % v;
    }

    fold_of
}

/// Fold per unit, placing larger groups first into the fold with the fewest rows
fn assign_by_observations<R: Rng + ?Sized>(layout: &Layout, v: usize, rng: &mut R) -> Vec<usize> {
    let mut fold_of = vec![0; layout.unit_count()];
    let mut fold_rows = vec![0usize; v];

    for stratum in layout.strata() {
        let mut order = stratum.clone();
        shuffle(&mut order, rng);
        order.sort_by_key(|&unit| Reverse(layout.unit_size(unit)));

        for unit in order {
            let lightest = fold_rows
                .iter()
                .enumerate()
                .min_by_key(|&(fold, &rows)| (rows, fold))
                .map_or(0, |(fold, _)| fold);
            fold_of[unit] = lightest;
            fold_rows[lightest] += layout.unit_size(unit);
        }
    }

    fold_of
}
