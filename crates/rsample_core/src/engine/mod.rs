//! Split generation
//!
//! Every strategy works over *units*: single rows, or whole groups when a
//! group column is configured. Units are optionally bucketed into strata,
//! each stratum is partitioned independently, and the per-stratum results are
//! concatenated.

mod bootstrap;
mod monte_carlo;
mod time;
mod vfold;

use std::sync::Arc;

use rand::Rng;

pub use monte_carlo::initial_split;
pub use time::initial_time_split;

use crate::config::{GroupConfig, Policy, StrataConfig};
use crate::data::Table;
use crate::error::{ResampleError, Result};
use crate::groups::{Groups, make_groups};
use crate::model::{Assessment, RSplit, SplitKind, numbered_id};
use crate::strata::make_strata;

/// Splits and their ids, ready to be assembled into a set
pub(crate) type Generated<D> = (Vec<RSplit<D>>, Vec<String>);

/// Most split slots reserved up front; larger plans grow as they fill
const PREALLOCATED_SPLITS: usize = 4096;

/// Empty split and id buffers sized for `total` splits
fn split_buffers<D>(total: usize) -> Generated<D> {
    let capacity = total.min(PREALLOCATED_SPLITS);
    (Vec::with_capacity(capacity), Vec::with_capacity(capacity))
}

/// Sampling units of one dataset, optionally bucketed by stratum
#[derive(Debug)]
pub(crate) struct Layout {
    nrow: usize,
    groups: Option<Groups>,
    /// Unit ids of each stratum, ascending
    strata: Vec<Vec<usize>>,
}

impl Layout {
    /// Resolve strata and group columns against `data`.
    pub(crate) fn resolve<D: Table>(
        data: &D,
        strata: Option<&StrataConfig>,
        group: Option<&GroupConfig>,
    ) -> Result<Self> {
        let nrow = data.nrow();
        if nrow == 0 {
            return Err(ResampleError::invalid("data", "has no rows"));
        }

        let groups = match group {
            Some(config) => {
                let column = data.column(&config.column).ok_or_else(|| {
                    ResampleError::invalid(
                        "group",
                        format!("column '{}' does not exist in the data", config.column),
                    )
                })?;
                Some(make_groups(column)?)
            }
            None => None,
        };
        let unit_count = groups.as_ref().map_or(nrow, Groups::count);

        let strata = match strata {
            Some(config) => {
                let column = data.column(&config.column).ok_or_else(|| {
                    ResampleError::invalid(
                        "strata",
                        format!("column '{}' does not exist in the data", config.column),
                    )
                })?;
                let row_strata = make_strata(column, config)?;
                let unit_strata = match &groups {
                    Some(groups) => group_strata(groups, row_strata.ids())?,
                    None => row_strata.ids().to_vec(),
                };
                let mut buckets = vec![Vec::new(); row_strata.count()];
                for (unit, &stratum) in unit_strata.iter().enumerate() {
                    buckets[stratum].push(unit);
                }
                if buckets.iter().any(Vec::is_empty) {
                    return Err(ResampleError::internal("stratum left empty after assignment"));
                }
                buckets
            }
            None => vec![(0..unit_count).collect()],
        };

        Ok(Self {
            nrow,
            groups,
            strata,
        })
    }

    pub(crate) fn unit_count(&self) -> usize {
        self.groups.as_ref().map_or(self.nrow, Groups::count)
    }

    pub(crate) fn is_grouped(&self) -> bool {
        self.groups.is_some()
    }

    pub(crate) fn unit_noun(&self) -> &'static str {
        if self.is_grouped() { "groups" } else { "rows" }
    }

    pub(crate) fn strata(&self) -> &[Vec<usize>] {
        &self.strata
    }

    pub(crate) fn unit_size(&self, unit: usize) -> usize {
        self.groups.as_ref().map_or(1, |groups| groups.members(unit).len())
    }

    /// Kind for a split over these units
    pub(crate) fn kind(&self, ungrouped: SplitKind) -> SplitKind {
        match (ungrouped, self.groups.is_some()) {
            (SplitKind::Plain, true) => SplitKind::Grouped,
            (kind, _) => kind,
        }
    }

    /// Rows covered by the selected units, ascending and distinct
    pub(crate) fn rows_of(&self, selected: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut mask = vec![false; self.nrow];
        for unit in selected {
            match &self.groups {
                Some(groups) => {
                    for &row in groups.members(unit) {
                        mask[row] = true;
                    }
                }
                None => mask[unit] = true,
            }
        }
        mask.iter()
            .enumerate()
            .filter_map(|(row, &hit)| hit.then_some(row))
            .collect()
    }

    /// Rows of the units in draw order, repeating rows of repeated units
    pub(crate) fn rows_in_order(&self, drawn: &[usize]) -> Vec<usize> {
        match &self.groups {
            Some(groups) => drawn
                .iter()
                .flat_map(|&unit| groups.members(unit).iter().copied())
                .collect(),
            None => drawn.to_vec(),
        }
    }
}

/// Stratum of each group; a group must not straddle strata
fn group_strata(groups: &Groups, row_strata: &[usize]) -> Result<Vec<usize>> {
    (0..groups.count())
        .map(|group| {
            let members = groups.members(group);
            let stratum = row_strata[members[0]];
            if members.iter().any(|&row| row_strata[row] != stratum) {
                return Err(ResampleError::invalid(
                    "strata",
                    format!(
                        "must be constant within each group, but group '{}' spans several strata",
                        groups.keys()[group]
                    ),
                ));
            }
            Ok(stratum)
        })
        .collect()
}

/// Generate the splits for `policy`.
///
/// All parameters are validated before the first draw from `rng`.
pub(crate) fn generate<D: Table, R: Rng + ?Sized>(
    policy: &Policy,
    data: &Arc<D>,
    strata: Option<&StrataConfig>,
    group: Option<&GroupConfig>,
    rng: &mut R,
) -> Result<Generated<D>> {
    tracing::debug!(
        policy = policy.name(),
        rows = data.nrow(),
        strata = strata.map(|s| s.column.as_str()),
        group = group.map(|g| g.column.as_str()),
        "generating resamples"
    );

    match policy {
        Policy::VFold { v, repeats } => {
            let layout = Layout::resolve(data.as_ref(), strata, group)?;
            let balance = group.map(|g| g.balance).unwrap_or_default();
            vfold::vfold(data, &layout, *v, *repeats, balance, rng)
        }
        Policy::MonteCarlo {
            prop,
            times,
            out_prop,
        } => {
            let layout = Layout::resolve(data.as_ref(), strata, group)?;
            monte_carlo::monte_carlo(data, &layout, *prop, *times, *out_prop, rng)
        }
        Policy::Bootstrap { times, apparent } => {
            let layout = Layout::resolve(data.as_ref(), strata, group)?;
            bootstrap::bootstraps(data, &layout, *times, *apparent, rng)
        }
        Policy::LeaveOneOut => leave_one_out(data),
        Policy::Validation { prop } => {
            let layout = Layout::resolve(data.as_ref(), strata, group)?;
            monte_carlo::validation(data, &layout, *prop, rng)
        }
        Policy::RollingOrigin {
            initial,
            assess,
            cumulative,
            skip,
            lag,
        } => time::rolling_origin(data, *initial, *assess, *cumulative, *skip, *lag),
        Policy::Apparent => {
            let split = apparent_split(data)?;
            Ok((vec![split], vec![APPARENT_ID.to_string()]))
        }
    }
}

pub(crate) const APPARENT_ID: &str = "Apparent";

/// Analysis and assessment both cover every row
pub(crate) fn apparent_split<D: Table>(data: &Arc<D>) -> Result<RSplit<D>> {
    let nrow = data.nrow();
    if nrow == 0 {
        return Err(ResampleError::invalid("data", "has no rows"));
    }
    RSplit::new(
        Arc::clone(data),
        (0..nrow).collect(),
        Assessment::SameAsAnalysis,
        SplitKind::Apparent,
    )
}

fn leave_one_out<D: Table>(data: &Arc<D>) -> Result<Generated<D>> {
    let nrow = data.nrow();
    if nrow < 2 {
        return Err(ResampleError::invalid(
            "data",
            format!("needs at least 2 rows for leave-one-out (got {nrow})"),
        ));
    }

    let (mut splits, mut ids) = split_buffers(nrow);
    for held_out in 0..nrow {
        let in_id = (0..nrow).filter(|&row| row != held_out).collect();
        splits.push(RSplit::new(
            Arc::clone(data),
            in_id,
            Assessment::Complement,
            SplitKind::Plain,
        )?);
        ids.push(numbered_id("Resample", held_out + 1, nrow));
    }
    Ok((splits, ids))
}
