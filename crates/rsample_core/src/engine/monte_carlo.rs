use std::sync::Arc;

use rand::Rng;

use super::{Generated, Layout, split_buffers};
use crate::config::{GroupConfig, StrataConfig};
use crate::data::Table;
use crate::error::{ResampleError, Result};
use crate::model::{Assessment, RSplit, SplitKind, numbered_id};
use crate::sampler::sample_indices;

pub(super) const VALIDATION_ID: &str = "Validation";

pub(super) fn monte_carlo<D: Table, R: Rng + ?Sized>(
    data: &Arc<D>,
    layout: &Layout,
    prop: f64,
    times: usize,
    out_prop: Option<f64>,
    rng: &mut R,
) -> Result<Generated<D>> {
    let retained = retained_per_stratum(layout, prop)?;
    if times == 0 {
        return Err(ResampleError::invalid("times", "must be at least 1"));
    }
    if let Some(out_prop) = out_prop
        && !(out_prop > 0.0 && out_prop <= 1.0)
    {
        return Err(ResampleError::invalid(
            "out_prop",
            format!("must be in (0, 1] (got {out_prop})"),
        ));
    }

    let kind = layout.kind(SplitKind::Plain);
    let (mut splits, mut ids) = split_buffers(times);
    for i in 0..times {
        let analysis = draw_analysis(layout, &retained, rng)?;
        let assessment = match out_prop {
            None => Assessment::Complement,
            Some(out_prop) => {
                let held_out = held_out_units(layout, &analysis);
                let keep = ((held_out.len() as f64 * out_prop).floor() as usize).max(1);
                let picked = sample_indices(held_out.len(), keep, false, rng)?;
                Assessment::Explicit(layout.rows_of(picked.into_iter().map(|pos| held_out[pos])))
            }
        };
        splits.push(RSplit::new(
            Arc::clone(data),
            layout.rows_of(analysis),
            assessment,
            kind,
        )?);
        ids.push(numbered_id("Resample", i + 1, times));
    }

    Ok((splits, ids))
}

pub(super) fn validation<D: Table, R: Rng + ?Sized>(
    data: &Arc<D>,
    layout: &Layout,
    prop: f64,
    rng: &mut R,
) -> Result<Generated<D>> {
    let retained = retained_per_stratum(layout, prop)?;
    let analysis = draw_analysis(layout, &retained, rng)?;
    let split = RSplit::new(
        Arc::clone(data),
        layout.rows_of(analysis),
        Assessment::Complement,
        SplitKind::Validation,
    )?;
    Ok((vec![split], vec![VALIDATION_ID.to_string()]))
}

/// A single random analysis/assessment split.
///
/// `prop` of the units (per stratum, rounded down) go to analysis; the rest
/// form the assessment set.
pub fn initial_split<D: Table, R: Rng + ?Sized>(
    data: Arc<D>,
    prop: f64,
    strata: Option<&StrataConfig>,
    group: Option<&GroupConfig>,
    rng: &mut R,
) -> Result<RSplit<D>> {
    let layout = Layout::resolve(data.as_ref(), strata, group)?;
    let retained = retained_per_stratum(&layout, prop)?;
    let analysis = draw_analysis(&layout, &retained, rng)?;
    let kind = layout.kind(SplitKind::Plain);
    RSplit::new(data, layout.rows_of(analysis), Assessment::Complement, kind)
}

/// Units kept for analysis in each stratum; both sides must end up non-empty
fn retained_per_stratum(layout: &Layout, prop: f64) -> Result<Vec<usize>> {
    if !(prop > 0.0 && prop < 1.0) {
        return Err(ResampleError::invalid(
            "prop",
            format!("must be in (0, 1) (got {prop})"),
        ));
    }

    let retained: Vec<usize> = layout
        .strata()
        .iter()
        .map(|stratum| (stratum.len() as f64 * prop).floor() as usize)
        .collect();
    let total: usize = retained.iter().sum();
    if total == 0 {
        return Err(ResampleError::invalid(
            "prop",
            format!(
                "leaves no {} for analysis (prop = {prop})",
                layout.unit_noun()
            ),
        ));
    }
    if total == layout.unit_count() {
        return Err(ResampleError::invalid(
            "prop",
            format!(
                "leaves no {} for assessment (prop = {prop})",
                layout.unit_noun()
            ),
        ));
    }
    Ok(retained)
}

/// Draw the analysis units, stratum by stratum
fn draw_analysis<R: Rng + ?Sized>(
    layout: &Layout,
    retained: &[usize],
    rng: &mut R,
) -> Result<Vec<usize>> {
    let mut analysis = Vec::with_capacity(retained.iter().sum());
    for (stratum, &keep) in layout.strata().iter().zip(retained) {
        let picked = sample_indices(stratum.len(), keep, false, rng)?;
        analysis.extend(picked.into_iter().map(|pos| stratum[pos]));
    }
    Ok(analysis)
}

fn held_out_units(layout: &Layout, analysis: &[usize]) -> Vec<usize> {
    let mut in_analysis = vec![false; layout.unit_count()];
    for &unit in analysis {
        in_analysis[unit] = true;
    }
    (0..layout.unit_count())
        .filter(|&unit| !in_analysis[unit])
        .collect()
}
