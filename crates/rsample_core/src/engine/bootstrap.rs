use std::sync::Arc;

use rand::Rng;

use super::{APPARENT_ID, Generated, Layout, apparent_split, split_buffers};
use crate::data::Table;
use crate::error::{ResampleError, Result};
use crate::model::{Assessment, RSplit, SplitKind, numbered_id};
use crate::sampler::sample_indices;

/// Draw `times` bootstrap samples, each as large as the data.
///
/// Every stratum is resampled with replacement to its own size, so stratum
/// proportions carry over exactly. The assessment set is the out-of-bag rows
/// and may be empty.
pub(super) fn bootstraps<D: Table, R: Rng + ?Sized>(
    data: &Arc<D>,
    layout: &Layout,
    times: usize,
    apparent: bool,
    rng: &mut R,
) -> Result<Generated<D>> {
    if times == 0 {
        return Err(ResampleError::invalid("times", "must be at least 1"));
    }

    let kind = layout.kind(SplitKind::Bootstrap);
    let total = times.checked_add(usize::from(apparent)).ok_or_else(|| {
        ResampleError::invalid("times", "leaves no room for the apparent split")
    })?;
    let (mut splits, mut ids) = split_buffers(total);

    for i in 0..times {
        let mut drawn = Vec::with_capacity(layout.unit_count());
        for stratum in layout.strata() {
            let picked = sample_indices(stratum.len(), stratum.len(), true, rng)?;
            drawn.extend(picked.into_iter().map(|pos| stratum[pos]));
        }

        splits.push(RSplit::new(
            Arc::clone(data),
            layout.rows_in_order(&drawn),
            Assessment::Complement,
            kind,
        )?);
        ids.push(numbered_id("Bootstrap", i + 1, times));
    }

    if apparent {
        splits.push(apparent_split(data)?);
        ids.push(APPARENT_ID.to_string());
    }

    Ok((splits, ids))
}
