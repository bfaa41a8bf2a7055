//! Stratification of a single column into a few non-empty strata
//!
//! Numeric columns are cut at sample quantiles, categorical columns keep one
//! stratum per level with rare levels pooled together.

use rustc_hash::FxHashMap;

use crate::config::StrataConfig;
use crate::data::ColumnRef;
use crate::error::{ResampleError, Result};

/// Label used for the stratum that collects rare categorical levels
pub const POOLED_LABEL: &str = "other";

/// Row to stratum assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Strata {
    ids: Vec<usize>,
    labels: Vec<String>,
}

impl Strata {
    /// Stratum id for every row
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Human-readable label per stratum id
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn count(&self) -> usize {
        self.labels.len()
    }

    /// Number of rows in each stratum
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.labels.len()];
        for &id in &self.ids {
            sizes[id] += 1;
        }
        sizes
    }
}

/// Validate the numeric parameters of a strata configuration
pub fn validate_config(config: &StrataConfig) -> Result<()> {
    if config.breaks < 2 {
        return Err(ResampleError::invalid(
            "breaks",
            format!("must be an integer of at least 2 (got {})", config.breaks),
        ));
    }
    if !(0.0..1.0).contains(&config.pool) {
        return Err(ResampleError::invalid(
            "pool",
            format!("must be in [0, 1) (got {})", config.pool),
        ));
    }
    if config.depth == 0 {
        return Err(ResampleError::invalid("depth", "must be at least 1"));
    }
    Ok(())
}

/// Assign each value of `column` to a stratum.
///
/// Fails when the parameters are out of range or fewer than two usable
/// strata remain.
pub fn make_strata(column: ColumnRef<'_>, config: &StrataConfig) -> Result<Strata> {
    validate_config(config)?;
    if column.is_empty() {
        return Err(ResampleError::invalid("strata", "column has no rows"));
    }

    match column {
        ColumnRef::Numeric(values) => numeric_strata(values, config),
        ColumnRef::Categorical(values) => {
            let levels: Vec<&str> = values.iter().map(String::as_str).collect();
            categorical_strata(&levels, config.pool)
        }
    }
}

fn numeric_strata(values: &[f64], config: &StrataConfig) -> Result<Strata> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(ResampleError::invalid(
            "strata",
            "column contains missing (NaN) values",
        ));
    }
    if values.iter().any(|v| v.is_infinite()) {
        return Err(ResampleError::invalid(
            "strata",
            "column contains infinite values",
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut distinct = sorted.clone();
    distinct.dedup_by(|a, b| a.total_cmp(b).is_eq());
    if distinct.len() <= config.nunique {
        // Few distinct values behave like a factor
        let labels: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        let levels: Vec<&str> = labels.iter().map(String::as_str).collect();
        return categorical_strata(&levels, config.pool);
    }

    let n = values.len();
    let mut breaks = config.breaks;
    if n / breaks < config.depth {
        let reduced = (n / config.depth).max(2);
        if reduced < breaks {
            tracing::warn!(
                rows = n,
                requested = breaks,
                used = reduced,
                depth = config.depth,
                "too few rows per stratum, reducing the number of breaks"
            );
            breaks = reduced;
        }
    }

    let mut boundaries: Vec<f64> = (0..=breaks)
        .map(|i| quantile(&sorted, i as f64 / breaks as f64))
        .collect();
    boundaries.dedup();
    if boundaries.len() < 3 {
        return Err(ResampleError::invalid(
            "strata",
            "has fewer than 2 distinct quantile bins",
        ));
    }

    // Right-closed bins with the lowest boundary included
    let interior = &boundaries[1..boundaries.len() - 1];
    let raw: Vec<usize> = values
        .iter()
        .map(|&x| interior.partition_point(|&q| q < x))
        .collect();

    // Collapse empty bins by renumbering the occupied ones densely
    let bin_count = boundaries.len() - 1;
    let mut occupied = vec![false; bin_count];
    for &bin in &raw {
        occupied[bin] = true;
    }
    let mut remap = vec![usize::MAX; bin_count];
    let mut labels = Vec::new();
    for bin in 0..bin_count {
        if occupied[bin] {
            remap[bin] = labels.len();
            let open = if bin == 0 { '[' } else { '(' };
            labels.push(format!(
                "{open}{}, {}]",
                boundaries[bin],
                boundaries[bin + 1]
            ));
        }
    }

    if labels.len() < 2 {
        return Err(ResampleError::invalid(
            "strata",
            "has fewer than 2 non-empty quantile bins",
        ));
    }

    Ok(Strata {
        ids: raw.into_iter().map(|bin| remap[bin]).collect(),
        labels,
    })
}

/// Linear-interpolation sample quantile of an ascending slice
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

fn categorical_strata(levels: &[&str], pool: f64) -> Result<Strata> {
    let n = levels.len();
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for &level in levels {
        *counts.entry(level).or_insert(0) += 1;
    }

    // Ascending count, then ascending label: decides pooling order
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    let is_rare = |count: usize| (count as f64 / n as f64) < pool;
    let (rare, mut kept): (Vec<_>, Vec<_>) =
        ranked.into_iter().partition(|&(_, count)| is_rare(count));

    let pooled_count: usize = rare.iter().map(|&(_, count)| count).sum();
    let mut absorbed_by: Option<&str> = None;
    if !rare.is_empty() {
        tracing::warn!(
            pooled_levels = rare.len(),
            pooled_rows = pooled_count,
            pool,
            "pooling rare strata levels"
        );
        if is_rare(pooled_count)
            && let Some(smallest) = kept.first_mut()
        {
            smallest.1 += pooled_count;
            absorbed_by = Some(smallest.0);
        }
    }

    // Final ids: descending count, then ascending label, pooled stratum last
    kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let mut stratum_of: FxHashMap<&str, usize> = FxHashMap::default();
    let mut labels: Vec<String> = Vec::with_capacity(kept.len() + 1);
    for &(level, _) in &kept {
        stratum_of.insert(level, labels.len());
        labels.push(level.to_string());
    }

    let pooled_id = match absorbed_by {
        Some(level) => stratum_of[level],
        None => {
            if !rare.is_empty() {
                labels.push(POOLED_LABEL.to_string());
            }
            labels.len().saturating_sub(1)
        }
    };
    for &(level, _) in &rare {
        stratum_of.insert(level, pooled_id);
    }

    if labels.len() < 2 {
        return Err(ResampleError::invalid(
            "strata",
            format!("has fewer than 2 usable levels after pooling (pool = {pool})"),
        ));
    }

    Ok(Strata {
        ids: levels.iter().map(|level| stratum_of[level]).collect(),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> StrataConfig {
        StrataConfig::new("y")
    }

    fn categorical(counts: &[(&str, usize)]) -> Vec<String> {
        counts
            .iter()
            .flat_map(|&(label, count)| std::iter::repeat_n(label.to_string(), count))
            .collect()
    }

    #[test]
    fn test_numeric_quartiles() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let strata = make_strata(ColumnRef::Numeric(&values), &config()).unwrap();
        assert_eq!(strata.count(), 4);
        assert_eq!(strata.sizes(), vec![25, 25, 25, 25]);
        assert_eq!(strata.ids()[0], 0);
        assert_eq!(strata.ids()[99], 3);
    }

    #[test]
    fn test_numeric_breaks_reduced_by_depth() {
        let values: Vec<f64> = (0..50).map(f64::from).collect();
        let strata = make_strata(ColumnRef::Numeric(&values), &config()).unwrap();
        // 50 rows / depth 20 -> 2 bins
        assert_eq!(strata.count(), 2);
        assert_eq!(strata.sizes().iter().sum::<usize>(), 50);
    }

    #[test]
    fn test_numeric_ties_collapse_bins() {
        // Heavy tie at zero swallows the lower quantiles
        let mut values = vec![0.0; 60];
        values.extend((1..=40).map(f64::from));
        let strata = make_strata(ColumnRef::Numeric(&values), &config()).unwrap();
        assert!(strata.count() >= 2);
        assert!(strata.sizes().iter().all(|&size| size > 0));
        assert!(strata.ids()[..60].iter().all(|&id| id == 0));
    }

    #[test]
    fn test_numeric_few_unique_values_act_as_levels() {
        let values: Vec<f64> = (0..90).map(|i| (i % 3) as f64).collect();
        let strata = make_strata(ColumnRef::Numeric(&values), &config()).unwrap();
        assert_eq!(strata.count(), 3);
        assert_eq!(strata.labels(), &["0", "1", "2"]);
    }

    #[test]
    fn test_numeric_nan_rejected() {
        let values = vec![1.0, f64::NAN, 3.0];
        let err = make_strata(ColumnRef::Numeric(&values), &config()).unwrap_err();
        assert_eq!(err.param(), Some("strata"));
    }

    #[test]
    fn test_numeric_infinite_rejected() {
        let mut values: Vec<f64> = (0..100).map(f64::from).collect();
        values[0] = f64::NEG_INFINITY;
        values[99] = f64::INFINITY;
        let err = make_strata(ColumnRef::Numeric(&values), &config()).unwrap_err();
        assert_eq!(err.param(), Some("strata"));
        assert!(err.to_string().contains("infinite"));
    }

    #[test]
    fn test_constant_column_rejected() {
        let values = vec![2.5; 40];
        assert!(make_strata(ColumnRef::Numeric(&values), &config()).is_err());
        let levels = categorical(&[("a", 40)]);
        assert!(make_strata(ColumnRef::Categorical(&levels), &config()).is_err());
    }

    #[test]
    fn test_categorical_levels_ordered_by_frequency() {
        let levels = categorical(&[("b", 30), ("a", 30), ("c", 40)]);
        let strata = make_strata(ColumnRef::Categorical(&levels), &config()).unwrap();
        assert_eq!(strata.labels(), &["c", "a", "b"]);
        assert_eq!(strata.sizes(), vec![40, 30, 30]);
    }

    #[test]
    fn test_categorical_rare_levels_pooled() {
        let levels = categorical(&[("a", 45), ("b", 40), ("c", 8), ("d", 7)]);
        let strata = make_strata(ColumnRef::Categorical(&levels), &config()).unwrap();
        assert_eq!(strata.labels(), &["a", "b", POOLED_LABEL]);
        assert_eq!(strata.sizes(), vec![45, 40, 15]);
    }

    #[test]
    fn test_small_pool_absorbed_by_smallest_level() {
        let levels = categorical(&[("a", 60), ("b", 35), ("z", 5)]);
        let strata = make_strata(ColumnRef::Categorical(&levels), &config()).unwrap();
        assert_eq!(strata.labels(), &["a", "b"]);
        assert_eq!(strata.sizes(), vec![60, 40]);
    }

    #[test]
    fn test_pool_zero_keeps_every_level() {
        let levels = categorical(&[("a", 98), ("b", 1), ("c", 1)]);
        let strata =
            make_strata(ColumnRef::Categorical(&levels), &config().pool(0.0)).unwrap();
        assert_eq!(strata.count(), 3);
    }

    #[test]
    fn test_everything_rare_fails() {
        let levels: Vec<String> = (0..20).map(|i| format!("level{i}")).collect();
        let err = make_strata(ColumnRef::Categorical(&levels), &config()).unwrap_err();
        assert_eq!(err.param(), Some("strata"));
    }

    #[test]
    fn test_parameter_ranges() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let column = ColumnRef::Numeric(&values);
        assert_eq!(
            make_strata(column, &config().breaks(1)).unwrap_err().param(),
            Some("breaks")
        );
        assert_eq!(
            make_strata(column, &config().pool(1.0)).unwrap_err().param(),
            Some("pool")
        );
        assert_eq!(
            make_strata(column, &config().pool(-0.1)).unwrap_err().param(),
            Some("pool")
        );
    }

    #[test]
    fn test_quantile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert_eq!(quantile(&sorted, 0.5), 2.5);
        assert_eq!(quantile(&sorted, 1.0), 4.0);
    }
}
