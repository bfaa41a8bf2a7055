//! A single analysis/assessment partition of a shared dataset

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::{Subset, Table};
use crate::error::{ResampleError, Result};

/// Flavor of a split, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitKind {
    Plain,
    Validation,
    /// Row order matters; a lagged assessment set may repeat analysis rows
    Time,
    /// Units are whole groups of rows
    Grouped,
    /// Analysis rows are drawn with replacement
    Bootstrap,
    /// Analysis and assessment are the same rows
    Apparent,
}

impl SplitKind {
    pub fn allows_duplicates(self) -> bool {
        match self {
            SplitKind::Bootstrap => true,
            SplitKind::Plain
            | SplitKind::Validation
            | SplitKind::Time
            | SplitKind::Grouped
            | SplitKind::Apparent => false,
        }
    }

    pub fn allows_overlap(self) -> bool {
        match self {
            SplitKind::Apparent | SplitKind::Time => true,
            SplitKind::Plain
            | SplitKind::Validation
            | SplitKind::Grouped
            | SplitKind::Bootstrap => false,
        }
    }

    pub fn preserves_order(self) -> bool {
        match self {
            SplitKind::Time => true,
            SplitKind::Plain
            | SplitKind::Validation
            | SplitKind::Grouped
            | SplitKind::Bootstrap
            | SplitKind::Apparent => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SplitKind::Plain => "plain",
            SplitKind::Validation => "validation",
            SplitKind::Time => "time",
            SplitKind::Grouped => "grouped",
            SplitKind::Bootstrap => "bootstrap",
            SplitKind::Apparent => "apparent",
        }
    }
}

/// How the assessment rows of a split are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assessment {
    /// Every row of the data not present in the analysis set, derived on access
    Complement,
    /// Stored explicitly
    Explicit(Vec<usize>),
    /// Identical to the analysis set
    SameAsAnalysis,
}

/// One analysis/assessment pair bound to a shared dataset
#[derive(Debug)]
pub struct RSplit<D> {
    data: Arc<D>,
    in_id: Vec<usize>,
    out_id: Assessment,
    kind: SplitKind,
    population: usize,
}

impl<D> Clone for RSplit<D> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            in_id: self.in_id.clone(),
            out_id: self.out_id.clone(),
            kind: self.kind,
            population: self.population,
        }
    }
}

impl<D: Table> RSplit<D> {
    /// Create a split, checking the index invariants for `kind`.
    pub fn new(data: Arc<D>, in_id: Vec<usize>, out_id: Assessment, kind: SplitKind) -> Result<Self> {
        let population = data.nrow();

        let mut in_mask = vec![false; population];
        for &row in &in_id {
            if row >= population {
                return Err(ResampleError::invalid(
                    "in_id",
                    format!("contains row {row} outside the data ({population} rows)"),
                ));
            }
            if in_mask[row] && !kind.allows_duplicates() {
                return Err(ResampleError::invalid(
                    "in_id",
                    format!("contains row {row} more than once in a {} split", kind.label()),
                ));
            }
            in_mask[row] = true;
        }

        match &out_id {
            Assessment::Complement => {}
            Assessment::SameAsAnalysis => {
                if kind != SplitKind::Apparent {
                    return Err(ResampleError::invalid(
                        "out_id",
                        format!("may only equal the analysis set for an apparent split, not {}", kind.label()),
                    ));
                }
            }
            Assessment::Explicit(rows) => {
                let mut out_mask = vec![false; population];
                for &row in rows {
                    if row >= population {
                        return Err(ResampleError::invalid(
                            "out_id",
                            format!("contains row {row} outside the data ({population} rows)"),
                        ));
                    }
                    if out_mask[row] {
                        return Err(ResampleError::invalid(
                            "out_id",
                            format!("contains row {row} more than once"),
                        ));
                    }
                    if in_mask[row] && !kind.allows_overlap() {
                        return Err(ResampleError::invalid(
                            "out_id",
                            format!("row {row} is in both the analysis and assessment sets"),
                        ));
                    }
                    out_mask[row] = true;
                }
            }
        }

        Ok(Self {
            data,
            in_id,
            out_id,
            kind,
            population,
        })
    }

    /// Rows of the analysis set as a lazy view
    pub fn analysis(&self) -> Subset<'_, D> {
        Subset::new(self.data.as_ref(), Cow::Borrowed(self.in_id.as_slice()))
    }

    /// Rows of the assessment set as a lazy view
    pub fn assessment(&self) -> Subset<'_, D> {
        Subset::new(self.data.as_ref(), self.out_id())
    }
}

impl<D> RSplit<D> {
    pub fn data(&self) -> &Arc<D> {
        &self.data
    }

    pub fn kind(&self) -> SplitKind {
        self.kind
    }

    /// Analysis row indices
    pub fn in_id(&self) -> &[usize] {
        &self.in_id
    }

    /// Assessment row indices.
    ///
    /// A complement is recomputed on every call and comes back ascending.
    pub fn out_id(&self) -> Cow<'_, [usize]> {
        match &self.out_id {
            Assessment::Complement => Cow::Owned(complement(&self.in_id, self.population)),
            Assessment::Explicit(rows) => Cow::Borrowed(rows),
            Assessment::SameAsAnalysis => Cow::Borrowed(&self.in_id),
        }
    }

    /// Stored form of the assessment set
    pub fn assessment_form(&self) -> &Assessment {
        &self.out_id
    }

    /// Row count of the data when the split was made
    pub fn population(&self) -> usize {
        self.population
    }
}

/// Rows of `0..population` absent from `rows`, ascending
fn complement(rows: &[usize], population: usize) -> Vec<usize> {
    let mut taken = vec![false; population];
    for &row in rows {
        taken[row] = true;
    }
    taken
        .iter()
        .enumerate()
        .filter_map(|(row, &is_taken)| (!is_taken).then_some(row))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Frame;

    fn frame(rows: usize) -> Arc<Frame> {
        Arc::new(
            Frame::new()
                .with_numeric("x", (0..rows).map(|i| i as f64).collect())
                .unwrap(),
        )
    }

    #[test]
    fn test_complement_is_derived_on_access() {
        let split = RSplit::new(frame(6), vec![4, 0, 2], Assessment::Complement, SplitKind::Plain)
            .unwrap();
        assert_eq!(split.out_id().as_ref(), &[1, 3, 5]);
        assert_eq!(split.assessment_form(), &Assessment::Complement);
        assert_eq!(split.analysis().len(), 3);
        assert_eq!(split.assessment().rows(), &[1, 3, 5]);
    }

    #[test]
    fn test_bootstrap_allows_duplicates_and_empty_oob() {
        let split = RSplit::new(
            frame(3),
            vec![0, 1, 2, 2],
            Assessment::Complement,
            SplitKind::Bootstrap,
        )
        .unwrap();
        assert!(split.out_id().is_empty());
    }

    #[test]
    fn test_duplicates_rejected_for_plain() {
        let err = RSplit::new(frame(3), vec![0, 0], Assessment::Complement, SplitKind::Plain)
            .unwrap_err();
        assert_eq!(err.param(), Some("in_id"));
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(RSplit::new(frame(3), vec![3], Assessment::Complement, SplitKind::Plain).is_err());
        assert!(
            RSplit::new(frame(3), vec![0], Assessment::Explicit(vec![5]), SplitKind::Plain)
                .is_err()
        );
    }

    #[test]
    fn test_overlap_rules_follow_kind() {
        let overlap = || Assessment::Explicit(vec![1, 2]);
        assert!(RSplit::new(frame(4), vec![0, 1], overlap(), SplitKind::Plain).is_err());
        assert!(RSplit::new(frame(4), vec![0, 1], overlap(), SplitKind::Time).is_ok());
    }

    #[test]
    fn test_same_as_analysis_only_for_apparent() {
        assert!(
            RSplit::new(frame(2), vec![0, 1], Assessment::SameAsAnalysis, SplitKind::Plain)
                .is_err()
        );
        let apparent = RSplit::new(
            frame(2),
            vec![0, 1],
            Assessment::SameAsAnalysis,
            SplitKind::Apparent,
        )
        .unwrap();
        assert_eq!(apparent.out_id().as_ref(), apparent.in_id());
    }

    #[test]
    fn test_split_shares_data() {
        let data = frame(5);
        let split = RSplit::new(Arc::clone(&data), vec![0], Assessment::Complement, SplitKind::Plain)
            .unwrap();
        assert!(Arc::ptr_eq(split.data(), &data));
        assert_eq!(Arc::strong_count(&data), 2);
    }

    #[test]
    fn test_kind_flags() {
        assert!(SplitKind::Time.preserves_order());
        assert!(!SplitKind::Grouped.preserves_order());
        assert!(SplitKind::Bootstrap.allows_duplicates());
        assert!(!SplitKind::Apparent.allows_duplicates());
    }
}
