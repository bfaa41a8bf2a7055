//! JSON output of a generated plan

use rsample_core::{RSet, RSplit, ResampleAttributes, SplitKind, Table};
use serde::Serialize;

/// One split as written out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitReport {
    pub id: String,
    pub kind: SplitKind,
    pub analysis_size: usize,
    pub assessment_size: usize,
    /// Row indices; omitted in summaries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Vec<usize>>,
}

impl SplitReport {
    pub fn new<D>(id: &str, split: &RSplit<D>, summary: bool) -> Self {
        let assessment = split.out_id();
        Self {
            id: id.to_string(),
            kind: split.kind(),
            analysis_size: split.in_id().len(),
            assessment_size: assessment.len(),
            analysis: (!summary).then(|| split.in_id().to_vec()),
            assessment: (!summary).then(|| assessment.into_owned()),
        }
    }
}

/// Everything needed to reproduce and consume a plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub seed: u64,
    pub rows: usize,
    /// Set-level parameters; absent for single initial or time splits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<ResampleAttributes>,
    pub splits: Vec<SplitReport>,
}

impl Report {
    pub fn from_set<D: Table>(set: &RSet<D>, seed: u64, summary: bool) -> Self {
        Self {
            seed,
            rows: set.data().nrow(),
            attributes: Some(set.attributes().clone()),
            splits: set
                .iter()
                .map(|(split, id)| SplitReport::new(id, split, summary))
                .collect(),
        }
    }

    pub fn from_split<D: Table>(id: &str, split: &RSplit<D>, seed: u64, summary: bool) -> Self {
        Self {
            seed,
            rows: split.population(),
            attributes: None,
            splits: vec![SplitReport::new(id, split, summary)],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
