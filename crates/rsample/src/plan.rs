//! Resampling plan files
//!
//! ```yaml
//! data: housing.yaml
//! seed: 2024
//! policy:
//!   type: vfold
//!   v: 10
//!   repeats: 2
//! strata:
//!   column: price
//!   breaks: 5
//! ```
//!
//! Instead of `policy`, a plan may ask for one `initial_split` or
//! `time_split`.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, bail};
use rsample_core::{GroupConfig, Policy, ResampleAttributes, StrataConfig};
use serde::{Deserialize, Serialize};

fn default_split_prop() -> f64 {
    0.75
}

/// Single random split of the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialSplitPlan {
    #[serde(default = "default_split_prop")]
    pub prop: f64,
}

/// Single split that keeps row order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSplitPlan {
    #[serde(default = "default_split_prop")]
    pub prop: f64,
    #[serde(default)]
    pub lag: usize,
}

/// Contents of a plan file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    /// Dataset path, relative to the plan file
    #[serde(default)]
    pub data: Option<PathBuf>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub policy: Option<Policy>,
    #[serde(default)]
    pub strata: Option<StrataConfig>,
    #[serde(default)]
    pub group: Option<GroupConfig>,
    #[serde(default)]
    pub initial_split: Option<InitialSplitPlan>,
    #[serde(default)]
    pub time_split: Option<TimeSplitPlan>,
}

/// What a plan asks the engine to produce
#[derive(Debug, Clone, PartialEq)]
pub enum PlanMode {
    Resample(ResampleAttributes),
    InitialSplit {
        prop: f64,
        strata: Option<StrataConfig>,
        group: Option<GroupConfig>,
    },
    TimeSplit {
        prop: f64,
        lag: usize,
    },
}

impl PlanFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Load a plan and resolve its dataset path against the plan's directory
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read plan {}", path.display()))?;
        let mut plan = Self::from_yaml(&content)
            .wrap_err_with(|| format!("failed to parse plan {}", path.display()))?;

        plan.data = plan.data.take().map(|data| match path.parent() {
            Some(parent) if data.is_relative() => parent.join(data),
            _ => data,
        });
        Ok(plan)
    }

    /// Decide the mode; at most one of `policy`, `initial_split` and
    /// `time_split` may be present, and none means default v-fold.
    pub fn mode(&self) -> color_eyre::Result<PlanMode> {
        let requested = usize::from(self.policy.is_some())
            + usize::from(self.initial_split.is_some())
            + usize::from(self.time_split.is_some());
        if requested > 1 {
            bail!("a plan may set only one of `policy`, `initial_split` or `time_split`");
        }

        if let Some(split) = &self.initial_split {
            return Ok(PlanMode::InitialSplit {
                prop: split.prop,
                strata: self.strata.clone(),
                group: self.group.clone(),
            });
        }
        if let Some(split) = &self.time_split {
            if self.strata.is_some() || self.group.is_some() {
                bail!("`time_split` keeps row order and takes no `strata` or `group`");
            }
            return Ok(PlanMode::TimeSplit {
                prop: split.prop,
                lag: split.lag,
            });
        }

        Ok(PlanMode::Resample(ResampleAttributes {
            policy: self.policy.clone().unwrap_or_default(),
            strata: self.strata.clone(),
            group: self.group.clone(),
        }))
    }
}
