//! Resampling configuration
//!
//! `Policy` names the partitioning strategy and its parameters. `StrataConfig`
//! and `GroupConfig` optionally layer stratification and grouping on top.
//! All three are plain serde types so plans can be stored alongside results.
//!
//! # Builder DSL
//!
//! ```ignore
//! use rsample_core::config::ResampleBuilder;
//!
//! let folds = ResampleBuilder::vfold(5)
//!     .repeats(2)
//!     .strata("price")
//!     .build(data.clone(), &mut rng)?;
//!
//! let boots = ResampleBuilder::bootstraps(100)
//!     .group("patient")
//!     .build(data, &mut rng)?;
//! ```

use serde::{Deserialize, Serialize};

pub mod builder;

pub use builder::ResampleBuilder;

fn default_repeats() -> usize {
    1
}

fn default_prop() -> f64 {
    0.75
}

fn default_times() -> usize {
    25
}

fn default_initial() -> usize {
    5
}

fn default_one() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_breaks() -> usize {
    4
}

fn default_pool() -> f64 {
    0.1
}

fn default_depth() -> usize {
    20
}

fn default_nunique() -> usize {
    5
}

/// Partitioning strategy and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Policy {
    /// V-fold cross-validation, optionally repeated
    #[serde(rename = "vfold")]
    VFold {
        /// Number of folds; defaults to 10, or to the number of groups when grouped
        #[serde(default)]
        v: Option<usize>,
        #[serde(default = "default_repeats")]
        repeats: usize,
    },
    /// Repeated random train/test splits
    MonteCarlo {
        #[serde(default = "default_prop")]
        prop: f64,
        #[serde(default = "default_times")]
        times: usize,
        /// Fraction of the held-out units kept as assessment; all of them when unset
        #[serde(default)]
        out_prop: Option<f64>,
    },
    /// Bootstrap resamples with out-of-bag assessment
    Bootstrap {
        #[serde(default = "default_times")]
        times: usize,
        /// Append an apparent split after the resamples
        #[serde(default)]
        apparent: bool,
    },
    LeaveOneOut,
    /// A single random train/validation split
    Validation {
        #[serde(default = "default_prop")]
        prop: f64,
    },
    /// Time-ordered sliding or expanding windows
    RollingOrigin {
        #[serde(default = "default_initial")]
        initial: usize,
        #[serde(default = "default_one")]
        assess: usize,
        #[serde(default = "default_true")]
        cumulative: bool,
        #[serde(default)]
        skip: usize,
        #[serde(default)]
        lag: usize,
    },
    /// Analysis and assessment are both the full data
    Apparent,
}

impl Policy {
    pub fn vfold(v: usize) -> Self {
        Policy::VFold {
            v: Some(v),
            repeats: default_repeats(),
        }
    }

    pub fn monte_carlo(prop: f64, times: usize) -> Self {
        Policy::MonteCarlo {
            prop,
            times,
            out_prop: None,
        }
    }

    pub fn bootstraps(times: usize) -> Self {
        Policy::Bootstrap {
            times,
            apparent: false,
        }
    }

    pub fn validation(prop: f64) -> Self {
        Policy::Validation { prop }
    }

    pub fn rolling_origin(initial: usize, assess: usize) -> Self {
        Policy::RollingOrigin {
            initial,
            assess,
            cumulative: true,
            skip: 0,
            lag: 0,
        }
    }

    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Policy::VFold { .. } => "v-fold cross-validation",
            Policy::MonteCarlo { .. } => "Monte-Carlo cross-validation",
            Policy::Bootstrap { .. } => "bootstrap resampling",
            Policy::LeaveOneOut => "leave-one-out cross-validation",
            Policy::Validation { .. } => "validation split",
            Policy::RollingOrigin { .. } => "rolling origin resampling",
            Policy::Apparent => "apparent resampling",
        }
    }

    /// Whether units may be bucketed by a strata column
    pub fn supports_strata(&self) -> bool {
        match self {
            Policy::VFold { .. }
            | Policy::MonteCarlo { .. }
            | Policy::Bootstrap { .. }
            | Policy::Validation { .. } => true,
            Policy::LeaveOneOut | Policy::RollingOrigin { .. } | Policy::Apparent => false,
        }
    }

    /// Whether units may be whole groups of rows
    pub fn supports_groups(&self) -> bool {
        self.supports_strata()
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::VFold {
            v: None,
            repeats: default_repeats(),
        }
    }
}

/// Stratification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrataConfig {
    /// Column used to build strata
    pub column: String,
    /// Number of quantile bins for numeric columns
    #[serde(default = "default_breaks")]
    pub breaks: usize,
    /// Levels rarer than this fraction of rows are pooled
    #[serde(default = "default_pool")]
    pub pool: f64,
    /// Minimum rows per numeric bin before `breaks` is reduced
    #[serde(default = "default_depth")]
    pub depth: usize,
    /// Numeric columns with at most this many distinct values are treated as categorical
    #[serde(default = "default_nunique")]
    pub nunique: usize,
}

impl StrataConfig {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            breaks: default_breaks(),
            pool: default_pool(),
            depth: default_depth(),
            nunique: default_nunique(),
        }
    }

    #[must_use]
    pub fn breaks(mut self, breaks: usize) -> Self {
        self.breaks = breaks;
        self
    }

    #[must_use]
    pub fn pool(mut self, pool: f64) -> Self {
        self.pool = pool;
        self
    }

    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn nunique(mut self, nunique: usize) -> Self {
        self.nunique = nunique;
        self
    }
}

/// How grouped v-fold assignment balances folds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBalance {
    /// Equal number of groups per fold
    #[default]
    Groups,
    /// Roughly equal number of rows per fold
    Observations,
}

/// Grouping settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Column whose distinct values define the groups
    pub column: String,
    #[serde(default)]
    pub balance: GroupBalance,
}

impl GroupConfig {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            balance: GroupBalance::default(),
        }
    }
}

/// Parameters a resample set was generated with, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampleAttributes {
    pub policy: Policy,
    #[serde(default)]
    pub strata: Option<StrataConfig>,
    #[serde(default)]
    pub group: Option<GroupConfig>,
}
