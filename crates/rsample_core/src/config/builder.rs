//! Resample Builder
//!
//! `ResampleBuilder` is the fluent entry point to the engine. It starts from
//! a policy constructor, layers policy options, strata and groups on top and
//! generates an [`RSet`] in one `build` call.
//!
//! # Example
//!
//! ```ignore
//! use rsample_core::config::ResampleBuilder;
//!
//! let folds = ResampleBuilder::vfold(10)
//!     .repeats(3)
//!     .strata("price")
//!     .breaks(5)
//!     .build(data.clone(), &mut rng)?;
//!
//! let slices = ResampleBuilder::rolling_origin(24, 6)
//!     .cumulative(false)
//!     .skip(5)
//!     .build(data, &mut rng)?;
//! ```

use std::sync::Arc;

use rand::Rng;

use super::{GroupBalance, GroupConfig, Policy, ResampleAttributes, StrataConfig};
use crate::data::Table;
use crate::engine;
use crate::error::{ResampleError, Result};
use crate::model::RSet;

/// Fluent builder for resample sets
#[derive(Debug, Clone)]
pub struct ResampleBuilder {
    policy: Policy,
    strata: Option<StrataConfig>,
    group: Option<GroupConfig>,

    // Setters that did not apply, reported by `build`
    misapplied: Vec<(&'static str, String)>,
}

impl ResampleBuilder {
    /// Start from an explicit policy
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            strata: None,
            group: None,
            misapplied: Vec::new(),
        }
    }

    /// Start from stored attributes, e.g. those of an earlier set
    #[must_use]
    pub fn from_attributes(attributes: ResampleAttributes) -> Self {
        Self {
            policy: attributes.policy,
            strata: attributes.strata,
            group: attributes.group,
            misapplied: Vec::new(),
        }
    }

    // =========================================================================
    // Policies
    // =========================================================================

    #[must_use]
    pub fn vfold(v: usize) -> Self {
        Self::new(Policy::vfold(v))
    }

    /// V-fold over the groups of `column`, one fold per group unless `v` is given
    #[must_use]
    pub fn group_vfold(column: impl Into<String>) -> Self {
        Self::new(Policy::default()).group(column)
    }

    #[must_use]
    pub fn monte_carlo(prop: f64, times: usize) -> Self {
        Self::new(Policy::monte_carlo(prop, times))
    }

    #[must_use]
    pub fn bootstraps(times: usize) -> Self {
        Self::new(Policy::bootstraps(times))
    }

    #[must_use]
    pub fn leave_one_out() -> Self {
        Self::new(Policy::LeaveOneOut)
    }

    #[must_use]
    pub fn validation(prop: f64) -> Self {
        Self::new(Policy::validation(prop))
    }

    #[must_use]
    pub fn rolling_origin(initial: usize, assess: usize) -> Self {
        Self::new(Policy::rolling_origin(initial, assess))
    }

    #[must_use]
    pub fn apparent() -> Self {
        Self::new(Policy::Apparent)
    }

    // =========================================================================
    // Policy options
    // =========================================================================

    /// Number of folds for a v-fold policy
    #[must_use]
    pub fn v(mut self, folds: usize) -> Self {
        match &mut self.policy {
            Policy::VFold { v, .. } => *v = Some(folds),
            _ => self.reject_option("v"),
        }
        self
    }

    #[must_use]
    pub fn repeats(mut self, count: usize) -> Self {
        match &mut self.policy {
            Policy::VFold { repeats, .. } => *repeats = count,
            _ => self.reject_option("repeats"),
        }
        self
    }

    #[must_use]
    pub fn out_prop(mut self, fraction: f64) -> Self {
        match &mut self.policy {
            Policy::MonteCarlo { out_prop, .. } => *out_prop = Some(fraction),
            _ => self.reject_option("out_prop"),
        }
        self
    }

    /// Append an apparent split to a bootstrap set
    #[must_use]
    pub fn include_apparent(mut self, include: bool) -> Self {
        match &mut self.policy {
            Policy::Bootstrap { apparent, .. } => *apparent = include,
            _ => self.reject_option("apparent"),
        }
        self
    }

    #[must_use]
    pub fn cumulative(mut self, expanding: bool) -> Self {
        match &mut self.policy {
            Policy::RollingOrigin { cumulative, .. } => *cumulative = expanding,
            _ => self.reject_option("cumulative"),
        }
        self
    }

    #[must_use]
    pub fn skip(mut self, rows: usize) -> Self {
        match &mut self.policy {
            Policy::RollingOrigin { skip, .. } => *skip = rows,
            _ => self.reject_option("skip"),
        }
        self
    }

    #[must_use]
    pub fn lag(mut self, rows: usize) -> Self {
        match &mut self.policy {
            Policy::RollingOrigin { lag, .. } => *lag = rows,
            _ => self.reject_option("lag"),
        }
        self
    }

    // =========================================================================
    // Strata
    // =========================================================================

    /// Stratify units by `column` with default binning
    #[must_use]
    pub fn strata(self, column: impl Into<String>) -> Self {
        self.strata_config(StrataConfig::new(column))
    }

    #[must_use]
    pub fn strata_config(mut self, config: StrataConfig) -> Self {
        self.strata = Some(config);
        self
    }

    #[must_use]
    pub fn breaks(mut self, breaks: usize) -> Self {
        match &mut self.strata {
            Some(config) => config.breaks = breaks,
            None => self.reject_strata_option("breaks"),
        }
        self
    }

    #[must_use]
    pub fn pool(mut self, pool: f64) -> Self {
        match &mut self.strata {
            Some(config) => config.pool = pool,
            None => self.reject_strata_option("pool"),
        }
        self
    }

    #[must_use]
    pub fn depth(mut self, depth: usize) -> Self {
        match &mut self.strata {
            Some(config) => config.depth = depth,
            None => self.reject_strata_option("depth"),
        }
        self
    }

    #[must_use]
    pub fn nunique(mut self, nunique: usize) -> Self {
        match &mut self.strata {
            Some(config) => config.nunique = nunique,
            None => self.reject_strata_option("nunique"),
        }
        self
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Keep all rows sharing a value of `column` on the same side of every split
    #[must_use]
    pub fn group(mut self, column: impl Into<String>) -> Self {
        let balance = self.group.as_ref().map(|g| g.balance).unwrap_or_default();
        self.group = Some(GroupConfig {
            column: column.into(),
            balance,
        });
        self
    }

    #[must_use]
    pub fn balance(mut self, balance: GroupBalance) -> Self {
        match &mut self.group {
            Some(config) => config.balance = balance,
            None => self.misapplied.push((
                "balance",
                "requires a group column; call `group` first".to_string(),
            )),
        }
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Parameters the set will be generated with
    pub fn attributes(&self) -> ResampleAttributes {
        ResampleAttributes {
            policy: self.policy.clone(),
            strata: self.strata.clone(),
            group: self.group.clone(),
        }
    }

    /// Generate the resample set over `data`.
    ///
    /// Every option is validated before the first draw from `rng`, so a
    /// rejected plan leaves the generator untouched.
    pub fn build<D: Table, R: Rng + ?Sized>(&self, data: Arc<D>, rng: &mut R) -> Result<RSet<D>> {
        self.validate()?;

        let (splits, ids) = engine::generate(
            &self.policy,
            &data,
            self.strata.as_ref(),
            self.group.as_ref(),
            rng,
        )?;
        tracing::debug!(policy = self.policy.name(), splits = splits.len(), "built resample set");

        RSet::new(data, splits, ids, self.attributes())
    }

    fn validate(&self) -> Result<()> {
        if let Some((param, message)) = self.misapplied.first() {
            return Err(ResampleError::invalid(*param, message.clone()));
        }
        if self.strata.is_some() && !self.policy.supports_strata() {
            return Err(ResampleError::invalid(
                "strata",
                format!("is not supported by {}", self.policy.name()),
            ));
        }
        if let Some(group) = &self.group {
            if !self.policy.supports_groups() {
                return Err(ResampleError::invalid(
                    "group",
                    format!("is not supported by {}", self.policy.name()),
                ));
            }
            if group.balance == GroupBalance::Observations
                && !matches!(self.policy, Policy::VFold { .. })
            {
                return Err(ResampleError::invalid(
                    "balance",
                    format!(
                        "`observations` only applies to v-fold cross-validation, not {}",
                        self.policy.name()
                    ),
                ));
            }
        }
        Ok(())
    }

    fn reject_option(&mut self, param: &'static str) {
        self.misapplied.push((
            param,
            format!("does not apply to {}", self.policy.name()),
        ));
    }

    fn reject_strata_option(&mut self, param: &'static str) {
        self.misapplied.push((
            param,
            "requires a strata column; call `strata` first".to_string(),
        ));
    }
}
