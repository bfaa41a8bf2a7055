//! Resampling plan engine
//!
//! This crate generates reproducible resampling plans: collections of
//! analysis/assessment row partitions over one shared dataset. It supports:
//! - V-fold cross-validation, optionally repeated
//! - Monte-Carlo cross-validation and single validation splits
//! - Bootstrap resampling with out-of-bag assessment
//! - Leave-one-out and apparent resampling
//! - Rolling origin and ordered time splits
//! - Stratification on a numeric or categorical column, and grouping
//!
//! Splits only hold row indices; the data sits behind one `Arc` shared by every
//! split in a set. All randomness comes from a caller-supplied generator, so a
//! seeded generator reproduces a plan exactly.
//!
//! # Builder DSL
//!
//! ```ignore
//! use std::sync::Arc;
//! use rand::{SeedableRng, rngs::SmallRng};
//! use rsample_core::{Frame, ResampleBuilder};
//!
//! let data = Arc::new(Frame::new().with_numeric("price", prices)?);
//! let mut rng = SmallRng::seed_from_u64(42);
//!
//! let folds = ResampleBuilder::vfold(10)
//!     .strata("price")
//!     .build(Arc::clone(&data), &mut rng)?;
//! for (split, id) in &folds {
//!     let train = split.analysis().to_frame();
//!     let test = split.assessment().to_frame();
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod data;
pub mod error;
pub mod groups;
pub mod sampler;
pub mod strata;

mod engine;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{
    GroupBalance, GroupConfig, Policy, ResampleAttributes, ResampleBuilder, StrataConfig,
};
pub use data::{Column, ColumnRef, Frame, Subset, Table};
pub use engine::{initial_split, initial_time_split};
pub use error::{ResampleError, Result};
pub use model::{Assessment, RSet, RSplit, SplitKind};
