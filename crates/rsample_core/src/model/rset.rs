//! An ordered, named collection of splits over one dataset

use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::RSplit;
use crate::config::ResampleAttributes;
use crate::error::{ResampleError, Result};

/// Resample set produced by one generation call
#[derive(Debug)]
pub struct RSet<D> {
    data: Arc<D>,
    splits: Vec<RSplit<D>>,
    ids: Vec<String>,
    attributes: ResampleAttributes,
}

impl<D> Clone for RSet<D> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            splits: self.splits.clone(),
            ids: self.ids.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

impl<D> RSet<D> {
    /// Assemble a set. Mismatched lengths, repeated ids, or a split bound to a
    /// different dataset are engine defects and reported as `Internal`.
    pub fn new(
        data: Arc<D>,
        splits: Vec<RSplit<D>>,
        ids: Vec<String>,
        attributes: ResampleAttributes,
    ) -> Result<Self> {
        if splits.len() != ids.len() {
            return Err(ResampleError::internal(format!(
                "{} splits but {} ids",
                splits.len(),
                ids.len()
            )));
        }

        let mut seen = FxHashSet::default();
        if let Some(dup) = ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(ResampleError::internal(format!("duplicate split id '{dup}'")));
        }

        if let Some(position) = splits
            .iter()
            .position(|split| !Arc::ptr_eq(split.data(), &data))
        {
            return Err(ResampleError::internal(format!(
                "split '{}' references a different dataset",
                ids[position]
            )));
        }

        Ok(Self {
            data,
            splits,
            ids,
            attributes,
        })
    }

    pub fn data(&self) -> &Arc<D> {
        &self.data
    }

    pub fn splits(&self) -> &[RSplit<D>] {
        &self.splits
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn attributes(&self) -> &ResampleAttributes {
        &self.attributes
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Look up a split by id
    pub fn get(&self, id: &str) -> Option<&RSplit<D>> {
        self.ids
            .iter()
            .position(|candidate| candidate == id)
            .map(|i| &self.splits[i])
    }

    /// Iterate `(split, id)` pairs in generation order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&RSplit<D>, &str)> {
        self.splits
            .iter()
            .zip(self.ids.iter().map(String::as_str))
    }

    /// Consume the set into its splits, dropping ids and attributes
    pub fn into_splits(self) -> Vec<RSplit<D>> {
        self.splits
    }
}

#[cfg(feature = "parallel")]
impl<D: Send + Sync> RSet<D> {
    /// Parallel iteration over `(split, id)` pairs, for per-split model fitting
    pub fn par_iter(&self) -> impl rayon::iter::IndexedParallelIterator<Item = (&RSplit<D>, &str)> {
        use rayon::prelude::*;

        self.splits
            .par_iter()
            .zip(self.ids.par_iter().map(String::as_str))
    }
}

impl<'a, D> IntoIterator for &'a RSet<D> {
    type Item = (&'a RSplit<D>, &'a str);
    type IntoIter = std::iter::Zip<
        std::slice::Iter<'a, RSplit<D>>,
        std::iter::Map<std::slice::Iter<'a, String>, fn(&String) -> &str>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        let as_str: fn(&String) -> &str = String::as_str;
        self.splits.iter().zip(self.ids.iter().map(as_str))
    }
}

/// Id of the `index`-th (1-based) member of a sequence of `total`, zero-padded to `total`'s width
pub fn numbered_id(prefix: &str, index: usize, total: usize) -> String {
    let width = total.max(1).to_string().len();
    format!("{prefix}{index:0width$}")
}
