//! Grouping rows by a key column
//!
//! Rows that share a key form one group, and a group is always assigned as a
//! whole to either the analysis or the assessment side of a split.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::data::ColumnRef;
use crate::error::{ResampleError, Result};

/// Row to group assignment, plus the inverse mapping
#[derive(Debug, Clone, PartialEq)]
pub struct Groups {
    ids: Vec<usize>,
    members: Vec<Vec<usize>>,
    keys: Vec<String>,
}

impl Groups {
    /// Group id for every row
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Rows of group `group`, ascending
    pub fn members(&self, group: usize) -> &[usize] {
        &self.members[group]
    }

    /// Display form of each group's key
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn nrow(&self) -> usize {
        self.ids.len()
    }
}

/// Group rows by equal key values.
///
/// Group ids follow the order in which keys first appear. Numeric keys compare
/// by value with `-0.0 == 0.0` and all NaNs treated as one key.
pub fn make_groups(column: ColumnRef<'_>) -> Result<Groups> {
    let groups = match column {
        ColumnRef::Numeric(values) => assign(
            values.iter().map(|&v| numeric_key(v)),
            |bits| f64::from_bits(bits).to_string(),
        ),
        ColumnRef::Categorical(values) => {
            assign(values.iter().map(String::as_str), |key| key.to_string())
        }
    };

    if groups.count() < 2 {
        return Err(ResampleError::invalid(
            "group",
            format!(
                "must have more than one distinct value (found {}); use the ungrouped strategy instead",
                groups.count()
            ),
        ));
    }
    Ok(groups)
}

fn numeric_key(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0.0_f64.to_bits()
    } else {
        value.to_bits()
    }
}

fn assign<K, I, F>(keys: I, display: F) -> Groups
where
    K: Hash + Eq + Copy,
    I: Iterator<Item = K>,
    F: Fn(K) -> String,
{
    let mut index: FxHashMap<K, usize> = FxHashMap::default();
    let mut ids = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    let mut labels = Vec::new();

    for (row, key) in keys.enumerate() {
        let group = *index.entry(key).or_insert_with(|| {
            members.push(Vec::new());
            labels.push(display(key));
            members.len() - 1
        });
        members[group].push(row);
        ids.push(group);
    }

    Groups {
        ids,
        members,
        keys: labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_in_first_appearance_order() {
        let keys: Vec<String> = ["b", "a", "b", "c", "a"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let groups = make_groups(ColumnRef::Categorical(&keys)).unwrap();
        assert_eq!(groups.ids(), &[0, 1, 0, 2, 1]);
        assert_eq!(groups.keys(), &["b", "a", "c"]);
        assert_eq!(groups.members(0), &[0, 2]);
        assert_eq!(groups.members(1), &[1, 4]);
        assert_eq!(groups.nrow(), 5);
    }

    #[test]
    fn test_numeric_keys_normalize_zero_and_nan() {
        let keys = vec![0.0, -0.0, f64::NAN, f64::NAN, 1.5];
        let groups = make_groups(ColumnRef::Numeric(&keys)).unwrap();
        assert_eq!(groups.count(), 3);
        assert_eq!(groups.ids(), &[0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_single_group_rejected() {
        let keys = vec!["same".to_string(); 4];
        let err = make_groups(ColumnRef::Categorical(&keys)).unwrap_err();
        assert_eq!(err.param(), Some("group"));
    }
}
