//! Group engine: partitions rows by key tuples and aggregates per group.
//!
//! Groups are ordered by the first occurrence of their key tuple in the
//! source, for any number of key columns. A null key is an ordinary key
//! value, and all NaN keys fall into one group.

mod aggregate;
mod context;

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::BooleanArray;
use arrow::datatypes::Field;
use log::debug;
use rayon::prelude::*;

use crate::config::GroupConfig;
use crate::dataframe::DataFrame;
use crate::error::{FrameError, Result};
use crate::types::{array_from_values, Value, ValueKey};
use crate::vector::Vector;

pub use context::{AggRequest, GroupContext};

/// Rows of a data frame partitioned by key columns.
#[derive(Debug, Clone)]
pub struct Group {
    source: DataFrame,
    keys: Vec<String>,
    /// First source row of each group, in group order.
    first_rows: Vec<u32>,
    /// Row count of each group.
    counts: Vec<usize>,
    /// One boolean mask over the source rows per group.
    masks: Vec<Vector>,
    config: GroupConfig,
}

impl Group {
    /// Groups `source` by `keys` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if the source has no rows or no
    /// columns, `keys` is empty or repeats a key, or a key is not a column of
    /// the source.
    pub fn new<S: AsRef<str>>(source: &DataFrame, keys: &[S]) -> Result<Self> {
        Group::with_config(source, keys, GroupConfig::default())
    }

    /// Groups `source` by `keys`.
    ///
    /// # Errors
    ///
    /// Same as [`Group::new`].
    pub fn with_config<S: AsRef<str>>(
        source: &DataFrame,
        keys: &[S],
        config: GroupConfig,
    ) -> Result<Self> {
        if source.size() == 0 || source.n_keys() == 0 {
            return Err(FrameError::argument("cannot group an empty data frame"));
        }
        if keys.is_empty() {
            return Err(FrameError::argument("group needs at least one key"));
        }
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        if let Some((i, key)) = keys.iter().enumerate().find(|&(i, k)| keys[..i].contains(k)) {
            return Err(FrameError::argument(format!(
                "group key {key} given twice (position {i})"
            )));
        }
        let key_values = keys
            .iter()
            .map(|k| source.v(k)?.to_values())
            .collect::<Result<Vec<Vec<Value>>>>()?;

        let n_rows = source.size();
        let mut slots: HashMap<Vec<ValueKey>, usize> = HashMap::new();
        let mut first_rows = Vec::new();
        let mut counts = Vec::new();
        let mut row_groups = Vec::with_capacity(n_rows);
        for row in 0..n_rows {
            let tuple: Vec<ValueKey> = key_values.iter().map(|col| col[row].to_key()).collect();
            let group = *slots.entry(tuple).or_insert_with(|| {
                first_rows.push(row as u32);
                counts.push(0);
                counts.len() - 1
            });
            counts[group] += 1;
            row_groups.push(group);
        }

        let n_groups = first_rows.len();
        let build_mask = |group: usize| -> Vector {
            let mask: BooleanArray = row_groups.iter().map(|&g| Some(g == group)).collect();
            Vector::new(Arc::new(mask))
        };
        let masks: Vec<Vector> = if config.use_parallel(n_groups) {
            (0..n_groups).into_par_iter().map(build_mask).collect()
        } else {
            (0..n_groups).map(build_mask).collect()
        };
        debug!(
            "grouped {n_rows} rows by {:?} into {n_groups} groups (parallel: {})",
            keys,
            config.use_parallel(n_groups)
        );

        Ok(Group {
            source: source.clone(),
            keys,
            first_rows,
            counts,
            masks,
            config,
        })
    }

    /// Key column names.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of groups.
    #[must_use]
    pub fn size(&self) -> usize {
        self.masks.len()
    }

    #[must_use]
    pub fn source(&self) -> &DataFrame {
        &self.source
    }

    #[must_use]
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Per-group row masks, in group order.
    #[must_use]
    pub fn filters(&self) -> &[Vector] {
        &self.masks
    }

    /// Sub-frames of the source, one per group. Each call starts over.
    #[must_use]
    pub fn each(&self) -> GroupIter<'_> {
        GroupIter {
            group: self,
            next: 0,
        }
    }

    /// One row per group holding the key values, in their source types.
    ///
    /// # Errors
    ///
    /// Returns an error if the key columns cannot be gathered.
    pub fn group_keys(&self) -> Result<DataFrame> {
        self.source.pick(self.keys.clone())?.take(&self.first_rows)
    }

    /// [`Group::group_keys`] plus a `group_count` column with each group's
    /// row count in the narrowest unsigned type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key columns cannot be gathered.
    pub fn group_count(&self) -> Result<DataFrame> {
        let counts: Vec<Value> = self.counts.iter().map(|&c| Value::UInt64(c as u64)).collect();
        let counts = array_from_values(&counts, None)?;
        let keys = self.group_keys()?;
        let mut fields: Vec<Field> = keys
            .schema()
            .fields()
            .iter()
            .map(|f| f.as_ref().clone())
            .collect();
        let mut columns = keys.batch().columns().to_vec();
        fields.push(Field::new("group_count", counts.data_type().clone(), false));
        columns.push(counts);
        DataFrame::from_parts(fields, columns, self.size())
    }
}

/// Iterator over the sub-frames of a [`Group`].
#[derive(Debug)]
pub struct GroupIter<'a> {
    group: &'a Group,
    next: usize,
}

impl Iterator for GroupIter<'_> {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        let mask = self.group.masks.get(self.next)?;
        self.next += 1;
        Some(self.group.source.filter(mask))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.group.size() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GroupIter<'_> {}
