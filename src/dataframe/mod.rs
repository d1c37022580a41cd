//! `DataFrame`: an immutable table of named, typed columns.
//!
//! The table is a thin wrapper around an Arrow [`RecordBatch`]. Every
//! operation returns a new frame; arrays carried through unchanged are
//! shared with the source, never copied.

mod algebra;
mod args;
mod selector;

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{ArrayRef, UInt32Array};
use arrow::compute::{filter_record_batch, take_record_batch};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::config::GroupConfig;
use crate::error::{FrameError, Result};
use crate::group::Group;
use crate::vector::Vector;

pub use args::{Arguments, ColumnSource, Context, Entries, Entry};
pub use selector::{Selector, SelectorItem};

/// An ordered set of equal-length named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    batch: RecordBatch,
}

impl DataFrame {
    /// Builds a frame from `(name, column)` pairs.
    ///
    /// ```
    /// # use colframe::DataFrame;
    /// let df = DataFrame::new(vec![("x", vec![1i64, 2, 3])]).unwrap();
    /// assert_eq!(df.size(), 3);
    /// assert_eq!(df.keys(), vec!["x"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if the columns differ in length
    /// or a name repeats.
    pub fn new<T: Into<ColumnSource>>(columns: Vec<(&str, T)>) -> Result<Self> {
        let entries: Vec<(String, ColumnSource)> = columns
            .into_iter()
            .map(|(name, column)| (name.to_string(), column.into()))
            .collect();
        DataFrame::empty().assign(Entries::Map(entries))
    }

    /// The zero-column, zero-row frame.
    #[must_use]
    pub fn empty() -> Self {
        DataFrame {
            batch: RecordBatch::new_empty(Arc::new(Schema::empty())),
        }
    }

    /// Wraps a record batch.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if two fields share a name.
    pub fn from_batch(batch: RecordBatch) -> Result<Self> {
        check_unique(batch.schema().fields().iter().map(|f| f.name().as_str()))?;
        Ok(DataFrame { batch })
    }

    /// Builds a frame from keyed vectors.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if a vector has no key, the keys
    /// repeat, or the lengths differ.
    pub fn from_vectors(vectors: Vec<Vector>) -> Result<Self> {
        let mut entries = Vec::with_capacity(vectors.len());
        for vector in vectors {
            let key = vector
                .key()
                .ok_or_else(|| FrameError::argument("vector has no key"))?
                .to_string();
            entries.push((key, ColumnSource::Vector(vector)));
        }
        DataFrame::empty().assign(Entries::Map(entries))
    }

    /// Assembles a frame from parallel field and column lists.
    pub(crate) fn from_parts(
        fields: Vec<Field>,
        columns: Vec<ArrayRef>,
        n_rows: usize,
    ) -> Result<Self> {
        check_unique(fields.iter().map(|f| f.name().as_str()))?;
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(FrameError::argument(format!(
                "size mismatch: column has {} rows, table has {n_rows}",
                bad.len()
            )));
        }
        let schema = Arc::new(Schema::new(fields));
        let options = RecordBatchOptions::new().with_row_count(Some(n_rows));
        let batch = RecordBatch::try_new_with_options(schema, columns, &options)?;
        Ok(DataFrame { batch })
    }

    /// The backing record batch.
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    #[must_use]
    pub fn schema(&self) -> SchemaRef {
        self.batch.schema()
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.batch.num_rows()
    }

    /// Alias for [`DataFrame::size`].
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.size()
    }

    /// Number of columns.
    #[must_use]
    pub fn n_keys(&self) -> usize {
        self.batch.num_columns()
    }

    /// Alias for [`DataFrame::n_keys`].
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_keys()
    }

    /// True when the frame has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_keys() == 0
    }

    /// Column names in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    /// Column element types in order.
    #[must_use]
    pub fn types(&self) -> Vec<DataType> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.data_type().clone())
            .collect()
    }

    #[must_use]
    pub fn key_index(&self, name: &str) -> Option<usize> {
        self.batch.schema().index_of(name).ok()
    }

    #[must_use]
    pub fn has_key(&self, name: &str) -> bool {
        self.key_index(name).is_some()
    }

    /// Column `name` as a keyed vector.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if there is no such column.
    pub fn v(&self, name: &str) -> Result<Vector> {
        let index = self
            .key_index(name)
            .ok_or_else(|| FrameError::argument(format!("not a key of self: {name}")))?;
        Ok(self.vector_at(index))
    }

    /// All columns as keyed vectors.
    #[must_use]
    pub fn vectors(&self) -> Vec<Vector> {
        (0..self.n_keys()).map(|i| self.vector_at(i)).collect()
    }

    fn vector_at(&self, index: usize) -> Vector {
        let name = self.batch.schema().field(index).name().clone();
        Vector::new(Arc::clone(self.batch.column(index))).with_key(name)
    }

    /// Rows where `mask` is true; null mask entries drop the row.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if the mask is not boolean or its
    /// length differs from the row count.
    pub fn filter(&self, mask: &Vector) -> Result<Self> {
        if mask.size() != self.size() {
            return Err(FrameError::argument(format!(
                "size mismatch: mask has {} rows, table has {}",
                mask.size(),
                self.size()
            )));
        }
        let predicate = mask
            .as_mask()
            .map_err(|_| FrameError::argument("filter mask must be boolean"))?;
        let batch = filter_record_batch(&self.batch, predicate)?;
        Ok(DataFrame { batch })
    }

    /// Rows at `indices`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if an index is out of range.
    pub fn take(&self, indices: &[u32]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= self.size()) {
            return Err(FrameError::argument(format!(
                "row {bad} out of range for {} rows",
                self.size()
            )));
        }
        let indices = UInt32Array::from(indices.to_vec());
        let batch = take_record_batch(&self.batch, &indices)?;
        Ok(DataFrame { batch })
    }

    /// Rows `offset..offset + length`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if the range exceeds the table.
    pub fn slice(&self, offset: usize, length: usize) -> Result<Self> {
        if offset.checked_add(length).map_or(true, |end| end > self.size()) {
            return Err(FrameError::argument(format!(
                "slice {offset}..{} out of range for {} rows",
                offset.saturating_add(length),
                self.size()
            )));
        }
        Ok(DataFrame {
            batch: self.batch.slice(offset, length),
        })
    }

    /// Groups rows by the given key columns.
    ///
    /// # Errors
    ///
    /// See [`Group::new`].
    pub fn group<S: AsRef<str>>(&self, keys: &[S]) -> Result<Group> {
        Group::new(self, keys)
    }

    /// Groups rows with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`Group::new`].
    pub fn group_with_config<S: AsRef<str>>(&self, keys: &[S], config: GroupConfig) -> Result<Group> {
        Group::with_config(self, keys, config)
    }
}

fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(FrameError::argument(format!("duplicate column name: {name}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::Value;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            ("x", ColumnSource::from(vec![1i64, 2, 3])),
            ("y", ColumnSource::from(vec!["a", "b", "c"])),
        ])
        .unwrap()
    }

    #[test]
    fn test_introspection() {
        let df = sample();
        assert_eq!(df.size(), 3);
        assert_eq!(df.n_keys(), 2);
        assert_eq!(df.keys(), vec!["x", "y"]);
        assert_eq!(df.types(), vec![DataType::Int64, DataType::Utf8]);
        assert!(df.has_key("y"));
        assert_eq!(df.key_index("y"), Some(1));
        assert_eq!(df.v("x").unwrap().key(), Some("x"));
        assert!(df.v("z").unwrap_err().is_argument_error());
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let err = DataFrame::new(vec![
            ("x", ColumnSource::from(vec![1i64, 2])),
            ("y", ColumnSource::from(vec![1i64])),
        ])
        .unwrap_err();
        assert!(matches!(err, FrameError::ArgumentError(_)));
    }

    #[test]
    fn test_empty() {
        let df = DataFrame::empty();
        assert!(df.is_empty());
        assert_eq!(df.size(), 0);
        assert!(df.keys().is_empty());
    }

    #[test]
    fn test_filter_rows() {
        let df = sample();
        let mask = Vector::from(vec![true, false, true]);
        let filtered = df.filter(&mask).unwrap();
        assert_eq!(filtered.size(), 2);
        assert_eq!(
            filtered.v("y").unwrap().to_values().unwrap(),
            vec![Value::from("a"), Value::from("c")]
        );
        assert!(df.filter(&Vector::from(vec![true])).is_err());
    }

    #[test]
    fn test_slice() {
        let df = sample();
        let sliced = df.slice(1, 2).unwrap();
        assert_eq!(sliced.v("x").unwrap().to_values().unwrap(), vec![Value::Int64(2), Value::Int64(3)]);
        assert!(df.slice(2, 2).is_err());
    }

    #[test]
    fn test_from_vectors_requires_keys() {
        let keyed = Vector::from(vec![1i64]).with_key("a");
        assert_eq!(DataFrame::from_vectors(vec![keyed]).unwrap().keys(), vec!["a"]);
        assert!(DataFrame::from_vectors(vec![Vector::from(vec![1i64])]).is_err());
    }
}
