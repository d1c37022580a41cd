//! Column algebra: pick, drop, rename and assign.
//!
//! Each operation rebuilds the (field, array) list and leaves the source
//! frame untouched. Arrays that survive an operation are shared by `Arc`.

use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{Field, FieldRef};
use log::debug;

use crate::dataframe::{Arguments, ColumnSource, Context, DataFrame, Entries, Selector};
use crate::error::{FrameError, Result};

/// Where `assign` places columns whose names are new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Append,
    Prepend,
}

impl DataFrame {
    /// Keeps the selected columns.
    ///
    /// A name/index selector orders the result as listed; a boolean selector
    /// keeps the existing order. An empty selector yields the empty frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] for an invalid selector.
    pub fn pick(&self, selector: impl Into<Selector>) -> Result<DataFrame> {
        let positions = selector.into().positions(self)?;
        self.pick_positions(&positions)
    }

    /// [`DataFrame::pick`] with a selector computed from the frame.
    ///
    /// # Errors
    ///
    /// Returns the block's error or [`FrameError::ArgumentError`].
    pub fn pick_by<F>(&self, block: F) -> Result<DataFrame>
    where
        F: FnOnce(&Context<'_>) -> Result<Selector>,
    {
        let selector = block(&Context::new(self))?;
        self.pick(selector)
    }

    /// [`DataFrame::pick`] with positional arguments or a block.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if both are given.
    pub fn pick_with(&self, args: Arguments<'_, Selector>) -> Result<DataFrame> {
        let selector = args.resolve(self)?;
        self.pick(selector)
    }

    /// Removes the selected columns.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] for an invalid selector.
    pub fn drop(&self, selector: impl Into<Selector>) -> Result<DataFrame> {
        let dropped = selector.into().positions(self)?;
        let keep: Vec<usize> = (0..self.n_keys()).filter(|i| !dropped.contains(i)).collect();
        self.pick_positions(&keep)
    }

    /// [`DataFrame::drop`] with a selector computed from the frame.
    ///
    /// # Errors
    ///
    /// Returns the block's error or [`FrameError::ArgumentError`].
    pub fn drop_by<F>(&self, block: F) -> Result<DataFrame>
    where
        F: FnOnce(&Context<'_>) -> Result<Selector>,
    {
        let selector = block(&Context::new(self))?;
        self.drop(selector)
    }

    /// [`DataFrame::drop`] with positional arguments or a block.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if both are given.
    pub fn drop_with(&self, args: Arguments<'_, Selector>) -> Result<DataFrame> {
        let selector = args.resolve(self)?;
        self.drop(selector)
    }

    fn pick_positions(&self, positions: &[usize]) -> Result<DataFrame> {
        debug!("pick {:?} of {} columns", positions, self.n_keys());
        if positions.is_empty() {
            return Ok(DataFrame::empty());
        }
        let batch = self.batch.project(positions)?;
        Ok(DataFrame { batch })
    }

    /// Renames columns by an `old -> new` mapping; arrays are shared.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if an old name does not exist or
    /// the renamed columns collide.
    pub fn rename(&self, mapping: impl Into<Entries<String>>) -> Result<DataFrame> {
        let mapping = mapping.into().normalize()?;
        if mapping.is_empty() {
            return Ok(self.clone());
        }
        let schema = self.batch.schema();
        let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
        for (from, to) in &mapping {
            let index = self
                .key_index(from)
                .ok_or_else(|| FrameError::argument(format!("not a key of self: {from}")))?;
            fields[index] = Arc::new(fields[index].as_ref().clone().with_name(to.as_str()));
        }
        debug!("rename {} of {} columns", mapping.len(), self.n_keys());
        let fields = fields.iter().map(|f| f.as_ref().clone()).collect();
        DataFrame::from_parts(fields, self.batch.columns().to_vec(), self.size())
    }

    /// [`DataFrame::rename`] with a mapping computed from the frame.
    ///
    /// # Errors
    ///
    /// Returns the block's error or [`FrameError::ArgumentError`].
    pub fn rename_by<F>(&self, block: F) -> Result<DataFrame>
    where
        F: FnOnce(&Context<'_>) -> Result<Entries<String>>,
    {
        let mapping = block(&Context::new(self))?;
        self.rename(mapping)
    }

    /// [`DataFrame::rename`] with positional arguments or a block.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if both are given.
    pub fn rename_with(&self, args: Arguments<'_, Entries<String>>) -> Result<DataFrame> {
        let mapping = args.resolve(self)?;
        self.rename(mapping)
    }

    /// Replaces existing columns in place and appends new ones.
    ///
    /// A replacement may change the column's element type. An empty mapping
    /// returns the frame unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if a column's length differs
    /// from the row count or the mapping is malformed.
    pub fn assign(&self, mapping: impl Into<Entries<ColumnSource>>) -> Result<DataFrame> {
        self.assign_at(mapping.into(), Placement::Append)
    }

    /// [`DataFrame::assign`] with a mapping computed from the frame.
    ///
    /// # Errors
    ///
    /// Returns the block's error or [`FrameError::ArgumentError`].
    pub fn assign_by<F>(&self, block: F) -> Result<DataFrame>
    where
        F: FnOnce(&Context<'_>) -> Result<Entries<ColumnSource>>,
    {
        let mapping = block(&Context::new(self))?;
        self.assign(mapping)
    }

    /// [`DataFrame::assign`] with positional arguments or a block.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if both are given.
    pub fn assign_with(&self, args: Arguments<'_, Entries<ColumnSource>>) -> Result<DataFrame> {
        let mapping = args.resolve(self)?;
        self.assign(mapping)
    }

    /// Like [`DataFrame::assign`], but new columns are prepended, keeping
    /// their relative order.
    ///
    /// # Errors
    ///
    /// Same as [`DataFrame::assign`].
    pub fn assign_left(&self, mapping: impl Into<Entries<ColumnSource>>) -> Result<DataFrame> {
        self.assign_at(mapping.into(), Placement::Prepend)
    }

    /// [`DataFrame::assign_left`] with a mapping computed from the frame.
    ///
    /// # Errors
    ///
    /// Returns the block's error or [`FrameError::ArgumentError`].
    pub fn assign_left_by<F>(&self, block: F) -> Result<DataFrame>
    where
        F: FnOnce(&Context<'_>) -> Result<Entries<ColumnSource>>,
    {
        let mapping = block(&Context::new(self))?;
        self.assign_left(mapping)
    }

    /// [`DataFrame::assign_left`] with positional arguments or a block.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if both are given.
    pub fn assign_left_with(
        &self,
        args: Arguments<'_, Entries<ColumnSource>>,
    ) -> Result<DataFrame> {
        let mapping = args.resolve(self)?;
        self.assign_left(mapping)
    }

    fn assign_at(&self, mapping: Entries<ColumnSource>, placement: Placement) -> Result<DataFrame> {
        let mapping = mapping.normalize()?;
        if mapping.is_empty() {
            return Ok(self.clone());
        }
        // A frame without columns takes its row count from the first column.
        let n_rows = if self.is_empty() {
            mapping[0].1.len()
        } else {
            self.size()
        };

        let schema = self.batch.schema();
        let mut columns: Vec<(Field, ArrayRef)> = schema
            .fields()
            .iter()
            .zip(self.batch.columns())
            .map(|(f, c)| (f.as_ref().clone(), Arc::clone(c)))
            .collect();
        let mut added = Vec::new();
        let mut replaced = 0usize;
        for (name, source) in mapping {
            let array = source.into_array(n_rows)?;
            let field = Field::new(name.as_str(), array.data_type().clone(), true);
            match self.key_index(&name) {
                Some(index) => {
                    columns[index] = (field, array);
                    replaced += 1;
                }
                None => added.push((field, array)),
            }
        }
        debug!(
            "assign: {replaced} replaced, {} added ({placement:?})",
            added.len()
        );
        match placement {
            Placement::Append => columns.extend(added),
            Placement::Prepend => {
                added.extend(columns);
                columns = added;
            }
        }
        let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) = columns.into_iter().unzip();
        DataFrame::from_parts(fields, arrays, n_rows)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataframe::{Entry, SelectorItem};
    use crate::types::Value;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            ("a", ColumnSource::from(vec![1i64, 2, 3])),
            ("b", ColumnSource::from(vec!["x", "y", "z"])),
            ("c", ColumnSource::from(vec![1.5, 2.5, 3.5])),
        ])
        .unwrap()
    }

    #[test]
    fn test_pick_by_names_orders_as_listed() {
        let df = sample().pick(vec!["c", "a"]).unwrap();
        assert_eq!(df.keys(), vec!["c", "a"]);
        assert_eq!(df.size(), 3);
    }

    #[test]
    fn test_pick_by_booleans_and_indices() {
        let df = sample();
        assert_eq!(df.pick(vec![true, false, true]).unwrap().keys(), vec!["a", "c"]);
        assert_eq!(df.pick(vec![2usize, 0]).unwrap().keys(), vec!["c", "a"]);
        let mixed = Selector::new(vec![SelectorItem::from("a"), SelectorItem::from(1usize)]);
        assert_eq!(df.pick(mixed).unwrap().keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_pick_errors() {
        let df = sample();
        assert!(df.pick("nope").unwrap_err().is_argument_error());
        assert!(df.pick(vec![true, false]).is_err());
        let mixed = Selector::new(vec![SelectorItem::from("a"), SelectorItem::from(true)]);
        assert!(df.pick(mixed).is_err());
        assert!(df.pick(vec!["a", "a"]).is_err());
    }

    #[test]
    fn test_pick_empty_selector() {
        let df = sample().pick(Selector::default()).unwrap();
        assert!(df.is_empty());
    }

    #[test]
    fn test_pick_shares_arrays() {
        let df = sample();
        let picked = df.pick("a").unwrap();
        assert!(Arc::ptr_eq(df.batch().column(0), picked.batch().column(0)));
    }

    #[test]
    fn test_drop_complements_pick() {
        let df = sample();
        assert_eq!(df.drop("b").unwrap().keys(), vec!["a", "c"]);
        assert_eq!(df.drop(vec![false, true, true]).unwrap().keys(), vec!["a"]);
        assert!(df.drop(vec!["a", "b", "c"]).unwrap().is_empty());
        assert!(df.drop("zz").is_err());
    }

    #[test]
    fn test_rename_keeps_arrays() {
        let df = sample();
        let renamed = df.rename(vec![("a".to_string(), "alpha".to_string())]).unwrap();
        assert_eq!(renamed.keys(), vec!["alpha", "b", "c"]);
        assert!(Arc::ptr_eq(df.batch().column(0), renamed.batch().column(0)));
        assert!(df.rename(("zz".to_string(), "q".to_string())).is_err());
        assert!(df.rename(("a".to_string(), "b".to_string())).is_err());
    }

    #[test]
    fn test_rename_empty_is_identity() {
        let df = sample();
        assert_eq!(df.rename(Entries::default()).unwrap(), df);
    }

    #[test]
    fn test_assign_replaces_in_place() {
        let df = sample();
        let out = df.assign(("b", ColumnSource::from(vec![7i64, 8, 9]))).unwrap();
        assert_eq!(out.keys(), df.keys());
        assert_eq!(
            out.v("b").unwrap().to_values().unwrap(),
            vec![Value::Int64(7), Value::Int64(8), Value::Int64(9)]
        );
    }

    #[test]
    fn test_assign_appends_and_prepends() {
        let df = sample();
        let new_cols = vec![
            ("d", ColumnSource::from(vec![true, false, true])),
            ("e", ColumnSource::Values(vec![Value::Int64(1), Value::Null, Value::Int64(3)])),
        ];
        let appended = df.assign(new_cols.clone()).unwrap();
        assert_eq!(appended.keys(), vec!["a", "b", "c", "d", "e"]);
        let prepended = df.assign_left(new_cols).unwrap();
        assert_eq!(prepended.keys(), vec!["d", "e", "a", "b", "c"]);
    }

    #[test]
    fn test_assign_size_mismatch() {
        let err = sample()
            .assign(("d", ColumnSource::from(vec![1i64])))
            .unwrap_err();
        assert!(matches!(err, FrameError::ArgumentError(_)));
    }

    #[test]
    fn test_assign_by_block() {
        let df = sample();
        let out = df
            .assign_by(|ctx| {
                let doubled = ctx.v("a")?.multiply(2i64)?;
                Ok(Entries::Flat(vec![
                    Entry::Key("double".to_string()),
                    Entry::Value(ColumnSource::from(doubled)),
                ]))
            })
            .unwrap();
        assert_eq!(
            out.v("double").unwrap().to_values().unwrap(),
            vec![Value::Int64(2), Value::Int64(4), Value::Int64(6)]
        );
    }

    #[test]
    fn test_arguments_forms() {
        let df = sample();
        let picked = df
            .pick_with(Arguments::block(|ctx| Ok(Selector::from(ctx.keys()[..1].to_vec()))))
            .unwrap();
        assert_eq!(picked.keys(), vec!["a"]);
        let both = Arguments::positional("a").with_block(|_| Ok(Selector::default()));
        assert!(df.pick_with(both).unwrap_err().is_argument_error());
        assert_eq!(df.assign_with(Arguments::new()).unwrap(), df);
    }

    #[test]
    fn test_source_is_unchanged() {
        let df = sample();
        let before = df.clone();
        let _ = df.assign(("z", ColumnSource::from(vec![0i64, 0, 0]))).unwrap();
        let _ = df.drop("a").unwrap();
        assert_eq!(df, before);
    }
}
