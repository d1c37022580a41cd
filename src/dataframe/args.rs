//! Argument normalization for column-manipulating operations.
//!
//! Every operation takes either positional arguments or a block evaluated
//! against a [`Context`]; both shapes are normalized into one ordered list
//! of `(name, value)` pairs before the engine sees them.

use std::collections::HashSet;

use arrow::array::ArrayRef;

use crate::dataframe::DataFrame;
use crate::error::{FrameError, Result};
use crate::types::{array_from_values, Value};
use crate::vector::Vector;

/// One element of a flat key/value list.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    Key(String),
    Value(T),
}

/// The accepted shapes of a name-to-value mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Entries<T> {
    /// Ordered `(name, value)` pairs.
    Map(Vec<(String, T)>),
    /// Alternating keys and values: `[Key, Value, Key, Value, ...]`.
    Flat(Vec<Entry<T>>),
    /// A single pair.
    Pair(String, T),
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Entries::Map(Vec::new())
    }
}

impl<T> Entries<T> {
    /// Normalizes into ordered pairs.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if a flat list does not
    /// alternate key and value, or a name appears twice.
    pub fn normalize(self) -> Result<Vec<(String, T)>> {
        let pairs = match self {
            Entries::Map(pairs) => pairs,
            Entries::Pair(name, value) => vec![(name, value)],
            Entries::Flat(entries) => {
                let mut pairs = Vec::with_capacity(entries.len() / 2);
                let mut iter = entries.into_iter();
                while let Some(entry) = iter.next() {
                    match (entry, iter.next()) {
                        (Entry::Key(name), Some(Entry::Value(value))) => pairs.push((name, value)),
                        _ => {
                            return Err(FrameError::argument(
                                "flat entries must alternate key and value",
                            ))
                        }
                    }
                }
                pairs
            }
        };
        let mut seen = HashSet::new();
        for (name, _) in &pairs {
            if !seen.insert(name.as_str()) {
                return Err(FrameError::argument(format!("duplicate key in mapping: {name}")));
            }
        }
        Ok(pairs)
    }
}

impl<S: Into<String>, T> From<(S, T)> for Entries<T> {
    fn from((name, value): (S, T)) -> Self {
        Entries::Pair(name.into(), value)
    }
}

impl<S: Into<String>, T> From<Vec<(S, T)>> for Entries<T> {
    fn from(pairs: Vec<(S, T)>) -> Self {
        Entries::Map(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<T> From<Vec<Entry<T>>> for Entries<T> {
    fn from(entries: Vec<Entry<T>>) -> Self {
        Entries::Flat(entries)
    }
}

/// Data for a new or replaced column.
#[derive(Debug, Clone)]
pub enum ColumnSource {
    Vector(Vector),
    Array(ArrayRef),
    /// Raw values; the element type is inferred.
    Values(Vec<Value>),
}

impl ColumnSource {
    /// Materializes the column, checking it has `len` rows.
    pub(crate) fn into_array(self, len: usize) -> Result<ArrayRef> {
        let array = match self {
            ColumnSource::Vector(v) => v.into_data(),
            ColumnSource::Array(a) => a,
            ColumnSource::Values(values) => array_from_values(&values, None)?,
        };
        if array.len() != len {
            return Err(FrameError::argument(format!(
                "size mismatch: column has {} rows, table has {len}",
                array.len()
            )));
        }
        Ok(array)
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            ColumnSource::Vector(v) => v.size(),
            ColumnSource::Array(a) => a.len(),
            ColumnSource::Values(values) => values.len(),
        }
    }
}

impl From<Vector> for ColumnSource {
    fn from(v: Vector) -> Self {
        ColumnSource::Vector(v)
    }
}

impl From<&Vector> for ColumnSource {
    fn from(v: &Vector) -> Self {
        ColumnSource::Vector(v.clone())
    }
}

impl From<ArrayRef> for ColumnSource {
    fn from(a: ArrayRef) -> Self {
        ColumnSource::Array(a)
    }
}

impl<T> From<Vec<T>> for ColumnSource
where
    Vector: From<Vec<T>>,
{
    fn from(values: Vec<T>) -> Self {
        ColumnSource::Vector(Vector::from(values))
    }
}

/// Read-only view of a data frame handed to blocks.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    frame: &'a DataFrame,
}

impl<'a> Context<'a> {
    pub(crate) fn new(frame: &'a DataFrame) -> Self {
        Context { frame }
    }

    /// Column `name` as a vector.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if there is no such column.
    pub fn v(&self, name: &str) -> Result<Vector> {
        self.frame.v(name)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.frame.keys()
    }

    /// Number of rows.
    #[must_use]
    pub fn size(&self) -> usize {
        self.frame.size()
    }

    #[must_use]
    pub fn frame(&self) -> &'a DataFrame {
        self.frame
    }
}

type Block<'a, P> = Box<dyn FnOnce(&Context<'_>) -> Result<P> + 'a>;

/// Positional arguments, a block, or neither. Supplying both is an error.
pub struct Arguments<'a, P> {
    positional: Option<P>,
    block: Option<Block<'a, P>>,
}

impl<P> Default for Arguments<'_, P> {
    fn default() -> Self {
        Arguments {
            positional: None,
            block: None,
        }
    }
}

impl<'a, P> Arguments<'a, P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments holding only positional values.
    #[must_use]
    pub fn positional(values: impl Into<P>) -> Self {
        Self::new().with_positional(values)
    }

    /// Arguments holding only a block.
    #[must_use]
    pub fn block<F>(block: F) -> Self
    where
        F: FnOnce(&Context<'_>) -> Result<P> + 'a,
    {
        Self::new().with_block(block)
    }

    #[must_use]
    pub fn with_positional(mut self, values: impl Into<P>) -> Self {
        self.positional = Some(values.into());
        self
    }

    #[must_use]
    pub fn with_block<F>(mut self, block: F) -> Self
    where
        F: FnOnce(&Context<'_>) -> Result<P> + 'a,
    {
        self.block = Some(Box::new(block));
        self
    }

    /// Evaluates the arguments against `frame`; neither form yields
    /// `P::default()`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if both forms are present, or
    /// the block's error.
    pub fn resolve(self, frame: &DataFrame) -> Result<P>
    where
        P: Default,
    {
        match (self.positional, self.block) {
            (Some(_), Some(_)) => Err(FrameError::argument(
                "positional arguments and a block are mutually exclusive",
            )),
            (Some(values), None) => Ok(values),
            (None, Some(block)) => block(&Context::new(frame)),
            (None, None) => Ok(P::default()),
        }
    }
}
