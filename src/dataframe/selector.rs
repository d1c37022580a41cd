//! Column selectors for `pick` and `drop`.

use std::collections::HashSet;

use crate::dataframe::DataFrame;
use crate::error::{FrameError, Result};

/// One element of a column selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorItem {
    Name(String),
    Index(usize),
    Bool(bool),
}

/// A list of column names and indices, or one boolean per column.
///
/// Names and indices may be mixed; booleans may not be mixed with either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector(Vec<SelectorItem>);

impl Selector {
    #[must_use]
    pub fn new(items: Vec<SelectorItem>) -> Self {
        Selector(items)
    }

    #[must_use]
    pub fn items(&self) -> &[SelectorItem] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column positions selected in `frame`.
    ///
    /// A name/index list yields positions in list order; a boolean list
    /// yields the true positions in column order.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if the forms are mixed, a
    /// boolean list has the wrong length, a name or index does not exist,
    /// or a column is selected twice.
    pub fn positions(&self, frame: &DataFrame) -> Result<Vec<usize>> {
        let all_bools = self
            .0
            .iter()
            .all(|item| matches!(item, SelectorItem::Bool(_)));
        if all_bools && !self.0.is_empty() {
            if self.0.len() != frame.n_keys() {
                return Err(FrameError::argument(format!(
                    "boolean selector has {} entries for {} columns",
                    self.0.len(),
                    frame.n_keys()
                )));
            }
            return Ok(self
                .0
                .iter()
                .enumerate()
                .filter_map(|(i, item)| (item == &SelectorItem::Bool(true)).then_some(i))
                .collect());
        }

        let mut seen = HashSet::new();
        let mut positions = Vec::with_capacity(self.0.len());
        for item in &self.0 {
            let position = match item {
                SelectorItem::Name(name) => frame
                    .key_index(name)
                    .ok_or_else(|| FrameError::argument(format!("not a key of self: {name}")))?,
                SelectorItem::Index(i) if *i < frame.n_keys() => *i,
                SelectorItem::Index(i) => {
                    return Err(FrameError::argument(format!(
                        "column index {i} out of range for {} columns",
                        frame.n_keys()
                    )))
                }
                SelectorItem::Bool(_) => {
                    return Err(FrameError::argument(
                        "selector mixes booleans with names or indices",
                    ))
                }
            };
            if !seen.insert(position) {
                return Err(FrameError::argument(format!(
                    "column selected twice: {}",
                    frame.keys()[position]
                )));
            }
            positions.push(position);
        }
        Ok(positions)
    }
}

impl From<&str> for SelectorItem {
    fn from(name: &str) -> Self {
        SelectorItem::Name(name.to_string())
    }
}

impl From<String> for SelectorItem {
    fn from(name: String) -> Self {
        SelectorItem::Name(name)
    }
}

impl From<usize> for SelectorItem {
    fn from(index: usize) -> Self {
        SelectorItem::Index(index)
    }
}

impl From<bool> for SelectorItem {
    fn from(keep: bool) -> Self {
        SelectorItem::Bool(keep)
    }
}

impl<T: Into<SelectorItem>> From<Vec<T>> for Selector {
    fn from(items: Vec<T>) -> Self {
        Selector(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SelectorItem>, const N: usize> From<[T; N]> for Selector {
    fn from(items: [T; N]) -> Self {
        Selector(items.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector(vec![name.into()])
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector(vec![name.into()])
    }
}

impl From<usize> for Selector {
    fn from(index: usize) -> Self {
        Selector(vec![index.into()])
    }
}

impl From<&[&str]> for Selector {
    fn from(names: &[&str]) -> Self {
        Selector(names.iter().map(|&n| n.into()).collect())
    }
}
