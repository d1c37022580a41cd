//! colframe - columnar data frames over Apache Arrow
//!
//! A [`DataFrame`] is an immutable table of named, typed columns. Column
//! algebra (`pick`, `drop`, `rename`, `assign`) rebuilds the table's fields
//! while sharing untouched arrays; [`Group`] partitions rows by key columns
//! and aggregates per group; [`Vector`] wraps one column and routes compute
//! functions to Arrow kernels.
//!
//! ```
//! use colframe::{ColumnSource, DataFrame, Value};
//!
//! let df = DataFrame::new(vec![
//!     ("k", ColumnSource::from(vec![Some(0i64), Some(0), Some(1), None])),
//!     ("x", ColumnSource::from(vec![1.0, 2.0, 3.0, 4.0])),
//! ])?;
//! let sums = df.group(&["k"])?.sum(&["x"])?;
//! assert_eq!(sums.keys(), vec!["k", "sum"]);
//! assert_eq!(sums.size(), 3);
//! assert_eq!(sums.v("sum")?.get(0)?, Value::Float64(3.0));
//! # Ok::<(), colframe::FrameError>(())
//! ```

pub mod compute;
pub mod config;
pub mod dataframe;
pub mod error;
pub mod group;
pub mod types;
pub mod vector;

pub use compute::{AggregateFunction, AggregateOptions, BinaryFunction, Function, UnaryFunction};
pub use config::GroupConfig;
pub use dataframe::{
    Arguments, ColumnSource, Context, DataFrame, Entries, Entry, Selector, SelectorItem,
};
pub use error::{FrameError, Result};
pub use group::{AggRequest, Group, GroupContext, GroupIter};
pub use types::{TypeClass, Value, ValueKey};
pub use vector::{Computed, Operand, Vector};
