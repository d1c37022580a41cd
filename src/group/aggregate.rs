//! Per-group aggregation.

use arrow::array::{Array, ArrayRef};
use arrow::compute::concat;
use arrow::datatypes::Field;
use log::trace;
use rayon::prelude::*;

use crate::compute::AggregateFunction;
use crate::dataframe::DataFrame;
use crate::error::{FrameError, Result};
use crate::group::{AggRequest, Group, GroupContext};
use crate::types::{array_to_values, Value};
use crate::vector::Vector;

/// One aggregated column before naming.
struct AggColumn {
    function: AggregateFunction,
    target: String,
    data: ArrayRef,
}

impl AggColumn {
    fn qualified_name(&self) -> String {
        format!("{}({})", self.function.name(), self.target)
    }
}

macro_rules! named_aggregations {
    ($($(#[$doc:meta])* $method:ident => $function:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns [`FrameError::ArgumentError`] if `targets` is empty or
            /// names a column that does not exist.
            pub fn $method<S: AsRef<str>>(&self, targets: &[S]) -> Result<DataFrame> {
                self.aggregate(AggregateFunction::$function, targets)
            }
        )*
    };
}

impl Group {
    /// Aggregates each target per group.
    ///
    /// Returns the generated column names, always of the form
    /// `"function(target)"`, and per target one value per group.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] for an unknown target, or the
    /// kernel's error.
    pub fn agg<S: AsRef<str>>(
        &self,
        function: AggregateFunction,
        targets: &[S],
    ) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        let mut names = Vec::with_capacity(targets.len());
        let mut values = Vec::with_capacity(targets.len());
        for target in targets {
            let column = self.agg_column(function, target.as_ref())?;
            names.push(column.qualified_name());
            values.push(array_to_values(&column.data)?);
        }
        Ok((names, values))
    }

    /// Aggregates `targets` with `function`; key columns come first.
    ///
    /// A single target yields a column named after the function alone,
    /// several targets yield `"function(target)"` columns.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if `targets` is empty or names a
    /// column that does not exist.
    pub fn aggregate<S: AsRef<str>>(
        &self,
        function: AggregateFunction,
        targets: &[S],
    ) -> Result<DataFrame> {
        self.aggregate_requests(vec![AggRequest::new(function, targets)])
    }

    /// Aggregates the requests a block builds from a [`GroupContext`].
    ///
    /// ```
    /// # use colframe::{ColumnSource, DataFrame};
    /// let df = DataFrame::new(vec![
    ///     ("k", ColumnSource::from(vec!["a", "a", "b"])),
    ///     ("x", ColumnSource::from(vec![1i64, 2, 3])),
    /// ])
    /// .unwrap();
    /// let out = df
    ///     .group(&["k"])
    ///     .unwrap()
    ///     .summarize(|g| Ok(vec![g.count(&["x"]), g.sum(&["x"])]))
    ///     .unwrap();
    /// assert_eq!(out.keys(), vec!["k", "count(x)", "sum(x)"]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if the block yields no requests,
    /// or the block's error.
    pub fn summarize<F>(&self, block: F) -> Result<DataFrame>
    where
        F: FnOnce(&GroupContext<'_>) -> Result<Vec<AggRequest>>,
    {
        let requests = block(&GroupContext::new(self))?;
        if requests.is_empty() {
            return Err(FrameError::argument("summarize block returned no aggregations"));
        }
        self.aggregate_requests(requests)
    }

    /// Runs several aggregation requests in one result frame.
    ///
    /// Naming follows [`Group::aggregate`]: the plain function name when the
    /// requests produce exactly one column, `"function(target)"` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ArgumentError`] if a request has no targets
    /// or a target does not exist.
    pub fn aggregate_requests(&self, requests: Vec<AggRequest>) -> Result<DataFrame> {
        if let Some(request) = requests.iter().find(|r| r.targets.is_empty()) {
            return Err(FrameError::argument(format!(
                "{} request has no targets",
                request.function.name()
            )));
        }
        let mut columns = Vec::new();
        for request in &requests {
            for target in &request.targets {
                columns.push(self.agg_column(request.function, target)?);
            }
        }
        let plain = columns.len() == 1;

        let keys = self.group_keys()?;
        let mut fields: Vec<Field> = keys
            .schema()
            .fields()
            .iter()
            .map(|f| f.as_ref().clone())
            .collect();
        let mut arrays: Vec<ArrayRef> = keys.batch().columns().to_vec();
        for column in columns {
            let name = if plain {
                column.function.name().to_string()
            } else {
                column.qualified_name()
            };
            fields.push(Field::new(name, column.data.data_type().clone(), true));
            arrays.push(column.data);
        }
        DataFrame::from_parts(fields, arrays, self.size())
    }

    fn agg_column(&self, function: AggregateFunction, target: &str) -> Result<AggColumn> {
        let column = self.source().v(target)?;
        function.output_type(column.data_type())?;
        let options = self.config().aggregate_options;
        let reduce = |mask: &Vector| -> Result<ArrayRef> {
            function.reduce_to_array(column.filter(mask)?.data(), &options)
        };
        let cells = if self.config().use_parallel(self.size()) {
            self.filters().par_iter().map(reduce).collect::<Result<Vec<_>>>()?
        } else {
            self.filters().iter().map(reduce).collect::<Result<Vec<_>>>()?
        };
        let cells: Vec<&dyn Array> = cells.iter().map(AsRef::as_ref).collect();
        let data = concat(&cells)?;
        trace!("{}({target}) over {} groups", function.name(), data.len());
        Ok(AggColumn {
            function,
            target: target.to_string(),
            data,
        })
    }

    named_aggregations! {
        /// Non-null count per group.
        count => Count,
        sum => Sum,
        mean => Mean,
        min => Min,
        max => Max,
        product => Product,
        /// Population standard deviation per group.
        stddev => Stddev,
        /// Population variance per group.
        variance => Variance,
        median => Median,
        /// First non-null value per group.
        first => First,
        last => Last,
        count_distinct => CountDistinct,
        all => All,
        any => Any,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{AsArray, TimestampMicrosecondArray};
    use arrow::datatypes::{DataType, TimestampMicrosecondType};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::dataframe::ColumnSource;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            ("k", ColumnSource::from(vec!["a", "a", "b", "b", "c"])),
            ("x", ColumnSource::from(vec![1u8, 2, 3, 4, 5])),
            ("y", ColumnSource::from(vec![1.0, 2.0, 3.0, 4.0, 5.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_single_target_gets_plain_name() {
        let out = sample().group(&["k"]).unwrap().sum(&["x"]).unwrap();
        assert_eq!(out.keys(), vec!["k", "sum"]);
        assert_eq!(out.types()[1], DataType::UInt64);
        assert_eq!(
            out.v("sum").unwrap().to_values().unwrap(),
            vec![Value::UInt64(3), Value::UInt64(7), Value::UInt64(5)]
        );
    }

    #[test]
    fn test_multiple_targets_get_qualified_names() {
        let out = sample().group(&["k"]).unwrap().mean(&["x", "y"]).unwrap();
        assert_eq!(out.keys(), vec!["k", "mean(x)", "mean(y)"]);
    }

    #[test]
    fn test_agg_always_qualifies() {
        let group = sample().group(&["k"]).unwrap();
        let (names, values) = group.agg(AggregateFunction::Max, &["y"]).unwrap();
        assert_eq!(names, vec!["max(y)"]);
        assert_eq!(
            values,
            vec![vec![Value::Float64(2.0), Value::Float64(4.0), Value::Float64(5.0)]]
        );
    }

    #[test]
    fn test_unknown_target_and_empty_targets() {
        let group = sample().group(&["k"]).unwrap();
        assert!(group.count(&["nope"]).unwrap_err().is_argument_error());
        assert!(group.count::<&str>(&[]).unwrap_err().is_argument_error());
        assert!(group.summarize(|_| Ok(Vec::new())).unwrap_err().is_argument_error());
    }

    #[test]
    fn test_summarize_single_request_is_plain() {
        let group = sample().group(&["k"]).unwrap();
        let out = group.summarize(|g| Ok(vec![g.count(&["y"])])).unwrap();
        assert_eq!(out.keys(), vec!["k", "count"]);
        assert_eq!(
            out.v("count").unwrap().to_values().unwrap(),
            vec![Value::Int64(2), Value::Int64(2), Value::Int64(1)]
        );
    }

    #[test]
    fn test_multi_key_grouping() {
        let df = DataFrame::new(vec![
            ("a", ColumnSource::from(vec![1i64, 1, 2, 1])),
            ("b", ColumnSource::from(vec!["x", "y", "x", "x"])),
            ("v", ColumnSource::from(vec![10i64, 20, 30, 40])),
        ])
        .unwrap();
        let out = df.group(&["a", "b"]).unwrap().sum(&["v"]).unwrap();
        assert_eq!(out.keys(), vec!["a", "b", "sum"]);
        assert_eq!(
            out.v("sum").unwrap().to_values().unwrap(),
            vec![Value::Int64(50), Value::Int64(20), Value::Int64(30)]
        );
    }

    #[test]
    fn test_empty_request_among_others_is_rejected() {
        let group = sample().group(&["k"]).unwrap();
        let result = group.summarize(|g| Ok(vec![g.sum(&["x"]), g.count::<&str>(&[])]));
        assert!(result.unwrap_err().is_argument_error());
    }

    #[test]
    fn test_zoned_timestamps_survive_grouping() {
        let stamps: ArrayRef = Arc::new(
            TimestampMicrosecondArray::from(vec![2_000_000, 1_000_000, 3_000_000])
                .with_timezone("+09:00"),
        );
        let df = DataFrame::new(vec![
            ("k", ColumnSource::from(vec!["a", "a", "b"])),
            ("t", ColumnSource::from(Arc::clone(&stamps))),
        ])
        .unwrap();
        let group = df.group(&["k"]).unwrap();
        for (out, expected) in [
            (group.min(&["t"]).unwrap(), [1_000_000_i64, 3_000_000]),
            (group.first(&["t"]).unwrap(), [2_000_000, 3_000_000]),
        ] {
            let column = out.batch().column(1);
            assert_eq!(column.data_type(), stamps.data_type());
            assert_eq!(
                column.as_primitive::<TimestampMicrosecondType>().values().to_vec(),
                expected.to_vec()
            );
        }
    }
}
