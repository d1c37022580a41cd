//! Aggregate functions: reduce one array to a single scalar.
//!
//! Nulls are skipped by default and an all-null input reduces to null for
//! every function except the counts. NaN is an ordinary value here, so it
//! propagates through `sum`, `mean`, `product` and the moment functions.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{new_null_array, Array, ArrayRef, AsArray, PrimitiveArray};
use arrow::compute::kernels::aggregate::{
    bool_and, bool_or, max, max_boolean, max_string, min, min_boolean, min_string, sum,
    sum_checked,
};
use arrow::datatypes::{ArrowPrimitiveType, DataType, Float64Type, Int64Type, UInt64Type};

use crate::error::{FrameError, Result};
use crate::types::{
    array_from_values, array_to_values, cast_strict, null_count, value_at, TypeClass, Value,
};

/// Options shared by every aggregate kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateOptions {
    /// Skip nulls; when false, any null makes the result null.
    pub skip_nulls: bool,
    /// Minimum number of non-null values for a non-null result.
    pub min_count: usize,
    /// Delta degrees of freedom for `variance` and `stddev`.
    pub ddof: usize,
    /// Probability used by `quantile`.
    pub quantile: f64,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            skip_nulls: true,
            min_count: 1,
            ddof: 0,
            quantile: 0.5,
        }
    }
}

impl AggregateOptions {
    /// Sets the delta degrees of freedom.
    #[must_use]
    pub fn with_ddof(mut self, ddof: usize) -> Self {
        self.ddof = ddof;
        self
    }

    /// Sets the quantile probability.
    #[must_use]
    pub fn with_quantile(mut self, quantile: f64) -> Self {
        self.quantile = quantile;
        self
    }

    /// Sets null skipping.
    #[must_use]
    pub fn with_skip_nulls(mut self, skip_nulls: bool) -> Self {
        self.skip_nulls = skip_nulls;
        self
    }

    /// Sets the minimum non-null count.
    #[must_use]
    pub fn with_min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }
}

/// Functions that reduce an array to one scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateFunction {
    All,
    Any,
    Count,
    CountDistinct,
    First,
    Last,
    Max,
    Mean,
    Median,
    Min,
    MinMax,
    Product,
    Quantile,
    Stddev,
    Sum,
    Variance,
}

impl AggregateFunction {
    /// Every aggregate function.
    pub const ALL: [AggregateFunction; 16] = [
        AggregateFunction::All,
        AggregateFunction::Any,
        AggregateFunction::Count,
        AggregateFunction::CountDistinct,
        AggregateFunction::First,
        AggregateFunction::Last,
        AggregateFunction::Max,
        AggregateFunction::Mean,
        AggregateFunction::Median,
        AggregateFunction::Min,
        AggregateFunction::MinMax,
        AggregateFunction::Product,
        AggregateFunction::Quantile,
        AggregateFunction::Stddev,
        AggregateFunction::Sum,
        AggregateFunction::Variance,
    ];

    /// Function name as used in synthesized column names.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::All => "all",
            AggregateFunction::Any => "any",
            AggregateFunction::Count => "count",
            AggregateFunction::CountDistinct => "count_distinct",
            AggregateFunction::First => "first",
            AggregateFunction::Last => "last",
            AggregateFunction::Max => "max",
            AggregateFunction::Mean => "mean",
            AggregateFunction::Median => "median",
            AggregateFunction::Min => "min",
            AggregateFunction::MinMax => "min_max",
            AggregateFunction::Product => "product",
            AggregateFunction::Quantile => "quantile",
            AggregateFunction::Stddev => "stddev",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Variance => "variance",
        }
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "count_uniq" => Some(AggregateFunction::CountDistinct),
            _ => Self::ALL.into_iter().find(|f| f.name() == name),
        }
    }

    /// Element type of the scalar produced for an input of `input` type.
    ///
    /// Integer `sum` and `product` widen to a 64-bit accumulator of the same
    /// signedness; moments always produce `Float64`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] if the function does not
    /// accept inputs of this type.
    pub fn output_type(self, input: &DataType) -> Result<DataType> {
        let class = TypeClass::of(input);
        let unsupported = || {
            FrameError::vector_argument(format!("{} is not supported for {input}", self.name()))
        };
        let output = match self {
            AggregateFunction::Count | AggregateFunction::CountDistinct => DataType::Int64,
            AggregateFunction::All | AggregateFunction::Any => {
                if class.is_boolean() || class == TypeClass::Null {
                    DataType::Boolean
                } else {
                    return Err(unsupported());
                }
            }
            AggregateFunction::Sum | AggregateFunction::Product => match class {
                TypeClass::SignedInteger => DataType::Int64,
                TypeClass::UnsignedInteger => DataType::UInt64,
                TypeClass::Float => DataType::Float64,
                TypeClass::Null => DataType::Null,
                _ => return Err(unsupported()),
            },
            AggregateFunction::Mean
            | AggregateFunction::Median
            | AggregateFunction::Quantile
            | AggregateFunction::Stddev
            | AggregateFunction::Variance => match class {
                TypeClass::SignedInteger | TypeClass::UnsignedInteger | TypeClass::Float => {
                    DataType::Float64
                }
                TypeClass::Null => DataType::Null,
                _ => return Err(unsupported()),
            },
            AggregateFunction::Min | AggregateFunction::Max | AggregateFunction::MinMax => {
                if class == TypeClass::Other {
                    return Err(unsupported());
                }
                input.clone()
            }
            AggregateFunction::First | AggregateFunction::Last => input.clone(),
        };
        Ok(output)
    }

    /// Reduces `array` to one scalar.
    ///
    /// # Errors
    ///
    /// Returns an error if the input type is unsupported, if the function
    /// does not produce a single scalar (`min_max`), or if an integer
    /// accumulation overflows 64 bits.
    pub fn reduce(self, array: &ArrayRef, options: &AggregateOptions) -> Result<Value> {
        // Validates the input type before any value is looked at.
        self.output_type(array.data_type())?;

        let valid = array.len() - null_count(array);
        let nullified = nullified(array, options);
        let class = TypeClass::of(array.data_type());

        match self {
            AggregateFunction::Count => Ok(Value::Int64(valid as i64)),
            AggregateFunction::CountDistinct => count_distinct(array),
            AggregateFunction::First => first_valid(array, 0..array.len()),
            AggregateFunction::Last => first_valid(array, (0..array.len()).rev()),
            AggregateFunction::MinMax => Err(FrameError::vector_argument(
                "min_max yields a pair of scalars; use Vector::min_max",
            )),
            _ if nullified => Ok(Value::Null),
            AggregateFunction::All => Ok(boolean(array, bool_and)),
            AggregateFunction::Any => Ok(boolean(array, bool_or)),
            AggregateFunction::Sum => sum_value(array, class),
            AggregateFunction::Product => product_value(array, class),
            AggregateFunction::Mean => {
                let floats = as_float64(array)?;
                let total = sum(primitive::<Float64Type>(&floats)?).unwrap_or(0.0);
                Ok(Value::Float64(total / valid as f64))
            }
            AggregateFunction::Variance => variance(array, options.ddof),
            AggregateFunction::Stddev => Ok(match variance(array, options.ddof)? {
                Value::Float64(v) => Value::Float64(v.sqrt()),
                other => other,
            }),
            AggregateFunction::Median => quantile(array, 0.5),
            AggregateFunction::Quantile => quantile(array, options.quantile),
            AggregateFunction::Min => extreme(array, class, Extreme::Min),
            AggregateFunction::Max => extreme(array, class, Extreme::Max),
        }
    }

    /// Reduces `array` to a one-element array of [`Self::output_type`].
    ///
    /// `min`, `max`, `first` and `last` slice the chosen cell out of `array`,
    /// so units and time zones pass through untouched.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::reduce`].
    pub fn reduce_to_array(
        self,
        array: &ArrayRef,
        options: &AggregateOptions,
    ) -> Result<ArrayRef> {
        let output_type = self.output_type(array.data_type())?;
        match self {
            AggregateFunction::Min
            | AggregateFunction::Max
            | AggregateFunction::First
            | AggregateFunction::Last => Ok(match self.select(array, options)? {
                Some(index) => array.slice(index, 1),
                None => new_null_array(&output_type, 1),
            }),
            _ => array_from_values(&[self.reduce(array, options)?], Some(&output_type)),
        }
    }

    /// Position of the cell a selecting aggregate picks, `None` when the
    /// result is null.
    fn select(self, array: &ArrayRef, options: &AggregateOptions) -> Result<Option<usize>> {
        let which = match self {
            AggregateFunction::First => {
                return Ok((0..array.len()).find(|&i| array.is_valid(i)))
            }
            AggregateFunction::Last => {
                return Ok((0..array.len()).rev().find(|&i| array.is_valid(i)))
            }
            _ if nullified(array, options) => return Ok(None),
            AggregateFunction::Min => Extreme::Min,
            AggregateFunction::Max => Extreme::Max,
            _ => {
                return Err(FrameError::vector_argument(format!(
                    "{} does not select a cell",
                    self.name()
                )))
            }
        };
        let class = TypeClass::of(array.data_type());
        if class.is_temporal() {
            // Raw ticks compare exactly, whatever the unit.
            let narrow = match array.data_type() {
                DataType::Date32 | DataType::Time32(_) => cast_strict(array, &DataType::Int32)?,
                _ => Arc::clone(array),
            };
            let ticks = cast_strict(&narrow, &DataType::Int64)?;
            let best = primitive::<Int64Type>(&ticks)?
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i, v)))
                .reduce(|best, next| match which {
                    Extreme::Min if next.1 < best.1 => next,
                    Extreme::Max if next.1 > best.1 => next,
                    _ => best,
                });
            return Ok(best.map(|(i, _)| i));
        }
        let target = extreme(array, class, which)?;
        if target.is_null() {
            return Ok(None);
        }
        let target = target.to_key();
        for i in 0..array.len() {
            if value_at(array, i)?.to_key() == target {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

fn nullified(array: &ArrayRef, options: &AggregateOptions) -> bool {
    let nulls = null_count(array);
    let valid = array.len() - nulls;
    (!options.skip_nulls && nulls > 0) || valid == 0 || valid < options.min_count
}

/// Downcasts to a primitive array, reporting a type error on mismatch.
pub(crate) fn primitive<T: ArrowPrimitiveType>(array: &ArrayRef) -> Result<&PrimitiveArray<T>> {
    array
        .as_primitive_opt::<T>()
        .ok_or_else(|| FrameError::type_error(T::DATA_TYPE.to_string(), array.data_type().to_string()))
}

fn as_float64(array: &ArrayRef) -> Result<ArrayRef> {
    cast_strict(array, &DataType::Float64)
}

fn boolean(array: &ArrayRef, kernel: fn(&arrow::array::BooleanArray) -> Option<bool>) -> Value {
    array
        .as_boolean_opt()
        .and_then(kernel)
        .map_or(Value::Null, Value::Bool)
}

fn sum_value(array: &ArrayRef, class: TypeClass) -> Result<Value> {
    let value = match class {
        TypeClass::SignedInteger => {
            let wide = cast_strict(array, &DataType::Int64)?;
            sum_checked(primitive::<Int64Type>(&wide)?)
                .map_err(|e| FrameError::ComputeError(format!("sum overflow: {e}")))?
                .map_or(Value::Null, Value::Int64)
        }
        TypeClass::UnsignedInteger => {
            let wide = cast_strict(array, &DataType::UInt64)?;
            sum_checked(primitive::<UInt64Type>(&wide)?)
                .map_err(|e| FrameError::ComputeError(format!("sum overflow: {e}")))?
                .map_or(Value::Null, Value::UInt64)
        }
        _ => {
            let floats = as_float64(array)?;
            sum(primitive::<Float64Type>(&floats)?).map_or(Value::Null, Value::Float64)
        }
    };
    Ok(value)
}

fn product_value(array: &ArrayRef, class: TypeClass) -> Result<Value> {
    let overflow = || FrameError::ComputeError("product overflow".to_string());
    let value = match class {
        TypeClass::SignedInteger => {
            let wide = cast_strict(array, &DataType::Int64)?;
            let mut acc: i64 = 1;
            for v in primitive::<Int64Type>(&wide)?.iter().flatten() {
                acc = acc.checked_mul(v).ok_or_else(overflow)?;
            }
            Value::Int64(acc)
        }
        TypeClass::UnsignedInteger => {
            let wide = cast_strict(array, &DataType::UInt64)?;
            let mut acc: u64 = 1;
            for v in primitive::<UInt64Type>(&wide)?.iter().flatten() {
                acc = acc.checked_mul(v).ok_or_else(overflow)?;
            }
            Value::UInt64(acc)
        }
        _ => {
            let floats = as_float64(array)?;
            Value::Float64(primitive::<Float64Type>(&floats)?.iter().flatten().product())
        }
    };
    Ok(value)
}

fn variance(array: &ArrayRef, ddof: usize) -> Result<Value> {
    let floats = as_float64(array)?;
    let values: Vec<f64> = primitive::<Float64Type>(&floats)?.iter().flatten().collect();
    if values.len() <= ddof {
        return Ok(Value::Null);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(Value::Float64(squares / (n - ddof as f64)))
}

/// Linear-interpolated quantile; any NaN in the input yields NaN.
fn quantile(array: &ArrayRef, q: f64) -> Result<Value> {
    if !(0.0..=1.0).contains(&q) {
        return Err(FrameError::vector_argument(format!(
            "quantile probability must be within 0..=1, got {q}"
        )));
    }
    let floats = as_float64(array)?;
    let mut values: Vec<f64> = primitive::<Float64Type>(&floats)?.iter().flatten().collect();
    if values.iter().any(|v| v.is_nan()) {
        return Ok(Value::Float64(f64::NAN));
    }
    values.sort_by(f64::total_cmp);
    let position = q * (values.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Ok(Value::Float64(
        values[lower] + (values[upper] - values[lower]) * fraction,
    ))
}

#[derive(Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

fn extreme(array: &ArrayRef, class: TypeClass, which: Extreme) -> Result<Value> {
    let value = match class {
        TypeClass::SignedInteger => {
            let wide = cast_strict(array, &DataType::Int64)?;
            let typed = primitive::<Int64Type>(&wide)?;
            match which {
                Extreme::Min => min(typed),
                Extreme::Max => max(typed),
            }
            .map_or(Value::Null, Value::Int64)
        }
        TypeClass::UnsignedInteger => {
            let wide = cast_strict(array, &DataType::UInt64)?;
            let typed = primitive::<UInt64Type>(&wide)?;
            match which {
                Extreme::Min => min(typed),
                Extreme::Max => max(typed),
            }
            .map_or(Value::Null, Value::UInt64)
        }
        TypeClass::Float => {
            let wide = as_float64(array)?;
            let typed = primitive::<Float64Type>(&wide)?;
            match which {
                Extreme::Min => min(typed),
                Extreme::Max => max(typed),
            }
            .map_or(Value::Null, Value::Float64)
        }
        TypeClass::Boolean => array
            .as_boolean_opt()
            .and_then(|b| match which {
                Extreme::Min => min_boolean(b),
                Extreme::Max => max_boolean(b),
            })
            .map_or(Value::Null, Value::Bool),
        TypeClass::String if array.data_type() == &DataType::Utf8 => {
            let strings = array.as_string::<i32>();
            match which {
                Extreme::Min => min_string(strings),
                Extreme::Max => max_string(strings),
            }
            .map_or(Value::Null, |s| Value::String(s.to_string()))
        }
        _ => {
            // Large strings and temporal values compare as scalars.
            let mut best: Option<Value> = None;
            for value in array_to_values(array)? {
                if value.is_null() {
                    continue;
                }
                let replace = match &best {
                    None => true,
                    Some(current) => match (which, value.compare(current)) {
                        (Extreme::Min, Some(std::cmp::Ordering::Less))
                        | (Extreme::Max, Some(std::cmp::Ordering::Greater)) => true,
                        _ => false,
                    },
                };
                if replace {
                    best = Some(value);
                }
            }
            best.unwrap_or(Value::Null)
        }
    };
    Ok(value)
}

fn count_distinct(array: &ArrayRef) -> Result<Value> {
    let mut seen = HashSet::new();
    for value in array_to_values(array)? {
        if !value.is_null() {
            seen.insert(value.to_key());
        }
    }
    Ok(Value::Int64(seen.len() as i64))
}

fn first_valid(array: &ArrayRef, mut indices: impl Iterator<Item = usize>) -> Result<Value> {
    match indices.find(|&i| array.is_valid(i)) {
        Some(i) => value_at(array, i),
        None => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{
        BooleanArray, Date64Array, Float64Array, Int64Array, Int8Array, StringArray,
        TimestampMicrosecondArray, TimestampNanosecondArray, UInt8Array,
    };
    use arrow::datatypes::{Date64Type, Int8Type, TimestampMicrosecondType, TimestampNanosecondType};

    use super::*;

    fn reduce(f: AggregateFunction, array: ArrayRef) -> Value {
        f.reduce(&array, &AggregateOptions::default()).unwrap()
    }

    #[test]
    fn test_sum_widens_narrow_integers() {
        let array: ArrayRef = Arc::new(UInt8Array::from(vec![200, 100]));
        assert_eq!(reduce(AggregateFunction::Sum, array), Value::UInt64(300));
        let array: ArrayRef = Arc::new(Int8Array::from(vec![100, 100, -1]));
        assert_eq!(reduce(AggregateFunction::Sum, array), Value::Int64(199));
    }

    #[test]
    fn test_nan_propagates() {
        let array: ArrayRef = Arc::new(Float64Array::from(vec![Some(1.0), Some(f64::NAN), None]));
        for f in [
            AggregateFunction::Sum,
            AggregateFunction::Mean,
            AggregateFunction::Product,
        ] {
            assert!(reduce(f, Arc::clone(&array)).is_nan(), "{}", f.name());
        }
    }

    #[test]
    fn test_all_null_is_null() {
        let array: ArrayRef = Arc::new(Float64Array::from(vec![None, None]));
        for f in [
            AggregateFunction::Sum,
            AggregateFunction::Mean,
            AggregateFunction::Product,
        ] {
            assert_eq!(reduce(f, Arc::clone(&array)), Value::Null, "{}", f.name());
        }
        assert_eq!(reduce(AggregateFunction::Count, array), Value::Int64(0));
    }

    #[test]
    fn test_mean_variance_stddev() {
        let array: ArrayRef = Arc::new(Int8Array::from(vec![1, 2, 3, 4]));
        assert_eq!(reduce(AggregateFunction::Mean, Arc::clone(&array)), Value::Float64(2.5));
        assert_eq!(
            reduce(AggregateFunction::Variance, Arc::clone(&array)),
            Value::Float64(1.25)
        );
        let unbiased = AggregateFunction::Variance
            .reduce(&array, &AggregateOptions::default().with_ddof(1))
            .unwrap();
        let Value::Float64(v) = unbiased else {
            panic!("expected float");
        };
        assert!((v - 5.0 / 3.0).abs() < 1e-12);
        let Value::Float64(sd) = reduce(AggregateFunction::Stddev, array) else {
            panic!("expected float");
        };
        assert!((sd - 1.25_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_median_and_quantile() {
        let array: ArrayRef = Arc::new(Float64Array::from(vec![4.0, 1.0, 3.0, 2.0]));
        assert_eq!(reduce(AggregateFunction::Median, Arc::clone(&array)), Value::Float64(2.5));
        let q = AggregateFunction::Quantile
            .reduce(&array, &AggregateOptions::default().with_quantile(0.0))
            .unwrap();
        assert_eq!(q, Value::Float64(1.0));
    }

    #[test]
    fn test_min_max_strings_and_booleans() {
        let array: ArrayRef = Arc::new(StringArray::from(vec![Some("b"), None, Some("a")]));
        assert_eq!(reduce(AggregateFunction::Min, Arc::clone(&array)), Value::from("a"));
        assert_eq!(reduce(AggregateFunction::Max, array), Value::from("b"));
        let array: ArrayRef = Arc::new(BooleanArray::from(vec![true, false]));
        assert_eq!(reduce(AggregateFunction::Min, Arc::clone(&array)), Value::Bool(false));
        assert_eq!(reduce(AggregateFunction::All, Arc::clone(&array)), Value::Bool(false));
        assert_eq!(reduce(AggregateFunction::Any, array), Value::Bool(true));
    }

    #[test]
    fn test_count_distinct_coalesces_nan() {
        let array: ArrayRef = Arc::new(Float64Array::from(vec![
            Some(f64::NAN),
            Some(f64::NAN),
            Some(1.0),
            None,
        ]));
        assert_eq!(reduce(AggregateFunction::CountDistinct, array), Value::Int64(2));
    }

    #[test]
    fn test_first_last_skip_nulls() {
        let array: ArrayRef = Arc::new(Int8Array::from(vec![None, Some(2), Some(3), None]));
        assert_eq!(reduce(AggregateFunction::First, Arc::clone(&array)), Value::Int64(2));
        assert_eq!(reduce(AggregateFunction::Last, array), Value::Int64(3));
    }

    #[test]
    fn test_product_overflow_is_error() {
        let array: ArrayRef = Arc::new(Int64Array::from(vec![i64::MAX, 2]));
        let result = AggregateFunction::Product.reduce(&array, &AggregateOptions::default());
        assert!(matches!(result, Err(FrameError::ComputeError(_))));
    }

    #[test]
    fn test_unsupported_input_type() {
        let array: ArrayRef = Arc::new(StringArray::from(vec!["a"]));
        let result = AggregateFunction::Sum.reduce(&array, &AggregateOptions::default());
        assert!(matches!(result, Err(FrameError::VectorArgumentError(_))));
    }

    #[test]
    fn test_min_max_is_not_a_scalar() {
        let array: ArrayRef = Arc::new(Int8Array::from(vec![1]));
        let result = AggregateFunction::MinMax.reduce(&array, &AggregateOptions::default());
        assert!(result.unwrap_err().is_argument_error());
    }

    #[test]
    fn test_selected_cell_keeps_time_zone() {
        let array: ArrayRef = Arc::new(
            TimestampMicrosecondArray::from(vec![2_000_000, 1_000_000]).with_timezone("+09:00"),
        );
        let options = AggregateOptions::default();
        let min = AggregateFunction::Min.reduce_to_array(&array, &options).unwrap();
        assert_eq!(min.data_type(), array.data_type());
        assert_eq!(min.as_primitive::<TimestampMicrosecondType>().value(0), 1_000_000);
        let first = AggregateFunction::First.reduce_to_array(&array, &options).unwrap();
        assert_eq!(first.as_primitive::<TimestampMicrosecondType>().value(0), 2_000_000);
    }

    #[test]
    fn test_selected_cell_keeps_sub_unit_precision() {
        let options = AggregateOptions::default();
        let nanos: ArrayRef = Arc::new(TimestampNanosecondArray::from(vec![1_500, 2_500, 999]));
        let max = AggregateFunction::Max.reduce_to_array(&nanos, &options).unwrap();
        assert_eq!(max.as_primitive::<TimestampNanosecondType>().value(0), 2_500);
        let min = AggregateFunction::Min.reduce_to_array(&nanos, &options).unwrap();
        assert_eq!(min.as_primitive::<TimestampNanosecondType>().value(0), 999);

        let dates: ArrayRef = Arc::new(Date64Array::from(vec![90_000_000, 5]));
        let max = AggregateFunction::Max.reduce_to_array(&dates, &options).unwrap();
        assert_eq!(max.as_primitive::<Date64Type>().value(0), 90_000_000);
    }

    #[test]
    fn test_reduce_to_array_types() {
        let options = AggregateOptions::default();
        let array: ArrayRef = Arc::new(Int8Array::from(vec![Some(3), None, Some(-4)]));
        let sum = AggregateFunction::Sum.reduce_to_array(&array, &options).unwrap();
        assert_eq!(sum.data_type(), &DataType::Int64);
        assert_eq!(sum.as_primitive::<Int64Type>().value(0), -1);
        let min = AggregateFunction::Min.reduce_to_array(&array, &options).unwrap();
        assert_eq!(min.as_primitive::<Int8Type>().value(0), -4);

        let empty: ArrayRef = Arc::new(Int8Array::from(vec![None, None]));
        let max = AggregateFunction::Max.reduce_to_array(&empty, &options).unwrap();
        assert_eq!(max.data_type(), &DataType::Int8);
        assert_eq!(max.len(), 1);
        assert!(max.is_null(0));
    }

    #[test]
    fn test_from_name() {
        assert_eq!(AggregateFunction::from_name("sum"), Some(AggregateFunction::Sum));
        assert_eq!(
            AggregateFunction::from_name("count_uniq"),
            Some(AggregateFunction::CountDistinct)
        );
        assert_eq!(AggregateFunction::from_name("abs"), None);
    }
}
