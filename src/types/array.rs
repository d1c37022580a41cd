//! Conversions between Arrow arrays and scalar [`Value`]s.
//!
//! Construction from raw values infers the narrowest element type that holds
//! every value: non-negative integers become the smallest unsigned type,
//! integers with a negative member the smallest signed type.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Date32Array, Date64Array, Float64Array, Int64Array,
    NullArray, StringArray, TimestampMicrosecondArray, UInt64Array,
};
use arrow::compute::{cast_with_options, CastOptions};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
    Int8Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};

use crate::error::{FrameError, Result};
use crate::types::class::{signed_of_width, unsigned_of_width, TypeClass};
use crate::types::Value;

const MICROS_PER_DAY: i64 = 86_400_000_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Reads the cell at `index` as a [`Value`].
///
/// # Errors
///
/// Returns an error if `index` is out of bounds or the element type has no
/// scalar representation.
pub fn value_at(array: &dyn Array, index: usize) -> Result<Value> {
    if index >= array.len() {
        return Err(FrameError::vector_argument(format!(
            "index {index} out of bounds for length {}",
            array.len()
        )));
    }
    if array.is_null(index) {
        return Ok(Value::Null);
    }
    let value = match array.data_type() {
        DataType::Boolean => Value::Bool(array.as_boolean().value(index)),
        DataType::Int8 => Value::Int64(i64::from(array.as_primitive::<Int8Type>().value(index))),
        DataType::Int16 => Value::Int64(i64::from(array.as_primitive::<Int16Type>().value(index))),
        DataType::Int32 => Value::Int64(i64::from(array.as_primitive::<Int32Type>().value(index))),
        DataType::Int64 => Value::Int64(array.as_primitive::<Int64Type>().value(index)),
        DataType::UInt8 => {
            Value::UInt64(u64::from(array.as_primitive::<UInt8Type>().value(index)))
        }
        DataType::UInt16 => {
            Value::UInt64(u64::from(array.as_primitive::<UInt16Type>().value(index)))
        }
        DataType::UInt32 => {
            Value::UInt64(u64::from(array.as_primitive::<UInt32Type>().value(index)))
        }
        DataType::UInt64 => Value::UInt64(array.as_primitive::<UInt64Type>().value(index)),
        DataType::Float32 => {
            Value::Float64(f64::from(array.as_primitive::<Float32Type>().value(index)))
        }
        DataType::Float64 => Value::Float64(array.as_primitive::<Float64Type>().value(index)),
        DataType::Utf8 => Value::String(array.as_string::<i32>().value(index).to_string()),
        DataType::LargeUtf8 => Value::String(array.as_string::<i64>().value(index).to_string()),
        DataType::Date32 => Value::Date(array.as_primitive::<Date32Type>().value(index)),
        DataType::Date64 => {
            let millis = array.as_primitive::<Date64Type>().value(index);
            Value::Date(millis.div_euclid(MILLIS_PER_DAY) as i32)
        }
        DataType::Timestamp(unit, _) => Value::Timestamp(match unit {
            TimeUnit::Second => array
                .as_primitive::<TimestampSecondType>()
                .value(index)
                .saturating_mul(1_000_000),
            TimeUnit::Millisecond => array
                .as_primitive::<TimestampMillisecondType>()
                .value(index)
                .saturating_mul(1_000),
            TimeUnit::Microsecond => array.as_primitive::<TimestampMicrosecondType>().value(index),
            TimeUnit::Nanosecond => {
                array.as_primitive::<TimestampNanosecondType>().value(index) / 1_000
            }
        }),
        DataType::Null => Value::Null,
        other => {
            return Err(FrameError::type_error(
                "scalar-representable element type",
                other.to_string(),
            ))
        }
    };
    Ok(value)
}

/// Number of null cells, counting every cell of a `Null`-typed array.
#[must_use]
pub fn null_count(array: &dyn Array) -> usize {
    if array.data_type() == &DataType::Null {
        array.len()
    } else {
        array.null_count()
    }
}

/// Reads every cell of `array` as a [`Value`].
///
/// # Errors
///
/// Returns an error if the element type has no scalar representation.
pub fn array_to_values(array: &dyn Array) -> Result<Vec<Value>> {
    (0..array.len()).map(|i| value_at(array, i)).collect()
}

/// Infers the narrowest element type able to hold every value.
///
/// An empty or all-null sequence infers [`DataType::Null`].
///
/// # Errors
///
/// Returns [`FrameError::TypeError`] when values of incompatible kinds are
/// mixed.
pub fn infer_data_type(values: &[Value]) -> Result<DataType> {
    let mut seen: Option<&'static str> = None;
    let mut has_float = false;
    let mut min_int: i128 = 0;
    let mut max_int: i128 = 0;

    for value in values {
        let family = match value {
            Value::Null => continue,
            Value::Int64(i) => {
                min_int = min_int.min(i128::from(*i));
                max_int = max_int.max(i128::from(*i));
                "numeric"
            }
            Value::UInt64(u) => {
                max_int = max_int.max(i128::from(*u));
                "numeric"
            }
            Value::Float64(_) => {
                has_float = true;
                "numeric"
            }
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Date(_) => "date32",
            Value::Timestamp(_) => "timestamp",
        };
        match seen {
            None => seen = Some(family),
            Some(previous) if previous == family => {}
            Some(previous) => return Err(FrameError::type_error(previous, value.kind())),
        }
    }

    let data_type = match seen {
        None => DataType::Null,
        Some("numeric") if has_float => DataType::Float64,
        Some("numeric") => integer_type_for_range(min_int, max_int)?,
        Some("boolean") => DataType::Boolean,
        Some("string") => DataType::Utf8,
        Some("date32") => DataType::Date32,
        Some(_) => DataType::Timestamp(TimeUnit::Microsecond, None),
    };
    Ok(data_type)
}

/// Narrowest integer type spanning `min..=max`.
fn integer_type_for_range(min: i128, max: i128) -> Result<DataType> {
    if min >= 0 {
        let bits = match max {
            m if m <= i128::from(u8::MAX) => 8,
            m if m <= i128::from(u16::MAX) => 16,
            m if m <= i128::from(u32::MAX) => 32,
            _ => 64,
        };
        return Ok(unsigned_of_width(bits));
    }
    if max > i128::from(i64::MAX) {
        return Err(FrameError::type_error(
            "integers representable in int64",
            format!("range {min}..={max}"),
        ));
    }
    let fits = |lo: i128, hi: i128| min >= lo && max <= hi;
    let bits = if fits(i128::from(i8::MIN), i128::from(i8::MAX)) {
        8
    } else if fits(i128::from(i16::MIN), i128::from(i16::MAX)) {
        16
    } else if fits(i128::from(i32::MIN), i128::from(i32::MAX)) {
        32
    } else {
        64
    };
    Ok(signed_of_width(bits))
}

/// Builds an array from values, inferring the element type when
/// `data_type` is None.
///
/// # Errors
///
/// Returns [`FrameError::TypeError`] if a value cannot be represented in the
/// (inferred or requested) element type.
pub fn array_from_values(values: &[Value], data_type: Option<&DataType>) -> Result<ArrayRef> {
    let data_type = match data_type {
        Some(dt) => dt.clone(),
        None => infer_data_type(values)?,
    };

    let mismatch = |v: &Value| FrameError::type_error(data_type.to_string(), v.kind());

    let class = TypeClass::of(&data_type);
    let canonical: ArrayRef = if class.is_boolean() {
        let cells = values
            .iter()
            .map(|v| match v {
                Value::Bool(b) => Ok(Some(*b)),
                Value::Null => Ok(None),
                other => Err(mismatch(other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Arc::new(BooleanArray::from(cells))
    } else if class.is_signed_integer() {
        let cells = values
            .iter()
            .map(|v| match v {
                Value::Null => Ok(None),
                other => other.as_int64().map(Some).ok_or_else(|| mismatch(other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Arc::new(Int64Array::from(cells))
    } else if class.is_unsigned_integer() {
        let cells = values
            .iter()
            .map(|v| match v {
                Value::Null => Ok(None),
                other => other.as_uint64().map(Some).ok_or_else(|| mismatch(other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Arc::new(UInt64Array::from(cells))
    } else if class.is_float() {
        let cells = values
            .iter()
            .map(|v| match v {
                Value::Null => Ok(None),
                other => other.as_float64().map(Some).ok_or_else(|| mismatch(other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Arc::new(Float64Array::from(cells))
    } else if class.is_string() {
        let cells = values
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(Some(s.as_str())),
                Value::Null => Ok(None),
                other => Err(mismatch(other)),
            })
            .collect::<Result<Vec<_>>>()?;
        Arc::new(StringArray::from(cells))
    } else {
        match &data_type {
            DataType::Date32 => {
                let cells = values
                    .iter()
                    .map(|v| match v {
                        Value::Date(d) => Ok(Some(*d)),
                        Value::Null => Ok(None),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Arc::new(Date32Array::from(cells))
            }
            DataType::Date64 => {
                let cells = values
                    .iter()
                    .map(|v| match v {
                        Value::Date(d) => Ok(Some(i64::from(*d) * MILLIS_PER_DAY)),
                        Value::Null => Ok(None),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Arc::new(Date64Array::from(cells))
            }
            DataType::Timestamp(_, tz) => {
                let cells = values
                    .iter()
                    .map(|v| match v {
                        Value::Timestamp(t) => Ok(Some(*t)),
                        Value::Date(d) => Ok(Some(i64::from(*d) * MICROS_PER_DAY)),
                        Value::Null => Ok(None),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                // Same zone as the target, so the cast only rescales the unit.
                Arc::new(TimestampMicrosecondArray::from(cells).with_timezone_opt(tz.clone()))
            }
            DataType::Null => {
                if let Some(other) = values.iter().find(|v| !v.is_null()) {
                    return Err(mismatch(other));
                }
                Arc::new(NullArray::new(values.len()))
            }
            other => {
                return Err(FrameError::type_error(
                    "constructible element type",
                    other.to_string(),
                ))
            }
        }
    };

    cast_strict(&canonical, &data_type)
}

/// Casts `array` to `data_type`, failing instead of producing nulls when a
/// value does not fit.
///
/// # Errors
///
/// Returns [`FrameError::TypeError`] if the cast is unsupported or lossy.
pub fn cast_strict(array: &ArrayRef, data_type: &DataType) -> Result<ArrayRef> {
    if array.data_type() == data_type {
        return Ok(Arc::clone(array));
    }
    let options = CastOptions {
        safe: false,
        ..CastOptions::default()
    };
    cast_with_options(array, data_type, &options).map_err(|e| {
        FrameError::type_error(data_type.to_string(), format!("{}: {e}", array.data_type()))
    })
}
