//! Scalar `Value` definitions for colframe.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Runtime scalar container for a single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed integer value (any signed width).
    Int64(i64),
    /// Unsigned integer value (any unsigned width).
    UInt64(u64),
    /// Floating point value (any float width).
    Float64(f64),
    /// UTF-8 string value.
    String(String),
    /// Date value (days since Unix epoch).
    Date(i32),
    /// Timestamp value (microseconds since Unix epoch).
    Timestamp(i64),
    /// Null value.
    Null,
}

impl Value {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this value is a floating point NaN.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Float64(f) if f.is_nan())
    }

    /// Attempts to extract an i64 value.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            Value::UInt64(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Attempts to extract a u64 value.
    #[must_use]
    pub fn as_uint64(&self) -> Option<u64> {
        match self {
            Value::UInt64(u) => Some(*u),
            Value::Int64(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// Attempts to extract an f64 value, widening integers.
    #[must_use]
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            Value::Int64(i) => Some(*i as f64),
            Value::UInt64(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Attempts to extract a bool value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract a calendar date.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(days) => {
                NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
            }
            _ => None,
        }
    }

    /// Attempts to extract a UTC timestamp.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(micros) => DateTime::from_timestamp_micros(*micros),
            _ => None,
        }
    }

    /// Short name of the value's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float64(_) => "float64",
            Value::String(_) => "string",
            Value::Date(_) => "date32",
            Value::Timestamp(_) => "timestamp",
            Value::Null => "null",
        }
    }

    /// Compares two values using SQL null semantics.
    ///
    /// Returns None if either value is null or types don't match. Signed and
    /// unsigned integers compare numerically.
    #[must_use]
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int64(a), Value::Int64(b)) | (Value::Timestamp(a), Value::Timestamp(b)) => {
                Some(a.cmp(b))
            }
            (Value::UInt64(a), Value::UInt64(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::UInt64(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Value::UInt64(a), Value::Int64(b)) => Some(i128::from(*a).cmp(&i128::from(*b))),
            (Value::Float64(a), Value::Float64(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            // Null or type mismatch
            _ => None,
        }
    }

    /// Returns the hashable key form of this value.
    #[must_use]
    pub fn to_key(&self) -> ValueKey {
        ValueKey::from(self)
    }
}

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::UInt64(u) => write!(f, "{u}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Date(_) => match self.as_date() {
                Some(date) => write!(f, "{date}"),
                None => write!(f, "<invalid date>"),
            },
            Value::Timestamp(_) => match self.as_timestamp() {
                Some(ts) => write!(f, "{ts}"),
                None => write!(f, "<invalid timestamp>"),
            },
            Value::Null => write!(f, "nil"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int64(i64::from(v))
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::UInt64(u64::from(v))
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float64(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Hashable, totally comparable form of a [`Value`].
///
/// Every NaN maps to the same key, so NaN matches NaN when grouping or
/// counting distinct values. Null is a key of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(OrderedFloat<f64>),
    String(String),
    Date(i32),
    Timestamp(i64),
    Null,
}

impl From<&Value> for ValueKey {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Int64(i) => ValueKey::Int(*i),
            Value::UInt64(u) => ValueKey::UInt(*u),
            // OrderedFloat treats every NaN bit pattern as equal.
            Value::Float64(f) => ValueKey::Float(OrderedFloat(*f)),
            Value::String(s) => ValueKey::String(s.clone()),
            Value::Date(d) => ValueKey::Date(*d),
            Value::Timestamp(t) => ValueKey::Timestamp(*t),
            Value::Null => ValueKey::Null,
        }
    }
}
