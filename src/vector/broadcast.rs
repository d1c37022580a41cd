//! Broadcasting and coercion: propagate, resolve, coerce, cast.

use arrow::array::UInt32Array;
use arrow::compute::{cast_with_options, take, CastOptions};
use arrow::datatypes::DataType;

use crate::compute::{AggregateFunction, AggregateOptions, Function};
use crate::error::{FrameError, Result};
use crate::types::{array_from_values, Value};
use crate::vector::{Operand, Vector};

impl Vector {
    /// Replaces every element with the result of the aggregate `function`.
    ///
    /// ```
    /// # use colframe::{Value, Vector};
    /// let v = Vector::from(vec![1i64, 2, 3, 4]);
    /// let mean = v.propagate("mean").unwrap();
    /// assert_eq!(mean.to_values().unwrap(), vec![Value::Float64(2.5); 4]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] if `function` is unknown or
    /// not an aggregate.
    pub fn propagate(&self, function: &str) -> Result<Vector> {
        self.propagate_by(Some(function), None::<fn(&Vector) -> Result<Value>>)
    }

    /// Replaces every element with the scalar `block` computes from the
    /// whole vector.
    ///
    /// # Errors
    ///
    /// Returns the block's error, or a type error if its result cannot be
    /// stored in an array.
    pub fn propagate_with<F>(&self, block: F) -> Result<Vector>
    where
        F: FnOnce(&Vector) -> Result<Value>,
    {
        self.propagate_by(None, Some(block))
    }

    /// Core of [`Vector::propagate`] and [`Vector::propagate_with`]: exactly
    /// one of `function` and `block` must be given.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] if both or neither are
    /// given, or if `function` is not an aggregate.
    pub fn propagate_by<F>(&self, function: Option<&str>, block: Option<F>) -> Result<Vector>
    where
        F: FnOnce(&Vector) -> Result<Value>,
    {
        match (function, block) {
            (Some(_), Some(_)) => Err(FrameError::vector_argument(
                "propagate takes a function name or a block, not both",
            )),
            (None, None) => Err(FrameError::vector_argument(
                "propagate needs a function name or a block",
            )),
            (Some(name), None) => {
                let function = match Function::parse(name) {
                    Some(Function::Aggregate(f)) if f != AggregateFunction::MinMax => f,
                    _ => {
                        return Err(FrameError::vector_argument(format!(
                            "{name} is not an aggregate function"
                        )))
                    }
                };
                let cell = function.reduce_to_array(self.data(), &AggregateOptions::default())?;
                let indices = UInt32Array::from(vec![0u32; self.size()]);
                Ok(Vector::new(take(&cell, &indices, None)?))
            }
            (None, Some(block)) => {
                let scalar = block(self)?;
                self.repeat(&scalar)
            }
        }
    }

    /// Reinterprets `other` with this vector's element type.
    ///
    /// A scalar is broadcast to this vector's length first. Strings are
    /// parsed into numbers and numbers rendered as strings as needed.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] if the lengths differ or a
    /// value cannot be converted.
    pub fn resolve(&self, other: impl Into<Operand>) -> Result<Vector> {
        let array = other.into().into_array(self.size())?;
        let options = CastOptions {
            safe: false,
            ..Default::default()
        };
        let resolved = cast_with_options(&array, self.data_type(), &options).map_err(|e| {
            FrameError::vector_argument(format!(
                "cannot resolve {} as {}: {e}",
                array.data_type(),
                self.data_type()
            ))
        })?;
        Ok(Vector::new(resolved))
    }

    /// Pairs a scalar with this vector for a binary operation: returns
    /// `(other broadcast to this length, self)`.
    ///
    /// # Errors
    ///
    /// Returns a type error if `other` cannot be stored in an array.
    pub fn coerce(&self, other: impl Into<Value>) -> Result<(Vector, Vector)> {
        let other = other.into();
        Ok((self.repeat(&other)?, self.clone()))
    }

    /// Converts the elements to `data_type`, failing on lossy conversions.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TypeError`] if a value does not fit.
    pub fn cast(&self, data_type: &DataType) -> Result<Vector> {
        let cast = crate::types::cast_strict(self.data(), data_type)?;
        Ok(self.rewrap(cast))
    }

    fn repeat(&self, value: &Value) -> Result<Vector> {
        let values = vec![value.clone(); self.size()];
        Ok(Vector::new(array_from_values(&values, None)?))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{ArrayRef, AsArray, TimestampMicrosecondArray};
    use arrow::datatypes::TimestampMicrosecondType;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_propagate_by_name() {
        let v = Vector::from(vec![1i64, 2, 3, 4]);
        let sums = v.propagate("sum").unwrap();
        assert_eq!(sums.data_type(), &DataType::Int64);
        assert_eq!(sums.to_values().unwrap(), vec![Value::Int64(10); 4]);
    }

    #[test]
    fn test_propagate_keeps_zoned_timestamps() {
        let stamps: ArrayRef = Arc::new(
            TimestampMicrosecondArray::from(vec![1_000_000, 2_000_000]).with_timezone("+09:00"),
        );
        let v = Vector::new(Arc::clone(&stamps));
        for (name, expected) in [("first", 1_000_000_i64), ("max", 2_000_000)] {
            let out = v.propagate(name).unwrap();
            assert_eq!(out.data_type(), stamps.data_type());
            assert_eq!(
                out.data().as_primitive::<TimestampMicrosecondType>().values().to_vec(),
                vec![expected; 2]
            );
        }
    }

    #[test]
    fn test_propagate_all_null_and_empty() {
        let nulls = Vector::from(vec![None::<i64>, None]);
        assert_eq!(nulls.propagate("min").unwrap().to_values().unwrap(), vec![Value::Null; 2]);
        let empty = Vector::from(Vec::<f64>::new());
        assert_eq!(empty.propagate("sum").unwrap().size(), 0);
    }

    #[test]
    fn test_propagate_with_block() {
        let v = Vector::from(vec![1i64, 2, 3]);
        let out = v.propagate_with(|v| Ok(Value::from(v.size() as i64))).unwrap();
        assert_eq!(out.to_values().unwrap(), vec![Value::UInt64(3); 3]);
    }

    #[test]
    fn test_propagate_rejects_bad_arguments() {
        let v = Vector::from(vec![1i64, 2]);
        let err = v.propagate("abs").unwrap_err();
        assert!(matches!(err, FrameError::VectorArgumentError(_)));
        assert!(v.propagate("min_max").is_err());
        let both = v.propagate_by(Some("sum"), Some(|v: &Vector| v.sum()));
        assert!(matches!(both, Err(FrameError::VectorArgumentError(_))));
        let neither = v.propagate_by(None, None::<fn(&Vector) -> Result<Value>>);
        assert!(neither.is_err());
    }

    #[test]
    fn test_resolve_parses_strings() {
        let v = Vector::from(vec![1i64, 2]);
        let resolved = v.resolve(Vector::from(vec!["3", "4"])).unwrap();
        assert_eq!(resolved.to_values().unwrap(), vec![Value::Int64(3), Value::Int64(4)]);
        assert!(v.resolve(Vector::from(vec!["x", "4"])).is_err());
        assert!(v.resolve(Vector::from(vec!["1"])).is_err());
    }

    #[test]
    fn test_coerce_broadcasts_scalar() {
        let v = Vector::from(vec![1.5, 2.5]);
        let (other, this) = v.coerce(2.0).unwrap();
        assert_eq!(other.to_values().unwrap(), vec![Value::Float64(2.0); 2]);
        assert_eq!(this, v);
    }

    #[test]
    fn test_cast_is_strict() {
        let v = Vector::from(vec![1i64, 300]);
        assert!(v.cast(&DataType::UInt8).is_err());
        assert_eq!(v.cast(&DataType::UInt16).unwrap().data_type(), &DataType::UInt16);
    }
}
