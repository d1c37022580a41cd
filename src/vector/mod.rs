//! `Vector`: one column of values backed by an Arrow array.

mod broadcast;
mod counting;
mod function;

use std::fmt;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, Int8Array, StringArray, UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::compute::{filter, take};
use arrow::datatypes::DataType;

use crate::error::{FrameError, Result};
use crate::types::{array_from_values, array_to_values, null_count, value_at, TypeClass, Value};

pub use function::Computed;

/// One column of values.
///
/// A vector drawn from a [`DataFrame`](crate::DataFrame) carries the column
/// name as its key; a headless vector (for example a filter mask) has none.
/// Vectors are immutable: every operation returns a new vector.
#[derive(Debug, Clone)]
pub struct Vector {
    data: ArrayRef,
    key: Option<String>,
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.data.as_ref() == other.data.as_ref()
    }
}

impl Vector {
    /// Wraps an Arrow array as a headless vector.
    #[must_use]
    pub fn new(data: ArrayRef) -> Self {
        Vector { data, key: None }
    }

    /// Builds a vector from scalar values, inferring the narrowest type.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TypeError`] if the values mix incompatible kinds.
    pub fn from_values(values: &[Value]) -> Result<Self> {
        Ok(Vector::new(array_from_values(values, None)?))
    }

    /// Builds a vector of `len` copies of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TypeError`] if `value` has no array
    /// representation.
    pub fn from_value(value: &Value, len: usize) -> Result<Self> {
        Vector::from_values(&vec![value.clone(); len])
    }

    /// Builds a vector from values with an explicit element type.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TypeError`] if a value does not fit `data_type`.
    pub fn from_values_as(values: &[Value], data_type: &DataType) -> Result<Self> {
        Ok(Vector::new(array_from_values(values, Some(data_type))?))
    }

    /// Returns this vector tagged with a column key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Column key, if the vector belongs to a data frame.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The backing array.
    #[must_use]
    pub fn data(&self) -> &ArrayRef {
        &self.data
    }

    /// Consumes the vector, returning the backing array.
    #[must_use]
    pub fn into_data(self) -> ArrayRef {
        self.data
    }

    /// Number of elements.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Alias for [`Vector::size`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element type.
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        self.data.data_type()
    }

    /// Type family of the element type.
    #[must_use]
    pub fn type_class(&self) -> TypeClass {
        TypeClass::of(self.data_type())
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.type_class().is_numeric()
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.type_class().is_integer()
    }

    #[must_use]
    pub fn is_float(&self) -> bool {
        self.type_class().is_float()
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        self.type_class().is_string()
    }

    #[must_use]
    pub fn is_boolean(&self) -> bool {
        self.type_class().is_boolean()
    }

    #[must_use]
    pub fn is_temporal(&self) -> bool {
        self.type_class().is_temporal()
    }

    /// Value at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Result<Value> {
        value_at(&self.data, index)
    }

    /// All values in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the element type has no scalar representation.
    pub fn to_values(&self) -> Result<Vec<Value>> {
        array_to_values(&self.data)
    }

    /// Number of nulls.
    #[must_use]
    pub fn n_nulls(&self) -> usize {
        null_count(&self.data)
    }

    /// Number of NaN values; zero for non-float vectors.
    #[must_use]
    pub fn n_nans(&self) -> usize {
        match self.data_type() {
            DataType::Float64 => self
                .data
                .as_primitive::<arrow::datatypes::Float64Type>()
                .iter()
                .flatten()
                .filter(|v| v.is_nan())
                .count(),
            DataType::Float32 => self
                .data
                .as_primitive::<arrow::datatypes::Float32Type>()
                .iter()
                .flatten()
                .filter(|v| v.is_nan())
                .count(),
            _ => 0,
        }
    }

    /// Returns true if any element is null.
    #[must_use]
    pub fn has_nil(&self) -> bool {
        self.n_nulls() > 0
    }

    /// Boolean view of the values; fails for non-boolean vectors.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] if the vector is not boolean.
    pub fn as_mask(&self) -> Result<&BooleanArray> {
        self.data.as_boolean_opt().ok_or_else(|| {
            FrameError::vector_argument(format!(
                "expected a boolean vector, got {}",
                self.data_type()
            ))
        })
    }

    /// Elements where `mask` is true; null mask entries drop the element.
    ///
    /// # Errors
    ///
    /// Returns an error if `mask` is not boolean or its length differs.
    pub fn filter(&self, mask: &Vector) -> Result<Vector> {
        if mask.size() != self.size() {
            return Err(FrameError::vector_argument(format!(
                "mask length {} does not match vector length {}",
                mask.size(),
                self.size()
            )));
        }
        let filtered = filter(&self.data, mask.as_mask()?)?;
        Ok(self.rewrap(filtered))
    }

    /// Elements at `indices`, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of bounds.
    pub fn take(&self, indices: &[u32]) -> Result<Vector> {
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= self.size()) {
            return Err(FrameError::vector_argument(format!(
                "index {bad} out of bounds for length {}",
                self.size()
            )));
        }
        let indices = UInt32Array::from(indices.to_vec());
        let taken = take(&self.data, &indices, None)?;
        Ok(self.rewrap(taken))
    }

    /// Wraps `data` keeping this vector's key.
    fn rewrap(&self, data: ArrayRef) -> Vector {
        Vector {
            data,
            key: self.key.clone(),
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self.to_values().map_err(|_| fmt::Error)?;
        let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", rendered.join(", "))
    }
}

impl From<ArrayRef> for Vector {
    fn from(data: ArrayRef) -> Self {
        Vector::new(data)
    }
}

macro_rules! impl_from_native {
    ($($native:ty => $array:ty),* $(,)?) => {
        $(
            impl From<Vec<$native>> for Vector {
                fn from(values: Vec<$native>) -> Self {
                    Vector::new(Arc::new(<$array>::from(values)))
                }
            }

            impl From<Vec<Option<$native>>> for Vector {
                fn from(values: Vec<Option<$native>>) -> Self {
                    Vector::new(Arc::new(<$array>::from(values)))
                }
            }
        )*
    };
}

impl_from_native!(
    i8 => Int8Array,
    i16 => Int16Array,
    i32 => Int32Array,
    i64 => Int64Array,
    u8 => UInt8Array,
    u16 => UInt16Array,
    u32 => UInt32Array,
    u64 => UInt64Array,
    f32 => Float32Array,
    f64 => Float64Array,
    bool => BooleanArray,
    &str => StringArray,
    String => StringArray,
);

/// An operand accepted by element-wise functions and coercions.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Another vector.
    Vector(Vector),
    /// A raw Arrow array.
    Array(ArrayRef),
    /// A raw value sequence, type inferred.
    Values(Vec<Value>),
    /// A scalar, broadcast to the other operand's length.
    Scalar(Value),
}

impl Operand {
    /// Materialises the operand as an array of length `len`.
    ///
    /// # Errors
    ///
    /// Returns an error if a sequence operand has a different length or its
    /// values cannot be built into an array.
    pub fn into_array(self, len: usize) -> Result<ArrayRef> {
        let array = match self {
            Operand::Vector(v) => v.into_data(),
            Operand::Array(a) => a,
            Operand::Values(values) => array_from_values(&values, None)?,
            Operand::Scalar(value) => return array_from_values(&vec![value; len], None),
        };
        if array.len() != len {
            return Err(FrameError::vector_argument(format!(
                "operand length {} does not match vector length {len}",
                array.len()
            )));
        }
        Ok(array)
    }
}

impl From<Vector> for Operand {
    fn from(v: Vector) -> Self {
        Operand::Vector(v)
    }
}

impl From<&Vector> for Operand {
    fn from(v: &Vector) -> Self {
        Operand::Vector(v.clone())
    }
}

impl From<ArrayRef> for Operand {
    fn from(a: ArrayRef) -> Self {
        Operand::Array(a)
    }
}

impl From<Vec<Value>> for Operand {
    fn from(values: Vec<Value>) -> Self {
        Operand::Values(values)
    }
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Scalar(value)
    }
}

macro_rules! impl_operand_from_scalar {
    ($($t:ty),*) => {
        $(impl From<$t> for Operand {
            fn from(v: $t) -> Self {
                Operand::Scalar(Value::from(v))
            }
        })*
    };
}

impl_operand_from_scalar!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_from_values_infers_minimal_width() {
        let v = Vector::from_values(&[Value::Int64(1), Value::Int64(2), Value::Int64(3)]).unwrap();
        assert_eq!(v.data_type(), &DataType::UInt8);
        assert_eq!(v.size(), 3);
        assert!(v.key().is_none());
    }

    #[test]
    fn test_nulls_and_nans() {
        let v = Vector::from(vec![Some(1.0), Some(f64::NAN), None, Some(f64::NAN)]);
        assert_eq!(v.n_nulls(), 1);
        assert_eq!(v.n_nans(), 2);
        assert!(v.has_nil());
    }

    #[test]
    fn test_filter_and_take() {
        let v = Vector::from(vec![10i64, 20, 30]).with_key("x");
        let mask = Vector::from(vec![true, false, true]);
        let filtered = v.filter(&mask).unwrap();
        assert_eq!(filtered.to_values().unwrap(), vec![Value::Int64(10), Value::Int64(30)]);
        assert_eq!(filtered.key(), Some("x"));
        let taken = v.take(&[2, 0]).unwrap();
        assert_eq!(taken.to_values().unwrap(), vec![Value::Int64(30), Value::Int64(10)]);
        assert!(v.take(&[3]).is_err());
    }

    #[test]
    fn test_filter_rejects_bad_mask() {
        let v = Vector::from(vec![1i64, 2]);
        assert!(v.filter(&Vector::from(vec![true])).is_err());
        assert!(v.filter(&Vector::from(vec![1i64, 0])).is_err());
    }

    #[test]
    fn test_operand_scalar_broadcasts() {
        let array = Operand::from(7i64).into_array(3).unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array.data_type(), &DataType::UInt8);
    }

    #[test]
    fn test_equality_compares_values_and_key() {
        let a = Vector::from(vec![Some(1i64), None]);
        assert_eq!(a, Vector::from(vec![Some(1i64), None]));
        assert_ne!(a, Vector::from(vec![Some(2i64), None]));
        assert_ne!(a, a.clone().with_key("x"));
        assert_ne!(a, Vector::from(vec![Some(1i32), None]));
    }

    #[test]
    fn test_display() {
        let v = Vector::from(vec![Some(1i64), None]);
        assert_eq!(v.to_string(), "[1, nil]");
    }
}
