//! Type-class predicates over Arrow data types.

use arrow::datatypes::DataType;

/// Broad family of an Arrow [`DataType`], used by the engine to pick
/// aggregation widths and NaN handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Boolean,
    SignedInteger,
    UnsignedInteger,
    Float,
    String,
    Temporal,
    Null,
    Other,
}

impl TypeClass {
    /// Classifies `data_type`.
    #[must_use]
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => TypeClass::Boolean,
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
                TypeClass::SignedInteger
            }
            DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
                TypeClass::UnsignedInteger
            }
            DataType::Float16 | DataType::Float32 | DataType::Float64 => TypeClass::Float,
            DataType::Utf8 | DataType::LargeUtf8 => TypeClass::String,
            DataType::Date32
            | DataType::Date64
            | DataType::Time32(_)
            | DataType::Time64(_)
            | DataType::Timestamp(_, _) => TypeClass::Temporal,
            DataType::Null => TypeClass::Null,
            _ => TypeClass::Other,
        }
    }

    /// Integer or floating point.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self == TypeClass::Float
    }

    /// Any integer width, signed or unsigned.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(self, TypeClass::SignedInteger | TypeClass::UnsignedInteger)
    }

    #[must_use]
    pub fn is_signed_integer(self) -> bool {
        self == TypeClass::SignedInteger
    }

    #[must_use]
    pub fn is_unsigned_integer(self) -> bool {
        self == TypeClass::UnsignedInteger
    }

    #[must_use]
    pub fn is_float(self) -> bool {
        self == TypeClass::Float
    }

    #[must_use]
    pub fn is_string(self) -> bool {
        self == TypeClass::String
    }

    #[must_use]
    pub fn is_boolean(self) -> bool {
        self == TypeClass::Boolean
    }

    /// Date, time or timestamp.
    #[must_use]
    pub fn is_temporal(self) -> bool {
        self == TypeClass::Temporal
    }
}

/// Bit width of an integer type, or None for non-integers.
#[must_use]
pub fn integer_width(data_type: &DataType) -> Option<u8> {
    match data_type {
        DataType::Int8 | DataType::UInt8 => Some(8),
        DataType::Int16 | DataType::UInt16 => Some(16),
        DataType::Int32 | DataType::UInt32 => Some(32),
        DataType::Int64 | DataType::UInt64 => Some(64),
        _ => None,
    }
}

/// Signed integer type of the given bit width.
#[must_use]
pub fn signed_of_width(bits: u8) -> DataType {
    match bits {
        0..=8 => DataType::Int8,
        9..=16 => DataType::Int16,
        17..=32 => DataType::Int32,
        _ => DataType::Int64,
    }
}

/// Unsigned integer type of the given bit width.
#[must_use]
pub fn unsigned_of_width(bits: u8) -> DataType {
    match bits {
        0..=8 => DataType::UInt8,
        9..=16 => DataType::UInt16,
        17..=32 => DataType::UInt32,
        _ => DataType::UInt64,
    }
}

/// Common type two numeric operands are promoted to before a binary kernel.
///
/// Any float promotes to `Float64`. Mixed signedness promotes to the next
/// wider signed type (`Float64` once 64 bits are exceeded). Otherwise the
/// wider of the two integer types wins.
#[must_use]
pub fn common_numeric_type(left: &DataType, right: &DataType) -> Option<DataType> {
    let (lc, rc) = (TypeClass::of(left), TypeClass::of(right));
    if !lc.is_numeric() || !rc.is_numeric() {
        return None;
    }
    if left == right {
        return Some(left.clone());
    }
    if lc.is_float() || rc.is_float() {
        return Some(DataType::Float64);
    }
    let lw = integer_width(left)?;
    let rw = integer_width(right)?;
    let common = match (lc.is_signed_integer(), rc.is_signed_integer()) {
        (true, true) => signed_of_width(lw.max(rw)),
        (false, false) => unsigned_of_width(lw.max(rw)),
        (true, false) => {
            if rw >= lw {
                if rw == 64 {
                    DataType::Float64
                } else {
                    signed_of_width(rw * 2)
                }
            } else {
                signed_of_width(lw)
            }
        }
        (false, true) => return common_numeric_type(right, left),
    };
    Some(common)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_classes() {
        assert!(TypeClass::of(&DataType::UInt8).is_numeric());
        assert!(TypeClass::of(&DataType::UInt8).is_unsigned_integer());
        assert!(!TypeClass::of(&DataType::UInt8).is_signed_integer());
        assert!(TypeClass::of(&DataType::Float32).is_float());
        assert!(TypeClass::of(&DataType::Utf8).is_string());
        assert!(TypeClass::of(&DataType::Date32).is_temporal());
        assert!(!TypeClass::of(&DataType::Boolean).is_numeric());
        assert_eq!(TypeClass::of(&DataType::Null), TypeClass::Null);
    }

    #[test]
    fn test_common_numeric_type() {
        assert_eq!(
            common_numeric_type(&DataType::Int8, &DataType::Int32),
            Some(DataType::Int32)
        );
        assert_eq!(
            common_numeric_type(&DataType::UInt8, &DataType::Int8),
            Some(DataType::Int16)
        );
        assert_eq!(
            common_numeric_type(&DataType::Int32, &DataType::UInt8),
            Some(DataType::Int32)
        );
        assert_eq!(
            common_numeric_type(&DataType::UInt64, &DataType::Int64),
            Some(DataType::Float64)
        );
        assert_eq!(
            common_numeric_type(&DataType::UInt16, &DataType::Float32),
            Some(DataType::Float64)
        );
        assert_eq!(common_numeric_type(&DataType::Utf8, &DataType::Int8), None);
    }
}
