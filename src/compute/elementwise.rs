//! Element-wise functions over Arrow arrays.
//!
//! Every function here produces an array of the input length. Nulls
//! propagate positionally except in the null tests and the Kleene boolean
//! operators.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray};
use arrow::compute::kernels::arity::binary;
use arrow::compute::kernels::boolean::{and, and_kleene, not, or, or_kleene};
use arrow::compute::kernels::cmp::{eq, gt, gt_eq, lt, lt_eq, neq};
use arrow::compute::kernels::numeric::{add_wrapping, div, mul_wrapping, rem, sub_wrapping};
use arrow::compute::{is_not_null, is_null};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type,
    Int8Type, UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};

use crate::compute::primitive;
use crate::error::{FrameError, Result};
use crate::types::{cast_strict, common_numeric_type, TypeClass};

/// Functions of one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFunction {
    Abs,
    Negate,
    Invert,
    IsNull,
    IsValid,
    IsNan,
    IsFinite,
    Sqrt,
    Floor,
    Ceil,
    Round,
}

impl UnaryFunction {
    /// Every unary function.
    pub const ALL: [UnaryFunction; 11] = [
        UnaryFunction::Abs,
        UnaryFunction::Negate,
        UnaryFunction::Invert,
        UnaryFunction::IsNull,
        UnaryFunction::IsValid,
        UnaryFunction::IsNan,
        UnaryFunction::IsFinite,
        UnaryFunction::Sqrt,
        UnaryFunction::Floor,
        UnaryFunction::Ceil,
        UnaryFunction::Round,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            UnaryFunction::Abs => "abs",
            UnaryFunction::Negate => "negate",
            UnaryFunction::Invert => "invert",
            UnaryFunction::IsNull => "is_null",
            UnaryFunction::IsValid => "is_valid",
            UnaryFunction::IsNan => "is_nan",
            UnaryFunction::IsFinite => "is_finite",
            UnaryFunction::Sqrt => "sqrt",
            UnaryFunction::Floor => "floor",
            UnaryFunction::Ceil => "ceil",
            UnaryFunction::Round => "round",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Applies the function to `array`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] if the element type is not
    /// supported by the function.
    pub fn execute(self, array: &ArrayRef) -> Result<ArrayRef> {
        let class = TypeClass::of(array.data_type());
        let unsupported = || {
            FrameError::vector_argument(format!(
                "{} is not supported for {}",
                self.name(),
                array.data_type()
            ))
        };
        match self {
            UnaryFunction::IsNull => {
                if class == TypeClass::Null {
                    return Ok(Arc::new(BooleanArray::from(vec![true; array.len()])));
                }
                Ok(Arc::new(is_null(array)?))
            }
            UnaryFunction::IsValid => {
                if class == TypeClass::Null {
                    return Ok(Arc::new(BooleanArray::from(vec![false; array.len()])));
                }
                Ok(Arc::new(is_not_null(array)?))
            }
            UnaryFunction::Invert => {
                let bools = array.as_boolean_opt().ok_or_else(unsupported)?;
                Ok(Arc::new(not(bools)?))
            }
            UnaryFunction::Negate => negate(array).ok_or_else(unsupported)?,
            UnaryFunction::Abs => abs(array).ok_or_else(unsupported)?,
            UnaryFunction::IsNan | UnaryFunction::IsFinite => {
                if !class.is_numeric() {
                    return Err(unsupported());
                }
                let floats = cast_strict(array, &DataType::Float64)?;
                let test: fn(f64) -> bool = if self == UnaryFunction::IsNan {
                    f64::is_nan
                } else {
                    f64::is_finite
                };
                let result: BooleanArray = primitive::<Float64Type>(&floats)?
                    .iter()
                    .map(|v| v.map(test))
                    .collect();
                Ok(Arc::new(result))
            }
            UnaryFunction::Sqrt => {
                if !class.is_numeric() {
                    return Err(unsupported());
                }
                let floats = cast_strict(array, &DataType::Float64)?;
                map_primitive::<Float64Type>(&floats, f64::sqrt)
            }
            UnaryFunction::Floor | UnaryFunction::Ceil | UnaryFunction::Round => match class {
                TypeClass::SignedInteger | TypeClass::UnsignedInteger => Ok(Arc::clone(array)),
                TypeClass::Float => {
                    let floats = cast_strict(array, &DataType::Float64)?;
                    let op: fn(f64) -> f64 = match self {
                        UnaryFunction::Floor => f64::floor,
                        UnaryFunction::Ceil => f64::ceil,
                        _ => f64::round,
                    };
                    map_primitive::<Float64Type>(&floats, op)
                }
                _ => Err(unsupported()),
            },
        }
    }
}

/// Functions of two operands of equal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryFunction {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Xor,
    AndKleene,
    OrKleene,
}

impl BinaryFunction {
    /// Every binary function.
    pub const ALL: [BinaryFunction; 17] = [
        BinaryFunction::Add,
        BinaryFunction::Subtract,
        BinaryFunction::Multiply,
        BinaryFunction::Divide,
        BinaryFunction::Modulo,
        BinaryFunction::Power,
        BinaryFunction::Equal,
        BinaryFunction::NotEqual,
        BinaryFunction::Less,
        BinaryFunction::LessEqual,
        BinaryFunction::Greater,
        BinaryFunction::GreaterEqual,
        BinaryFunction::And,
        BinaryFunction::Or,
        BinaryFunction::Xor,
        BinaryFunction::AndKleene,
        BinaryFunction::OrKleene,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            BinaryFunction::Add => "add",
            BinaryFunction::Subtract => "subtract",
            BinaryFunction::Multiply => "multiply",
            BinaryFunction::Divide => "divide",
            BinaryFunction::Modulo => "modulo",
            BinaryFunction::Power => "power",
            BinaryFunction::Equal => "equal",
            BinaryFunction::NotEqual => "not_equal",
            BinaryFunction::Less => "less",
            BinaryFunction::LessEqual => "less_equal",
            BinaryFunction::Greater => "greater",
            BinaryFunction::GreaterEqual => "greater_equal",
            BinaryFunction::And => "and",
            BinaryFunction::Or => "or",
            BinaryFunction::Xor => "xor",
            BinaryFunction::AndKleene => "and_kleene",
            BinaryFunction::OrKleene => "or_kleene",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Applies the function to two arrays of equal length.
    ///
    /// # Errors
    ///
    /// Returns an error if the lengths differ, the operand types are not
    /// supported, or the kernel fails (integer overflow, division by zero).
    pub fn execute(self, left: &ArrayRef, right: &ArrayRef) -> Result<ArrayRef> {
        if left.len() != right.len() {
            return Err(FrameError::vector_argument(format!(
                "{}: operand lengths differ ({} vs {})",
                self.name(),
                left.len(),
                right.len()
            )));
        }
        match self {
            BinaryFunction::Add
            | BinaryFunction::Subtract
            | BinaryFunction::Multiply
            | BinaryFunction::Divide
            | BinaryFunction::Modulo
            | BinaryFunction::Power => self.arithmetic(left, right),
            BinaryFunction::Equal
            | BinaryFunction::NotEqual
            | BinaryFunction::Less
            | BinaryFunction::LessEqual
            | BinaryFunction::Greater
            | BinaryFunction::GreaterEqual => self.compare(left, right),
            BinaryFunction::And
            | BinaryFunction::Or
            | BinaryFunction::Xor
            | BinaryFunction::AndKleene
            | BinaryFunction::OrKleene => self.logical(left, right),
        }
    }

    fn unsupported(self, left: &ArrayRef, right: &ArrayRef) -> FrameError {
        FrameError::vector_argument(format!(
            "{} is not supported between {} and {}",
            self.name(),
            left.data_type(),
            right.data_type()
        ))
    }

    /// Performs arithmetic after promoting both operands to a common type.
    fn arithmetic(self, left: &ArrayRef, right: &ArrayRef) -> Result<ArrayRef> {
        let common = common_numeric_type(left.data_type(), right.data_type())
            .ok_or_else(|| self.unsupported(left, right))?;
        if self == BinaryFunction::Power {
            let l = cast_strict(left, &DataType::Float64)?;
            let r = cast_strict(right, &DataType::Float64)?;
            let result = binary::<_, _, _, Float64Type>(
                primitive::<Float64Type>(&l)?,
                primitive::<Float64Type>(&r)?,
                f64::powf,
            )?;
            return Ok(Arc::new(result));
        }
        let l = cast_strict(left, &common)?;
        let r = cast_strict(right, &common)?;
        // Integers wrap at the common width, like negation; only division
        // by zero fails.
        let result = match self {
            BinaryFunction::Add => add_wrapping(&l, &r),
            BinaryFunction::Subtract => sub_wrapping(&l, &r),
            BinaryFunction::Multiply => mul_wrapping(&l, &r),
            BinaryFunction::Divide => div(&l, &r),
            _ => rem(&l, &r),
        };
        result.map_err(|e| FrameError::ComputeError(format!("{}: {e}", self.name())))
    }

    /// Compares two arrays; numeric operands of different widths are promoted.
    fn compare(self, left: &ArrayRef, right: &ArrayRef) -> Result<ArrayRef> {
        let (l, r) = if left.data_type() == right.data_type() {
            (Arc::clone(left), Arc::clone(right))
        } else {
            let common = common_numeric_type(left.data_type(), right.data_type())
                .ok_or_else(|| self.unsupported(left, right))?;
            (cast_strict(left, &common)?, cast_strict(right, &common)?)
        };
        let result = match self {
            BinaryFunction::Equal => eq(&l, &r)?,
            BinaryFunction::NotEqual => neq(&l, &r)?,
            BinaryFunction::Less => lt(&l, &r)?,
            BinaryFunction::LessEqual => lt_eq(&l, &r)?,
            BinaryFunction::Greater => gt(&l, &r)?,
            _ => gt_eq(&l, &r)?,
        };
        Ok(Arc::new(result))
    }

    /// Evaluates a boolean combination.
    fn logical(self, left: &ArrayRef, right: &ArrayRef) -> Result<ArrayRef> {
        let (Some(l), Some(r)) = (left.as_boolean_opt(), right.as_boolean_opt()) else {
            return Err(self.unsupported(left, right));
        };
        let result = match self {
            BinaryFunction::And => and(l, r)?,
            BinaryFunction::Or => or(l, r)?,
            BinaryFunction::AndKleene => and_kleene(l, r)?,
            BinaryFunction::OrKleene => or_kleene(l, r)?,
            _ => neq(l, r)?,
        };
        Ok(Arc::new(result))
    }
}

fn map_primitive<T: ArrowPrimitiveType>(
    array: &ArrayRef,
    op: impl Fn(T::Native) -> T::Native,
) -> Result<ArrayRef> {
    let typed = primitive::<T>(array)?;
    Ok(Arc::new(typed.unary::<_, T>(op)))
}

/// Negation with fixed-width wraparound.
///
/// Unsigned inputs stay unsigned: `-1u8` is 255, not a signed -1.
fn negate(array: &ArrayRef) -> Option<Result<ArrayRef>> {
    let result = match array.data_type() {
        DataType::Int8 => map_primitive::<Int8Type>(array, i8::wrapping_neg),
        DataType::Int16 => map_primitive::<Int16Type>(array, i16::wrapping_neg),
        DataType::Int32 => map_primitive::<Int32Type>(array, i32::wrapping_neg),
        DataType::Int64 => map_primitive::<Int64Type>(array, i64::wrapping_neg),
        DataType::UInt8 => map_primitive::<UInt8Type>(array, u8::wrapping_neg),
        DataType::UInt16 => map_primitive::<UInt16Type>(array, u16::wrapping_neg),
        DataType::UInt32 => map_primitive::<UInt32Type>(array, u32::wrapping_neg),
        DataType::UInt64 => map_primitive::<UInt64Type>(array, u64::wrapping_neg),
        DataType::Float32 => map_primitive::<Float32Type>(array, |v| -v),
        DataType::Float64 => map_primitive::<Float64Type>(array, |v| -v),
        _ => return None,
    };
    Some(result)
}

fn abs(array: &ArrayRef) -> Option<Result<ArrayRef>> {
    let result = match array.data_type() {
        DataType::Int8 => map_primitive::<Int8Type>(array, i8::wrapping_abs),
        DataType::Int16 => map_primitive::<Int16Type>(array, i16::wrapping_abs),
        DataType::Int32 => map_primitive::<Int32Type>(array, i32::wrapping_abs),
        DataType::Int64 => map_primitive::<Int64Type>(array, i64::wrapping_abs),
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            Ok(Arc::clone(array))
        }
        DataType::Float32 => map_primitive::<Float32Type>(array, f32::abs),
        DataType::Float64 => map_primitive::<Float64Type>(array, f64::abs),
        _ => return None,
    };
    Some(result)
}
