//! Scalar values, type classes and array construction.

pub mod array;
pub mod class;
mod value;

pub use array::{
    array_from_values, array_to_values, cast_strict, infer_data_type, null_count, value_at,
};
pub use class::{common_numeric_type, TypeClass};
pub use value::{Value, ValueKey};
