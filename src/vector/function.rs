//! Compute dispatch on vectors.

use crate::compute::{AggregateFunction, AggregateOptions, BinaryFunction, Function, UnaryFunction};
use crate::error::{FrameError, Result};
use crate::types::Value;
use crate::vector::{Operand, Vector};

/// Result of [`Vector::call`]: aggregates produce a scalar, element-wise
/// functions a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Computed {
    Vector(Vector),
    Scalar(Value),
}

impl Computed {
    #[must_use]
    pub fn into_vector(self) -> Option<Vector> {
        match self {
            Computed::Vector(v) => Some(v),
            Computed::Scalar(_) => None,
        }
    }

    #[must_use]
    pub fn into_scalar(self) -> Option<Value> {
        match self {
            Computed::Scalar(v) => Some(v),
            Computed::Vector(_) => None,
        }
    }
}

macro_rules! aggregate_methods {
    ($($(#[$doc:meta])* $method:ident => $function:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns an error if the vector's type is not supported.
            pub fn $method(&self) -> Result<Value> {
                self.aggregate(AggregateFunction::$function)
            }
        )*
    };
}

macro_rules! unary_methods {
    ($($(#[$doc:meta])* $method:ident => $function:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns an error if the vector's type is not supported.
            pub fn $method(&self) -> Result<Vector> {
                self.apply(UnaryFunction::$function)
            }
        )*
    };
}

macro_rules! binary_methods {
    ($($(#[$doc:meta])* $method:ident => $function:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            ///
            /// # Errors
            ///
            /// Returns an error if the operand lengths differ or the types
            /// are not supported.
            pub fn $method(&self, other: impl Into<Operand>) -> Result<Vector> {
                self.apply_binary(BinaryFunction::$function, other)
            }
        )*
    };
}

impl Vector {
    /// Returns true if `name` is a function that reduces a vector to one
    /// scalar.
    #[must_use]
    pub fn is_aggregate(name: &str) -> bool {
        Function::parse(name).is_some_and(Function::is_aggregate)
    }

    /// Invokes `function` on this vector, with `other` as the second operand
    /// of binary functions.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] if the operand count does
    /// not match the function's arity, or the kernel's error.
    pub fn call(&self, function: Function, other: Option<Operand>) -> Result<Computed> {
        match (function, other) {
            (Function::Aggregate(f), None) => self.aggregate(f).map(Computed::Scalar),
            (Function::Unary(f), None) => self.apply(f).map(Computed::Vector),
            (Function::Binary(f), Some(other)) => self.apply_binary(f, other).map(Computed::Vector),
            (Function::Binary(f), None) => Err(FrameError::vector_argument(format!(
                "{} requires a second operand",
                f.name()
            ))),
            (f, Some(_)) => Err(FrameError::vector_argument(format!(
                "{} takes no second operand",
                f.name()
            ))),
        }
    }

    /// Looks up `name` and invokes it as [`Vector::call`] does.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::VectorArgumentError`] for an unknown name.
    pub fn call_by_name(&self, name: &str, other: Option<Operand>) -> Result<Computed> {
        self.call(name.parse()?, other)
    }

    /// Reduces the vector with default options.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error.
    pub fn aggregate(&self, function: AggregateFunction) -> Result<Value> {
        self.aggregate_with(function, &AggregateOptions::default())
    }

    /// Reduces the vector with explicit options.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error.
    pub fn aggregate_with(
        &self,
        function: AggregateFunction,
        options: &AggregateOptions,
    ) -> Result<Value> {
        function.reduce(self.data(), options)
    }

    /// Applies a unary element-wise function.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error.
    pub fn apply(&self, function: UnaryFunction) -> Result<Vector> {
        Ok(Vector::new(function.execute(self.data())?))
    }

    /// Applies a binary element-wise function; scalar operands broadcast.
    ///
    /// # Errors
    ///
    /// Returns the kernel's error.
    pub fn apply_binary(&self, function: BinaryFunction, other: impl Into<Operand>) -> Result<Vector> {
        let right = other.into().into_array(self.size())?;
        Ok(Vector::new(function.execute(self.data(), &right)?))
    }

    aggregate_methods! {
        /// Sum of the values.
        sum => Sum,
        /// Arithmetic mean.
        mean => Mean,
        min => Min,
        max => Max,
        product => Product,
        /// Number of non-null values.
        count => Count,
        /// Number of distinct non-null values; NaN counts once.
        count_distinct => CountDistinct,
        /// Alias for [`Vector::count_distinct`].
        count_uniq => CountDistinct,
        all => All,
        any => Any,
        median => Median,
        /// Population standard deviation.
        stddev => Stddev,
        /// Population variance.
        variance => Variance,
        /// First non-null value.
        first => First,
        /// Last non-null value.
        last => Last,
    }

    /// Value at probability `q`, linearly interpolated.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is not numeric.
    pub fn quantile(&self, q: f64) -> Result<Value> {
        let options = AggregateOptions::default().with_quantile(q);
        self.aggregate_with(AggregateFunction::Quantile, &options)
    }

    /// Sample standard deviation (ddof 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is not numeric.
    pub fn sd(&self) -> Result<Value> {
        let options = AggregateOptions::default().with_ddof(1);
        self.aggregate_with(AggregateFunction::Stddev, &options)
    }

    /// Sample variance (ddof 1).
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is not numeric.
    pub fn unbiased_variance(&self) -> Result<Value> {
        let options = AggregateOptions::default().with_ddof(1);
        self.aggregate_with(AggregateFunction::Variance, &options)
    }

    /// Minimum and maximum together.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector's type is not ordered.
    pub fn min_max(&self) -> Result<(Value, Value)> {
        Ok((self.min()?, self.max()?))
    }

    unary_methods! {
        abs => Abs,
        /// Arithmetic negation; unsigned integers wrap.
        negate => Negate,
        /// Boolean not.
        invert => Invert,
        /// Mask of null positions.
        is_nil => IsNull,
        /// Mask of non-null positions.
        is_valid => IsValid,
        is_nan => IsNan,
        is_finite => IsFinite,
        sqrt => Sqrt,
        floor => Floor,
        ceil => Ceil,
        round => Round,
    }

    binary_methods! {
        add => Add,
        subtract => Subtract,
        multiply => Multiply,
        divide => Divide,
        modulo => Modulo,
        power => Power,
        equal => Equal,
        not_equal => NotEqual,
        less => Less,
        less_equal => LessEqual,
        greater => Greater,
        greater_equal => GreaterEqual,
        and => And,
        or => Or,
        xor => Xor,
        /// Kleene and: `false` dominates null.
        and_kleene => AndKleene,
        /// Kleene or: `true` dominates null.
        or_kleene => OrKleene,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_is_aggregate() {
        assert!(Vector::is_aggregate("sum"));
        assert!(Vector::is_aggregate("count_uniq"));
        assert!(!Vector::is_aggregate("abs"));
        assert!(!Vector::is_aggregate("add"));
        assert!(!Vector::is_aggregate("no_such_function"));
    }

    #[test]
    fn test_named_aggregates() {
        let v = Vector::from(vec![1i64, 2, 3, 4]);
        assert_eq!(v.sum().unwrap(), Value::Int64(10));
        assert_eq!(v.mean().unwrap(), Value::Float64(2.5));
        assert_eq!(v.min_max().unwrap(), (Value::Int64(1), Value::Int64(4)));
        assert_eq!(v.count().unwrap(), Value::Int64(4));
        assert_eq!(v.variance().unwrap(), Value::Float64(1.25));
        let sample = v.unbiased_variance().unwrap().as_float64().unwrap();
        assert!((sample - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_negate_unsigned_wraps() {
        let v = Vector::from(vec![1u8, 0]);
        let negated = v.negate().unwrap();
        assert_eq!(negated.to_values().unwrap(), vec![Value::UInt64(255), Value::UInt64(0)]);
    }

    #[test]
    fn test_binary_with_scalar() {
        let v = Vector::from(vec![1i64, 2, 3]).with_key("x");
        let sum = v.add(10i64).unwrap();
        assert_eq!(
            sum.to_values().unwrap(),
            vec![Value::Int64(11), Value::Int64(12), Value::Int64(13)]
        );
        assert!(sum.key().is_none());
        let mask = v.greater(1i64).unwrap();
        assert_eq!(
            mask.to_values().unwrap(),
            vec![Value::Bool(false), Value::Bool(true), Value::Bool(true)]
        );
    }

    #[test]
    fn test_call_arity() {
        let v = Vector::from(vec![1i64, 2]);
        let total = v.call_by_name("sum", None).unwrap().into_scalar();
        assert_eq!(total, Some(Value::Int64(3)));
        assert!(v.call_by_name("add", None).is_err());
        assert!(v.call_by_name("sum", Some(Operand::from(1i64))).is_err());
        assert!(v.call_by_name("frobnicate", None).is_err());
    }
}
