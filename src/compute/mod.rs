//! Compute registry.
//!
//! Maps function names onto a closed set of kernels and classifies each as
//! aggregate (reduces to one scalar) or element-wise (same-length output).

mod aggregate;
mod elementwise;

use std::fmt;
use std::str::FromStr;

pub use aggregate::{AggregateFunction, AggregateOptions};
pub(crate) use aggregate::primitive;
pub use elementwise::{BinaryFunction, UnaryFunction};

use crate::error::FrameError;

/// A recognised compute function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    /// Reduces a column to one scalar.
    Aggregate(AggregateFunction),
    /// Element-wise over one operand.
    Unary(UnaryFunction),
    /// Element-wise over two operands.
    Binary(BinaryFunction),
}

impl Function {
    /// Looks up a function by name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        AggregateFunction::from_name(name)
            .map(Function::Aggregate)
            .or_else(|| UnaryFunction::from_name(name).map(Function::Unary))
            .or_else(|| BinaryFunction::from_name(name).map(Function::Binary))
    }

    /// Canonical function name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Function::Aggregate(f) => f.name(),
            Function::Unary(f) => f.name(),
            Function::Binary(f) => f.name(),
        }
    }

    /// Returns true for functions that reduce to a single scalar.
    #[must_use]
    pub fn is_aggregate(self) -> bool {
        matches!(self, Function::Aggregate(_))
    }
}

impl FromStr for Function {
    type Err = FrameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Function::parse(name)
            .ok_or_else(|| FrameError::vector_argument(format!("unknown function: {name}")))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<AggregateFunction> for Function {
    fn from(f: AggregateFunction) -> Self {
        Function::Aggregate(f)
    }
}

impl From<UnaryFunction> for Function {
    fn from(f: UnaryFunction) -> Self {
        Function::Unary(f)
    }
}

impl From<BinaryFunction> for Function {
    fn from(f: BinaryFunction) -> Self {
        Function::Binary(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        for name in [
            "all",
            "any",
            "count",
            "count_distinct",
            "max",
            "mean",
            "median",
            "min",
            "min_max",
            "product",
            "quantile",
            "sum",
            "stddev",
            "variance",
        ] {
            let function: Function = name.parse().unwrap();
            assert!(function.is_aggregate(), "{name}");
        }
        for name in ["abs", "add", "equal", "is_nan", "negate", "and_kleene"] {
            let function: Function = name.parse().unwrap();
            assert!(!function.is_aggregate(), "{name}");
        }
    }

    #[test]
    fn test_unknown_function() {
        let err = "frobnicate".parse::<Function>().unwrap_err();
        assert!(matches!(err, FrameError::VectorArgumentError(_)));
    }

    #[test]
    fn test_names_roundtrip() {
        for f in AggregateFunction::ALL {
            assert_eq!(Function::parse(f.name()), Some(Function::Aggregate(f)));
        }
        for f in UnaryFunction::ALL {
            assert_eq!(Function::parse(f.name()), Some(Function::Unary(f)));
        }
        for f in BinaryFunction::ALL {
            assert_eq!(Function::parse(f.name()), Some(Function::Binary(f)));
        }
    }
}
