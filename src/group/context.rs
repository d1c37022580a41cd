//! Block context for [`Group::summarize`](crate::Group::summarize).

use crate::compute::AggregateFunction;
use crate::error::Result;
use crate::group::Group;
use crate::vector::Vector;

/// One aggregation request: a function over one or more target columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggRequest {
    pub function: AggregateFunction,
    pub targets: Vec<String>,
}

impl AggRequest {
    #[must_use]
    pub fn new<S: AsRef<str>>(function: AggregateFunction, targets: &[S]) -> Self {
        AggRequest {
            function,
            targets: targets.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }
}

macro_rules! request_methods {
    ($($method:ident => $function:ident),* $(,)?) => {
        $(
            #[must_use]
            pub fn $method<S: AsRef<str>>(&self, targets: &[S]) -> AggRequest {
                AggRequest::new(AggregateFunction::$function, targets)
            }
        )*
    };
}

/// View of a group handed to `summarize` blocks. Aggregate methods build
/// requests against the grouping; nothing is computed until the block
/// returns.
#[derive(Debug, Clone, Copy)]
pub struct GroupContext<'a> {
    group: &'a Group,
}

impl<'a> GroupContext<'a> {
    pub(crate) fn new(group: &'a Group) -> Self {
        GroupContext { group }
    }

    /// Key column names.
    #[must_use]
    pub fn keys(&self) -> &'a [String] {
        self.group.keys()
    }

    /// Column names of the grouped frame.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.group.source().keys()
    }

    /// Ungrouped column `name`.
    ///
    /// # Errors
    ///
    /// Returns an argument error if there is no such column.
    pub fn v(&self, name: &str) -> Result<Vector> {
        self.group.source().v(name)
    }

    #[must_use]
    pub fn aggregate<S: AsRef<str>>(&self, function: AggregateFunction, targets: &[S]) -> AggRequest {
        AggRequest::new(function, targets)
    }

    request_methods! {
        count => Count,
        sum => Sum,
        mean => Mean,
        min => Min,
        max => Max,
        product => Product,
        stddev => Stddev,
        variance => Variance,
        median => Median,
        first => First,
        last => Last,
        count_distinct => CountDistinct,
        all => All,
        any => Any,
    }
}
