//! Configuration for grouping and aggregation.

use crate::compute::AggregateOptions;

/// Minimum number of groups before per-group masks are built on the rayon
/// thread pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Configuration for the group engine.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Build per-group masks in parallel.
    pub parallel: bool,
    /// Minimum number of groups before parallel mask construction kicks in.
    pub parallel_threshold: usize,
    /// Options passed to every aggregation kernel.
    pub aggregate_options: AggregateOptions,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            aggregate_options: AggregateOptions::default(),
        }
    }
}

impl GroupConfig {
    /// Creates a new group configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables parallel mask construction.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the minimum group count for parallel mask construction.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Sets the aggregation options.
    #[must_use]
    pub fn with_aggregate_options(mut self, options: AggregateOptions) -> Self {
        self.aggregate_options = options;
        self
    }

    /// Returns true if `n_groups` masks should be built in parallel.
    #[must_use]
    pub fn use_parallel(&self, n_groups: usize) -> bool {
        self.parallel && n_groups >= self.parallel_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_threshold() {
        let config = GroupConfig::new().with_parallel_threshold(4);
        assert!(!config.use_parallel(3));
        assert!(config.use_parallel(4));
        assert!(!config.with_parallel(false).use_parallel(100));
    }
}
