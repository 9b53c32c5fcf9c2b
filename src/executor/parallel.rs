// Copyright 2025 Winframe Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parallel partition evaluation
//!
//! Partitions are the unit of parallel work. Each task owns one partition
//! and produces that partition's outputs; results come back in partition
//! order, so the merge is identical whether rayon ran them or not.
//!
//! # Thresholds
//!
//! Parallelization has overhead, so it is only used when both hold:
//! - at least `min_partitions` partitions (default 4)
//! - at least `min_rows` input rows (default 1,024)

use rayon::prelude::*;

use crate::core::Result;

pub const DEFAULT_PARALLEL_MIN_PARTITIONS: usize = 4;
pub const DEFAULT_PARALLEL_MIN_ROWS: usize = 1_024;

/// Configuration for parallel execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Whether parallel execution is enabled
    pub enabled: bool,
    /// Minimum number of partitions to evaluate in parallel
    pub min_partitions: usize,
    /// Minimum number of input rows to evaluate in parallel
    pub min_rows: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_partitions: DEFAULT_PARALLEL_MIN_PARTITIONS,
            min_rows: DEFAULT_PARALLEL_MIN_ROWS,
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel config with custom settings
    pub fn new(enabled: bool, min_partitions: usize, min_rows: usize) -> Self {
        Self {
            enabled,
            min_partitions,
            min_rows,
        }
    }

    /// Create a config with parallel execution disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Check if partitions should be evaluated in parallel
    #[inline]
    pub fn should_parallelize(&self, partition_count: usize, row_count: usize) -> bool {
        self.enabled && partition_count >= self.min_partitions && row_count >= self.min_rows
    }
}

/// Map `f` over `items`, in parallel when `parallel` is set
///
/// Output order always matches input order. The first error (in item
/// order for sequential runs, any failing item for parallel runs) is
/// returned and the other results are dropped.
pub fn map_partitions<T, R, F>(items: &[T], parallel: bool, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync + Send,
{
    if parallel {
        items.par_iter().map(&f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;

    #[test]
    fn test_thresholds() {
        let config = ParallelConfig::default();
        assert!(config.should_parallelize(4, 1024));
        assert!(!config.should_parallelize(3, 100_000));
        assert!(!config.should_parallelize(100, 1023));
        assert!(!ParallelConfig::disabled().should_parallelize(100, 100_000));
        assert!(ParallelConfig::new(true, 1, 0).should_parallelize(1, 0));
    }

    #[test]
    fn test_map_partitions_preserves_order() {
        let items: Vec<usize> = (0..64).collect();
        let sequential = map_partitions(&items, false, |i| Ok(i * 2)).unwrap();
        let parallel = map_partitions(&items, true, |i| Ok(i * 2)).unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(parallel[63], 126);
    }

    #[test]
    fn test_map_partitions_propagates_errors() {
        let items = vec![1, 2, 3];
        let result: Result<Vec<i32>> = map_partitions(&items, true, |i| {
            if *i == 2 {
                Err(Error::internal("boom"))
            } else {
                Ok(*i)
            }
        });
        assert!(result.is_err());
    }
}
