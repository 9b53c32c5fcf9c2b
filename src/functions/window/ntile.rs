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

//! NTILE window function

use crate::core::{Error, Result, Value};
use crate::functions::{PartitionView, WindowFunction};

/// NTILE window function
///
/// Divides the partition into n roughly equal groups and returns the group
/// number (1 to n) of each row. When the partition does not divide evenly,
/// the first `N mod n` groups get one extra row.
pub struct NtileFunction {
    num_buckets: i64,
}

impl NtileFunction {
    /// Create a new NTILE function with the specified number of buckets
    pub fn new(num_buckets: i64) -> Self {
        Self { num_buckets }
    }

    /// Bucket of the 1-based `row_num` among `total_rows`
    fn bucket(&self, row_num: i64, total_rows: i64) -> i64 {
        let n = self.num_buckets;

        // If total_rows = 10 and n = 3:
        //   - Bucket 1 gets rows 1-4 (4 rows)
        //   - Bucket 2 gets rows 5-7 (3 rows)
        //   - Bucket 3 gets rows 8-10 (3 rows)
        let base_size = total_rows / n;
        let remainder = total_rows % n;
        let rows_in_larger_buckets = remainder * (base_size + 1);

        let bucket = if row_num <= rows_in_larger_buckets {
            (row_num - 1) / (base_size + 1) + 1
        } else {
            // base_size > 0 here, otherwise every row is in a larger bucket
            remainder + (row_num - rows_in_larger_buckets - 1) / base_size + 1
        };

        bucket.min(n)
    }
}

impl WindowFunction for NtileFunction {
    fn name(&self) -> &str {
        "NTILE"
    }

    fn evaluate(&self, partition: &PartitionView<'_>) -> Result<Vec<Value>> {
        if self.num_buckets <= 0 {
            return Err(Error::invalid_argument(format!(
                "NTILE bucket count must be positive, got {}",
                self.num_buckets
            )));
        }

        let total_rows = partition.len() as i64;
        Ok((1..=total_rows)
            .map(|row_num| Value::Integer(self.bucket(row_num, total_rows)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::distinct_peers;

    fn buckets(num_buckets: i64, rows: usize) -> Vec<i64> {
        let peers = distinct_peers(rows);
        let view = PartitionView {
            values: &[],
            peers: &peers,
            frames: &[],
        };
        NtileFunction::new(num_buckets)
            .evaluate(&view)
            .unwrap()
            .iter()
            .map(|v| v.as_int64().unwrap())
            .collect()
    }

    #[test]
    fn test_ntile_even_distribution() {
        assert_eq!(buckets(3, 6), vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_ntile_uneven_distribution() {
        assert_eq!(buckets(3, 10), vec![1, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
        // five customers into quartiles
        assert_eq!(buckets(4, 5), vec![1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_ntile_more_buckets_than_rows() {
        assert_eq!(buckets(5, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_ntile_single_bucket() {
        assert_eq!(buckets(1, 4), vec![1, 1, 1, 1]);
        assert!(buckets(4, 0).is_empty());
    }

    #[test]
    fn test_ntile_rejects_non_positive() {
        let peers = distinct_peers(2);
        let view = PartitionView {
            values: &[],
            peers: &peers,
            frames: &[],
        };
        assert!(NtileFunction::new(0).evaluate(&view).is_err());
        assert!(NtileFunction::new(-3).evaluate(&view).is_err());
    }
}
