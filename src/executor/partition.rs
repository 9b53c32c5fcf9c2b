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

//! Partitioner
//!
//! Splits rows into partitions by the partition key, then sorts each
//! partition by the ordering key and finds its peer groups.
//!
//! Partitions are reported in order of first appearance of their key, and
//! row indices inside a partition keep input order until sorted. The sort
//! is stable, so rows with equal ordering keys stay in input order.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::{Row, Value};
use crate::functions::RowSpan;

/// Partition key values; up to 4 partition columns stay on the stack
pub type PartitionKey = SmallVec<[Value; 4]>;

/// One resolved column of an ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderColumn {
    pub index: usize,
    pub ascending: bool,
    pub nulls_first: bool,
}

impl OrderColumn {
    /// Compare two values of this column in sort order
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => {
                if self.nulls_first {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                if self.nulls_first {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, false) => {
                let cmp = a.cmp(b);
                if self.ascending {
                    cmp
                } else {
                    cmp.reverse()
                }
            }
        }
    }
}

/// Compare two rows by an ordering key
pub fn compare_rows(a: &[Value], b: &[Value], order: &[OrderColumn]) -> Ordering {
    for col in order {
        let cmp = col.compare(&a[col.index], &b[col.index]);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

/// Group row indices by partition key, in first-appearance order
///
/// No partition columns puts every row in one partition; no rows gives no
/// partitions.
pub fn partition_rows(rows: &[Row], partition_cols: &[usize]) -> Vec<Vec<usize>> {
    if rows.is_empty() {
        return Vec::new();
    }
    if partition_cols.is_empty() {
        return vec![(0..rows.len()).collect()];
    }

    let mut slots: FxHashMap<PartitionKey, usize> = FxHashMap::default();
    let mut partitions: Vec<Vec<usize>> = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let key: PartitionKey = partition_cols
            .iter()
            .map(|&idx| row.get(idx).cloned().unwrap_or_else(Value::null_unknown))
            .collect();
        let slot = *slots.entry(key).or_insert_with(|| {
            partitions.push(Vec::new());
            partitions.len() - 1
        });
        partitions[slot].push(i);
    }

    partitions
}

/// Stable-sort a partition's row indices by the ordering key
pub fn sort_partition(rows: &[Row], indices: &mut [usize], order: &[OrderColumn]) {
    if order.is_empty() {
        return;
    }
    indices.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b], order));
}

/// Peer group of every position of a sorted partition
///
/// Peers are adjacent after sorting, so one pass finds every group. Without
/// an ordering key all rows are peers.
pub fn peer_groups(rows: &[Row], sorted: &[usize], order: &[OrderColumn]) -> Vec<RowSpan> {
    let n = sorted.len();
    if order.is_empty() {
        return vec![RowSpan::new(0, n); n];
    }

    let mut groups = Vec::with_capacity(n);
    let mut group_start = 0;
    for i in 1..=n {
        let boundary = i == n
            || compare_rows(&rows[sorted[group_start]], &rows[sorted[i]], order) != Ordering::Equal;
        if boundary {
            groups.extend(std::iter::repeat(RowSpan::new(group_start, i)).take(i - group_start));
            group_start = i;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    fn rows() -> Vec<Row> {
        vec![
            row!["north", 30i64],
            row!["south", 10i64],
            row!["north", 10i64],
            Row::from_values(vec![Value::text("south"), Value::null_unknown()]),
            row!["north", 30i64],
        ]
    }

    fn asc(index: usize) -> OrderColumn {
        OrderColumn {
            index,
            ascending: true,
            nulls_first: false,
        }
    }

    #[test]
    fn test_partition_first_appearance_order() {
        let rows = rows();
        assert_eq!(
            partition_rows(&rows, &[0]),
            vec![vec![0, 2, 4], vec![1, 3]]
        );
        assert_eq!(partition_rows(&rows, &[]), vec![vec![0, 1, 2, 3, 4]]);
        assert!(partition_rows(&[], &[0]).is_empty());
    }

    #[test]
    fn test_null_keys_share_a_partition() {
        let rows = vec![
            Row::from_values(vec![Value::null_unknown()]),
            row![1i64],
            Row::from_values(vec![Value::null(crate::core::DataType::Integer)]),
        ];
        assert_eq!(partition_rows(&rows, &[0]), vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn test_sort_is_stable() {
        let rows = rows();
        let mut north = vec![0, 2, 4];
        sort_partition(&rows, &mut north, &[asc(1)]);
        assert_eq!(north, vec![2, 0, 4]);
    }

    #[test]
    fn test_null_placement() {
        let rows = rows();
        let mut south = vec![1, 3];
        sort_partition(&rows, &mut south, &[asc(1)]);
        assert_eq!(south, vec![1, 3]);

        let desc = OrderColumn {
            index: 1,
            ascending: false,
            nulls_first: true,
        };
        let mut south = vec![1, 3];
        sort_partition(&rows, &mut south, &[desc]);
        assert_eq!(south, vec![3, 1]);

        let mut all = vec![0, 1, 2, 3, 4];
        let nulls_first_asc = OrderColumn {
            nulls_first: true,
            ..asc(1)
        };
        sort_partition(&rows, &mut all, &[nulls_first_asc]);
        assert_eq!(all, vec![3, 1, 2, 0, 4]);
    }

    #[test]
    fn test_peer_groups() {
        let rows = rows();
        let sorted = vec![1, 2, 0, 4, 3];
        let peers = peer_groups(&rows, &sorted, &[asc(1)]);
        assert_eq!(
            peers,
            vec![
                RowSpan::new(0, 2),
                RowSpan::new(0, 2),
                RowSpan::new(2, 4),
                RowSpan::new(2, 4),
                RowSpan::new(4, 5),
            ]
        );

        let unordered = peer_groups(&rows, &[0, 1, 2], &[]);
        assert_eq!(unordered, vec![RowSpan::new(0, 3); 3]);
        assert!(peer_groups(&rows, &[], &[asc(1)]).is_empty());
    }
}
