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

//! Frame resolution
//!
//! Turns a [`WindowFrame`] into one [`RowSpan`] per sorted partition
//! position. ROWS bounds count positions. RANGE bounds are measured on the
//! single ordering key through a [`RangeAxis`]; CURRENT ROW in RANGE mode
//! means the edge of the current peer group.
//!
//! A frame whose start lands after its end is empty. Offsets that run past
//! the partition are clamped to its edges.

use crate::core::{Error, Result, Value};
use crate::functions::RowSpan;
use crate::plan::{FrameBound, FrameOffset, FrameUnit, WindowFrame};

/// A key or offset on the RANGE axis
///
/// Integers and timestamps (as nanoseconds) are widened to `i128` so that
/// adding an offset cannot overflow. Anything involving a float is compared
/// as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum RangePoint {
    Exact(i128),
    Approx(f64),
}

impl RangePoint {
    fn as_f64(self) -> f64 {
        match self {
            RangePoint::Exact(n) => n as f64,
            RangePoint::Approx(f) => f,
        }
    }

    fn shift(self, offset: RangePoint, forward: bool) -> RangePoint {
        match (self, offset) {
            (RangePoint::Exact(v), RangePoint::Exact(o)) => {
                RangePoint::Exact(if forward { v + o } else { v - o })
            }
            (v, o) => {
                let (v, o) = (v.as_f64(), o.as_f64());
                RangePoint::Approx(if forward { v + o } else { v - o })
            }
        }
    }

    fn less_than(self, other: RangePoint) -> bool {
        match (self, other) {
            (RangePoint::Exact(a), RangePoint::Exact(b)) => a < b,
            (a, b) => a.as_f64() < b.as_f64(),
        }
    }

    fn greater_than(self, other: RangePoint) -> bool {
        other.less_than(self)
    }
}

fn nanos(seconds: i64, subsec: i64) -> i128 {
    seconds as i128 * 1_000_000_000 + subsec as i128
}

fn offset_point(offset: &FrameOffset) -> RangePoint {
    match offset {
        FrameOffset::Integer(n) => RangePoint::Exact(*n as i128),
        FrameOffset::Float(f) => RangePoint::Approx(*f),
        FrameOffset::Interval(d) => RangePoint::Exact(
            d.num_nanoseconds()
                .map(i128::from)
                .unwrap_or_else(|| d.num_milliseconds() as i128 * 1_000_000),
        ),
    }
}

fn value_point(value: &Value) -> Option<RangePoint> {
    match value {
        Value::Integer(n) => Some(RangePoint::Exact(*n as i128)),
        // NaN sorts past every number and is within range only of other NaNs
        Value::Float(f) if !f.is_nan() => Some(RangePoint::Approx(*f)),
        Value::Timestamp(ts) => Some(RangePoint::Exact(nanos(
            ts.timestamp(),
            ts.timestamp_subsec_nanos() as i64,
        ))),
        _ => None,
    }
}

/// The ordering key of one sorted partition, as seen by RANGE offsets
///
/// NULL keys sort to one end of the partition and NaN keys sort past every
/// number, so the remaining keys form a contiguous, monotonic segment that
/// can be binary searched. NULL and NaN rows frame their own peer group.
#[derive(Debug, Clone)]
pub struct RangeAxis {
    points: Vec<Option<RangePoint>>,
    ascending: bool,
    /// Bounds of the non-NULL segment
    first: usize,
    last: usize,
}

impl RangeAxis {
    /// Build the axis from ordering-key values in sorted order
    pub fn new<'a, I>(keys: I, ascending: bool) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let points: Vec<Option<RangePoint>> = keys.into_iter().map(value_point).collect();
        let first = points.iter().position(Option::is_some).unwrap_or(points.len());
        let last = points
            .iter()
            .rposition(Option::is_some)
            .map_or(first, |i| i + 1);
        Self {
            points,
            ascending,
            first,
            last,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First position whose key is at or past `target` in sort order
    fn lower(&self, target: RangePoint) -> usize {
        let segment = &self.points[self.first..self.last];
        let skipped = segment.partition_point(|p| match p {
            Some(p) if self.ascending => p.less_than(target),
            Some(p) => p.greater_than(target),
            None => false,
        });
        self.first + skipped
    }

    /// First position whose key is strictly past `target` in sort order
    fn upper(&self, target: RangePoint) -> usize {
        let segment = &self.points[self.first..self.last];
        let skipped = segment.partition_point(|p| match p {
            Some(p) if self.ascending => !p.greater_than(target),
            Some(p) => !p.less_than(target),
            None => false,
        });
        self.first + skipped
    }

    /// Key shifted by `offset` toward the start (PRECEDING) or end of the
    /// partition
    fn target(&self, current: RangePoint, offset: &FrameOffset, preceding: bool) -> RangePoint {
        // In a descending partition PRECEDING rows hold larger keys
        let forward = preceding != self.ascending;
        current.shift(offset_point(offset), forward)
    }
}

/// Resolve the frame of every position of a sorted partition
///
/// `axis` must be given when a RANGE frame carries offsets.
pub fn resolve_frames(
    frame: &WindowFrame,
    peers: &[RowSpan],
    axis: Option<&RangeAxis>,
) -> Result<Vec<RowSpan>> {
    let n = peers.len();
    if frame.unit == FrameUnit::Range && frame.has_offsets() {
        match axis {
            Some(axis) if axis.len() == n => {}
            _ => {
                return Err(Error::internal(
                    "RANGE frame with offsets resolved without its ordering key",
                ))
            }
        }
    }

    (0..n)
        .map(|i| {
            let start = resolve_start(frame, peers, axis, i)?;
            let end = resolve_end(frame, peers, axis, i)?;
            Ok(RowSpan::new(start.min(n), end.min(n)))
        })
        .collect()
}

fn rows_offset(offset: &FrameOffset) -> Result<usize> {
    match offset {
        FrameOffset::Integer(n) if *n >= 0 => Ok(usize::try_from(*n).unwrap_or(usize::MAX)),
        other => Err(Error::invalid_frame(format!(
            "ROWS offset must be a non-negative integer, got {}",
            other
        ))),
    }
}

fn resolve_start(
    frame: &WindowFrame,
    peers: &[RowSpan],
    axis: Option<&RangeAxis>,
    i: usize,
) -> Result<usize> {
    let n = peers.len();
    let start = match (frame.unit, &frame.start) {
        (_, FrameBound::UnboundedPreceding) => 0,
        // Rejected by the planner; an unreachable start makes the frame empty
        (_, FrameBound::UnboundedFollowing) => n,
        (FrameUnit::Rows, FrameBound::CurrentRow) => i,
        (FrameUnit::Rows, FrameBound::Preceding(o)) => i.saturating_sub(rows_offset(o)?),
        (FrameUnit::Rows, FrameBound::Following(o)) => i.saturating_add(rows_offset(o)?),
        (FrameUnit::Range, FrameBound::CurrentRow) => peers[i].start,
        (FrameUnit::Range, FrameBound::Preceding(o)) => range_start(peers, axis, i, o, true),
        (FrameUnit::Range, FrameBound::Following(o)) => range_start(peers, axis, i, o, false),
    };
    Ok(start)
}

fn resolve_end(
    frame: &WindowFrame,
    peers: &[RowSpan],
    axis: Option<&RangeAxis>,
    i: usize,
) -> Result<usize> {
    let n = peers.len();
    let end = match (frame.unit, &frame.end) {
        (_, FrameBound::UnboundedFollowing) => n,
        (_, FrameBound::UnboundedPreceding) => 0,
        (FrameUnit::Rows, FrameBound::CurrentRow) => i + 1,
        (FrameUnit::Rows, FrameBound::Preceding(o)) => {
            let o = rows_offset(o)?;
            if o > i {
                0
            } else {
                i - o + 1
            }
        }
        (FrameUnit::Rows, FrameBound::Following(o)) => {
            i.saturating_add(rows_offset(o)?).saturating_add(1)
        }
        (FrameUnit::Range, FrameBound::CurrentRow) => peers[i].end,
        (FrameUnit::Range, FrameBound::Preceding(o)) => range_end(peers, axis, i, o, true),
        (FrameUnit::Range, FrameBound::Following(o)) => range_end(peers, axis, i, o, false),
    };
    Ok(end)
}

fn range_start(
    peers: &[RowSpan],
    axis: Option<&RangeAxis>,
    i: usize,
    offset: &FrameOffset,
    preceding: bool,
) -> usize {
    match axis.and_then(|a| a.points[i].map(|p| (a, p))) {
        Some((axis, current)) => axis.lower(axis.target(current, offset, preceding)),
        // A NULL or NaN key is only within any offset of its peers
        None => peers[i].start,
    }
}

fn range_end(
    peers: &[RowSpan],
    axis: Option<&RangeAxis>,
    i: usize,
    offset: &FrameOffset,
    preceding: bool,
) -> usize {
    match axis.and_then(|a| a.points[i].map(|p| (a, p))) {
        Some((axis, current)) => axis.upper(axis.target(current, offset, preceding)),
        None => peers[i].end,
    }
}
