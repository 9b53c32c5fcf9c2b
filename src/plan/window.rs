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

//! Window specifications: partitioning, ordering and frames
//!
//! These types describe an `OVER (...)` clause. They are plain data; column
//! names are resolved and bounds are checked when a query is planned.

use std::fmt;

use chrono::Duration;

/// Sort direction of an ordering column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Placement of NULLs within an ordering column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// One column of an ordering key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
    /// Explicit NULLS FIRST/LAST; `None` means NULLS LAST for ASC and
    /// NULLS FIRST for DESC
    pub nulls: Option<NullsOrder>,
}

impl SortKey {
    /// Ascending key
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Asc,
            nulls: None,
        }
    }

    /// Descending key
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Desc,
            nulls: None,
        }
    }

    /// Place NULLs before every value
    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    /// Place NULLs after every value
    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == SortDirection::Asc
    }

    /// Resolved NULL placement
    pub fn nulls_come_first(&self) -> bool {
        match self.nulls {
            Some(NullsOrder::First) => true,
            Some(NullsOrder::Last) => false,
            None => !self.is_ascending(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column)?;
        if !self.is_ascending() {
            write!(f, " DESC")?;
        }
        match self.nulls {
            Some(NullsOrder::First) => write!(f, " NULLS FIRST"),
            Some(NullsOrder::Last) => write!(f, " NULLS LAST"),
            None => Ok(()),
        }
    }
}

/// Window frame unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnit {
    /// Bounds count physical rows
    Rows,
    /// Bounds are measured in the ordering-key domain
    Range,
}

/// Offset of a PRECEDING/FOLLOWING bound
///
/// ROWS frames accept only `Integer`. RANGE frames accept `Integer` and
/// `Float` over numeric keys and `Interval` over timestamp keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOffset {
    Integer(i64),
    Float(f64),
    Interval(Duration),
}

impl FrameOffset {
    /// True when the offset is below zero
    pub fn is_negative(&self) -> bool {
        match self {
            FrameOffset::Integer(n) => *n < 0,
            FrameOffset::Float(n) => *n < 0.0,
            FrameOffset::Interval(d) => *d < Duration::zero(),
        }
    }

    /// False for NaN and infinite float offsets
    pub fn is_finite(&self) -> bool {
        match self {
            FrameOffset::Float(n) => n.is_finite(),
            FrameOffset::Integer(_) | FrameOffset::Interval(_) => true,
        }
    }
}

impl From<i64> for FrameOffset {
    fn from(n: i64) -> Self {
        FrameOffset::Integer(n)
    }
}

impl From<i32> for FrameOffset {
    fn from(n: i32) -> Self {
        FrameOffset::Integer(n as i64)
    }
}

impl From<f64> for FrameOffset {
    fn from(n: f64) -> Self {
        FrameOffset::Float(n)
    }
}

impl From<Duration> for FrameOffset {
    fn from(d: Duration) -> Self {
        FrameOffset::Interval(d)
    }
}

impl fmt::Display for FrameOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOffset::Integer(n) => write!(f, "{}", n),
            FrameOffset::Float(n) => write!(f, "{}", n),
            FrameOffset::Interval(d) => write!(f, "INTERVAL '{}'", d),
        }
    }
}

/// Window frame bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(FrameOffset),
    CurrentRow,
    Following(FrameOffset),
    UnboundedFollowing,
}

impl FrameBound {
    /// `offset PRECEDING`
    pub fn preceding(offset: impl Into<FrameOffset>) -> Self {
        FrameBound::Preceding(offset.into())
    }

    /// `offset FOLLOWING`
    pub fn following(offset: impl Into<FrameOffset>) -> Self {
        FrameBound::Following(offset.into())
    }

    /// The offset of a PRECEDING/FOLLOWING bound
    pub fn offset(&self) -> Option<&FrameOffset> {
        match self {
            FrameBound::Preceding(o) | FrameBound::Following(o) => Some(o),
            _ => None,
        }
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameBound::UnboundedPreceding => write!(f, "UNBOUNDED PRECEDING"),
            FrameBound::Preceding(o) => write!(f, "{} PRECEDING", o),
            FrameBound::CurrentRow => write!(f, "CURRENT ROW"),
            FrameBound::Following(o) => write!(f, "{} FOLLOWING", o),
            FrameBound::UnboundedFollowing => write!(f, "UNBOUNDED FOLLOWING"),
        }
    }
}

/// Window frame specification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowFrame {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: FrameBound,
}

impl WindowFrame {
    /// `ROWS BETWEEN start AND end`
    pub fn rows(start: FrameBound, end: FrameBound) -> Self {
        Self {
            unit: FrameUnit::Rows,
            start,
            end,
        }
    }

    /// `RANGE BETWEEN start AND end`
    pub fn range(start: FrameBound, end: FrameBound) -> Self {
        Self {
            unit: FrameUnit::Range,
            start,
            end,
        }
    }

    /// `ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`
    pub fn running_rows() -> Self {
        Self::rows(FrameBound::UnboundedPreceding, FrameBound::CurrentRow)
    }

    /// `ROWS BETWEEN n PRECEDING AND CURRENT ROW`
    pub fn trailing_rows(n: i64) -> Self {
        Self::rows(FrameBound::preceding(n), FrameBound::CurrentRow)
    }

    /// Frame used when a window has an ordering key but no explicit frame
    pub fn default_ordered() -> Self {
        Self::range(FrameBound::UnboundedPreceding, FrameBound::CurrentRow)
    }

    /// Frame covering the whole partition
    pub fn whole_partition() -> Self {
        Self::rows(FrameBound::UnboundedPreceding, FrameBound::UnboundedFollowing)
    }

    /// True when either bound carries a PRECEDING/FOLLOWING offset
    pub fn has_offsets(&self) -> bool {
        self.start.offset().is_some() || self.end.offset().is_some()
    }
}

impl fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            FrameUnit::Rows => "ROWS",
            FrameUnit::Range => "RANGE",
        };
        write!(f, "{} BETWEEN {} AND {}", unit, self.start, self.end)
    }
}

/// Window specification: the contents of an `OVER (...)` clause
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowSpec {
    pub partition_by: Vec<String>,
    pub order_by: Vec<SortKey>,
    pub frame: Option<WindowFrame>,
}

impl WindowSpec {
    /// Empty specification: one partition, input order, whole-partition frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a partition column
    pub fn partition_by(mut self, column: impl Into<String>) -> Self {
        self.partition_by.push(column.into());
        self
    }

    /// Add an ordering column
    pub fn order_by(mut self, key: SortKey) -> Self {
        self.order_by.push(key);
        self
    }

    /// Set an explicit frame
    pub fn frame(mut self, frame: WindowFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Frame in effect, applying the defaults for a missing frame
    pub fn effective_frame(&self) -> WindowFrame {
        match self.frame {
            Some(frame) => frame,
            None if self.order_by.is_empty() => WindowFrame::whole_partition(),
            None => WindowFrame::default_ordered(),
        }
    }

    /// True when two specifications produce the same partitions and ordering
    ///
    /// Calls that only differ by frame share one partitioning pass.
    pub fn same_partitioning(&self, other: &WindowSpec) -> bool {
        self.partition_by.len() == other.partition_by.len()
            && self
                .partition_by
                .iter()
                .zip(&other.partition_by)
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
            && self.order_by.len() == other.order_by.len()
            && self.order_by.iter().zip(&other.order_by).all(|(a, b)| {
                a.column.eq_ignore_ascii_case(&b.column)
                    && a.direction == b.direction
                    && a.nulls_come_first() == b.nulls_come_first()
            })
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if !self.partition_by.is_empty() {
            parts.push(format!("PARTITION BY {}", self.partition_by.join(", ")));
        }
        if !self.order_by.is_empty() {
            let keys: Vec<String> = self.order_by.iter().map(|k| k.to_string()).collect();
            parts.push(format!("ORDER BY {}", keys.join(", ")));
        }
        if let Some(ref frame) = self.frame {
            parts.push(frame.to_string());
        }
        write!(f, "({})", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_null_defaults() {
        assert!(!SortKey::asc("a").nulls_come_first());
        assert!(SortKey::desc("a").nulls_come_first());
        assert!(SortKey::asc("a").nulls_first().nulls_come_first());
        assert!(!SortKey::desc("a").nulls_last().nulls_come_first());
    }

    #[test]
    fn test_effective_frame() {
        let spec = WindowSpec::new().partition_by("region");
        assert_eq!(spec.effective_frame(), WindowFrame::whole_partition());

        let spec = spec.order_by(SortKey::asc("month"));
        assert_eq!(spec.effective_frame(), WindowFrame::default_ordered());

        let spec = spec.frame(WindowFrame::trailing_rows(2));
        assert_eq!(
            spec.effective_frame().start,
            FrameBound::Preceding(FrameOffset::Integer(2))
        );
    }

    #[test]
    fn test_negative_offsets() {
        assert!(FrameOffset::Integer(-1).is_negative());
        assert!(FrameOffset::Float(-0.5).is_negative());
        assert!(FrameOffset::Interval(Duration::days(-1)).is_negative());
        assert!(!FrameOffset::Interval(Duration::days(0)).is_negative());
    }

    #[test]
    fn test_finite_offsets() {
        assert!(FrameOffset::Float(2.5).is_finite());
        assert!(!FrameOffset::Float(f64::NAN).is_finite());
        assert!(!FrameOffset::Float(f64::NEG_INFINITY).is_finite());
        assert!(FrameOffset::Integer(i64::MAX).is_finite());
    }

    #[test]
    fn test_same_partitioning_ignores_frame() {
        let a = WindowSpec::new()
            .partition_by("Region")
            .order_by(SortKey::asc("month"));
        let b = WindowSpec::new()
            .partition_by("region")
            .order_by(SortKey::asc("MONTH").nulls_last())
            .frame(WindowFrame::trailing_rows(2));
        assert!(a.same_partitioning(&b));

        let c = WindowSpec::new()
            .partition_by("region")
            .order_by(SortKey::desc("month"));
        assert!(!a.same_partitioning(&c));
    }

    #[test]
    fn test_display() {
        let spec = WindowSpec::new()
            .partition_by("category")
            .order_by(SortKey::desc("revenue"))
            .frame(WindowFrame::rows(
                FrameBound::preceding(2),
                FrameBound::CurrentRow,
            ));
        assert_eq!(
            spec.to_string(),
            "(PARTITION BY category ORDER BY revenue DESC ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)"
        );
        assert_eq!(WindowSpec::new().to_string(), "()");
    }
}
