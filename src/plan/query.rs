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

//! Window query builder

use std::fmt;

use super::expr::{Expr, Predicate};
use super::function::{WindowCall, WindowFunctionKind};
use super::window::{SortKey, WindowSpec};

/// A derived output column
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumn {
    pub name: String,
    pub expr: Expr,
}

/// Everything the engine needs besides the rows themselves
///
/// Output columns are, in order: the selected input columns (all of them
/// when no selection is given), one column per window call, then the
/// derived columns. The filter and the outer ordering may reference any
/// input, window or derived column, selected or not.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WindowQuery {
    pub select: Option<Vec<String>>,
    pub windows: Vec<WindowCall>,
    pub derived: Vec<DerivedColumn>,
    pub filter: Option<Predicate>,
    pub order_by: Vec<SortKey>,
}

impl WindowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select input columns to carry into the output
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Add a window function call
    pub fn window(mut self, call: WindowCall) -> Self {
        self.windows.push(call);
        self
    }

    /// Shorthand for `window(WindowCall::new(kind, spec, alias))`
    pub fn call(self, kind: WindowFunctionKind, spec: WindowSpec, alias: impl Into<String>) -> Self {
        self.window(WindowCall::new(kind, spec, alias))
    }

    /// Add a derived column
    pub fn derive(mut self, name: impl Into<String>, expr: Expr) -> Self {
        self.derived.push(DerivedColumn {
            name: name.into(),
            expr,
        });
        self
    }

    /// Set the post-filter; repeated calls are ANDed
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Add an outer ordering column
    pub fn order_by(mut self, key: SortKey) -> Self {
        self.order_by.push(key);
        self
    }
}

impl fmt::Display for WindowQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut items: Vec<String> = match &self.select {
            Some(cols) => cols.clone(),
            None => vec!["*".to_string()],
        };
        items.extend(self.windows.iter().map(|w| w.to_string()));
        items.extend(self.derived.iter().map(|d| format!("{} AS {}", d.expr, d.name)));
        write!(f, "SELECT {}", items.join(", "))?;
        if let Some(ref filter) = self.filter {
            write!(f, " QUALIFY {}", filter)?;
        }
        if !self.order_by.is_empty() {
            let keys: Vec<String> = self.order_by.iter().map(|k| k.to_string()).collect();
            write!(f, " ORDER BY {}", keys.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operator;

    #[test]
    fn test_builder() {
        let query = WindowQuery::new()
            .select(["product", "revenue"])
            .call(
                WindowFunctionKind::Rank,
                WindowSpec::new()
                    .partition_by("category")
                    .order_by(SortKey::desc("revenue")),
                "rnk",
            )
            .filter(Predicate::compare("rnk", Operator::Lte, 3i64))
            .filter(Predicate::is_not_null("revenue"))
            .order_by(SortKey::asc("rnk"));

        assert_eq!(query.windows.len(), 1);
        assert!(matches!(query.filter, Some(Predicate::And(..))));
        assert_eq!(
            query.to_string(),
            "SELECT product, revenue, RANK() OVER (PARTITION BY category ORDER BY revenue DESC) AS rnk \
             QUALIFY rnk <= 3 AND revenue IS NOT NULL ORDER BY rnk"
        );
    }
}
