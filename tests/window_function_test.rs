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

//! Window Function Tests
//!
//! Tests window functions: ROW_NUMBER, RANK, DENSE_RANK, NTILE, LAG, LEAD, etc.

use winframe::{
    row, DataType, Executor, FrameBound, Row, Schema, SchemaBuilder, SortKey, Value, WindowFrame,
    WindowFunctionKind, WindowQuery, WindowResult, WindowSpec,
};

fn employee_schema() -> Schema {
    SchemaBuilder::new()
        .add("id", DataType::Integer)
        .add("name", DataType::Text)
        .add("department", DataType::Text)
        .add("salary", DataType::Integer)
        .build()
}

fn employees() -> Vec<Row> {
    vec![
        row![1i64, "Alice", "Engineering", 85000i64],
        row![2i64, "Bob", "Engineering", 75000i64],
        row![3i64, "Charlie", "Engineering", 90000i64],
        row![4i64, "Diana", "Marketing", 65000i64],
        row![5i64, "Eve", "Marketing", 70000i64],
        row![6i64, "Frank", "Finance", 95000i64],
        row![7i64, "Grace", "Finance", 85000i64],
    ]
}

fn run(query: &WindowQuery) -> WindowResult {
    Executor::default()
        .execute(&employee_schema(), employees(), query)
        .expect("Failed to execute window query")
}

fn ints(result: &WindowResult, column: &str) -> Vec<i64> {
    result
        .column(column)
        .expect("Failed to read column")
        .iter()
        .map(|v| v.as_int64().expect("Expected an integer"))
        .collect()
}

fn floats(result: &WindowResult, column: &str) -> Vec<f64> {
    result
        .column(column)
        .expect("Failed to read column")
        .iter()
        .map(|v| v.as_float64().expect("Expected a number"))
        .collect()
}

fn texts(result: &WindowResult, column: &str) -> Vec<String> {
    result
        .column(column)
        .expect("Failed to read column")
        .iter()
        .map(|v| v.as_string().expect("Expected text"))
        .collect()
}

fn by_salary_desc() -> WindowSpec {
    WindowSpec::new().order_by(SortKey::desc("salary"))
}

fn by_department() -> WindowSpec {
    WindowSpec::new()
        .partition_by("department")
        .order_by(SortKey::desc("salary"))
}

/// Test ROW_NUMBER() without ordering follows input order
#[test]
fn test_row_number_function() {
    let query = WindowQuery::new().call(WindowFunctionKind::RowNumber, WindowSpec::new(), "row_num");
    let result = run(&query);
    assert_eq!(ints(&result, "row_num"), vec![1, 2, 3, 4, 5, 6, 7]);
}

/// Test ROW_NUMBER() breaks ties by input order
#[test]
fn test_row_number_ties_keep_input_order() {
    let query = WindowQuery::new().call(WindowFunctionKind::RowNumber, by_salary_desc(), "row_num");
    let result = run(&query);
    // Alice and Grace both earn 85000; Alice comes first in the input
    assert_eq!(ints(&result, "row_num"), vec![3, 5, 2, 7, 6, 1, 4]);
}

/// Test RANK() leaves gaps after ties
#[test]
fn test_rank_function() {
    let query = WindowQuery::new().call(WindowFunctionKind::Rank, by_salary_desc(), "rank_val");
    let result = run(&query);
    assert_eq!(ints(&result, "rank_val"), vec![3, 5, 2, 7, 6, 1, 3]);
}

/// Test DENSE_RANK() has no gaps
#[test]
fn test_dense_rank_function() {
    let query =
        WindowQuery::new().call(WindowFunctionKind::DenseRank, by_salary_desc(), "dense_val");
    let result = run(&query);
    assert_eq!(ints(&result, "dense_val"), vec![3, 4, 2, 6, 5, 1, 3]);
}

/// Test RANK() restarts in every partition
#[test]
fn test_rank_with_partition() {
    let query = WindowQuery::new().call(WindowFunctionKind::Rank, by_department(), "dept_rank");
    let result = run(&query);
    assert_eq!(ints(&result, "dept_rank"), vec![2, 3, 1, 2, 1, 1, 2]);
}

/// Test top-1 per department via a post-filter
#[test]
fn test_top_earner_per_department() {
    let query = WindowQuery::new()
        .select(["name", "department"])
        .call(WindowFunctionKind::RowNumber, by_department(), "rn")
        .filter(winframe::Predicate::compare("rn", winframe::Operator::Lte, 1i64));
    let result = run(&query);

    assert_eq!(result.column_names(), vec!["name", "department", "rn"]);
    assert_eq!(texts(&result, "name"), vec!["Charlie", "Eve", "Frank"]);
}

/// Test NTILE() bucket sizes
#[test]
fn test_ntile_function() {
    let query = WindowQuery::new().call(
        WindowFunctionKind::Ntile(3),
        WindowSpec::new().order_by(SortKey::asc("id")),
        "bucket",
    );
    let result = run(&query);
    assert_eq!(ints(&result, "bucket"), vec![1, 1, 1, 2, 2, 3, 3]);

    let query = WindowQuery::new().call(
        WindowFunctionKind::Ntile(10),
        WindowSpec::new().order_by(SortKey::asc("id")),
        "bucket",
    );
    let result = run(&query);
    assert_eq!(ints(&result, "bucket"), vec![1, 2, 3, 4, 5, 6, 7]);
}

/// Test PERCENT_RANK() and CUME_DIST() with ties
#[test]
fn test_distribution_with_ties() {
    let by_salary = WindowSpec::new().order_by(SortKey::asc("salary"));
    let query = WindowQuery::new()
        .call(WindowFunctionKind::PercentRank, by_salary.clone(), "pct")
        .call(WindowFunctionKind::CumeDist, by_salary, "cume");
    let result = run(&query);

    // Ascending ranks: Diana 1, Eve 2, Bob 3, Alice 4, Grace 4, Charlie 6, Frank 7
    let pct = floats(&result, "pct");
    let expected_pct = [3.0 / 6.0, 2.0 / 6.0, 5.0 / 6.0, 0.0, 1.0 / 6.0, 1.0, 3.0 / 6.0];
    for (got, want) in pct.iter().zip(expected_pct) {
        assert!((got - want).abs() < 1e-9, "Expected {}, got {}", want, got);
    }

    let cume = floats(&result, "cume");
    let expected_cume = [5.0 / 7.0, 3.0 / 7.0, 6.0 / 7.0, 1.0 / 7.0, 2.0 / 7.0, 1.0, 5.0 / 7.0];
    for (got, want) in cume.iter().zip(expected_cume) {
        assert!((got - want).abs() < 1e-9, "Expected {}, got {}", want, got);
    }
}

/// Test ranking functions without ORDER BY treat all rows as peers
#[test]
fn test_ranking_without_order() {
    let spec = WindowSpec::new().partition_by("department");
    let query = WindowQuery::new()
        .call(WindowFunctionKind::Rank, spec.clone(), "r")
        .call(WindowFunctionKind::DenseRank, spec.clone(), "dr")
        .call(WindowFunctionKind::PercentRank, spec.clone(), "pr")
        .call(WindowFunctionKind::CumeDist, spec, "cd");
    let result = run(&query);

    assert!(ints(&result, "r").iter().all(|&r| r == 1));
    assert!(ints(&result, "dr").iter().all(|&r| r == 1));
    assert!(floats(&result, "pr").iter().all(|&p| p == 0.0));
    assert!(floats(&result, "cd").iter().all(|&c| c == 1.0));
}

/// Test LAG() and LEAD() with offsets and defaults
#[test]
fn test_lag_lead_functions() {
    let by_id = WindowSpec::new().order_by(SortKey::asc("id"));
    let query = WindowQuery::new()
        .call(WindowFunctionKind::lag("salary"), by_id.clone(), "prev")
        .call(
            WindowFunctionKind::lead_by("salary", 2, Value::integer(0)),
            by_id.clone(),
            "next2",
        )
        .call(
            WindowFunctionKind::lag_by("name", 0, Value::null(DataType::Text)),
            by_id,
            "same",
        );
    let result = run(&query);

    let prev = result.column("prev").expect("Failed to read prev");
    assert!(prev[0].is_null());
    assert_eq!(prev[1], Value::integer(85000));
    assert_eq!(prev[6], Value::integer(95000));

    assert_eq!(
        ints(&result, "next2"),
        vec![90000, 65000, 70000, 95000, 85000, 0, 0]
    );
    assert_eq!(texts(&result, "same"), texts(&result, "name"));
}

/// Test LAG() stays inside its partition
#[test]
fn test_lag_with_partition() {
    let query = WindowQuery::new().call(WindowFunctionKind::lag("name"), by_department(), "above");
    let result = run(&query);
    let above = result.column("above").expect("Failed to read above");

    // Engineering by salary: Charlie, Alice, Bob
    assert_eq!(above[0], Value::text("Charlie"));
    assert_eq!(above[1], Value::text("Alice"));
    assert!(above[2].is_null());
    // Finance: Frank, Grace
    assert!(above[5].is_null());
    assert_eq!(above[6], Value::text("Frank"));
}

/// Test FIRST_VALUE(), LAST_VALUE() and NTH_VALUE() over frames
#[test]
fn test_value_functions() {
    let whole = by_department().frame(WindowFrame::rows(
        FrameBound::UnboundedPreceding,
        FrameBound::UnboundedFollowing,
    ));
    let query = WindowQuery::new()
        .call(WindowFunctionKind::FirstValue("name".into()), by_department(), "top")
        .call(WindowFunctionKind::LastValue("name".into()), by_department(), "last_so_far")
        .call(WindowFunctionKind::LastValue("name".into()), whole.clone(), "bottom")
        .call(WindowFunctionKind::NthValue("name".into(), 2), whole, "second");
    let result = run(&query);

    assert_eq!(
        texts(&result, "top"),
        vec!["Charlie", "Charlie", "Charlie", "Eve", "Eve", "Frank", "Frank"]
    );
    // Default frame ends at the current row's peer group
    assert_eq!(texts(&result, "last_so_far"), texts(&result, "name"));
    assert_eq!(
        texts(&result, "bottom"),
        vec!["Bob", "Bob", "Bob", "Diana", "Diana", "Grace", "Grace"]
    );
    assert_eq!(
        texts(&result, "second"),
        vec!["Alice", "Alice", "Alice", "Diana", "Diana", "Grace", "Grace"]
    );
}

/// Test NTH_VALUE() is NULL while the frame is too short
#[test]
fn test_nth_value_short_frame() {
    let query = WindowQuery::new().call(
        WindowFunctionKind::NthValue("name".into(), 2),
        by_department(),
        "second_so_far",
    );
    let result = run(&query);
    let second = result.column("second_so_far").expect("Failed to read column");
    // Charlie tops Engineering, so the running frame holds one row for him
    assert!(second[2].is_null());
    assert_eq!(second[0], Value::text("Alice"));
}

/// Test COUNT(), MIN() and MAX() over whole partitions
#[test]
fn test_partition_aggregates() {
    let spec = WindowSpec::new().partition_by("department");
    let query = WindowQuery::new()
        .call(WindowFunctionKind::Count(None), spec.clone(), "headcount")
        .call(WindowFunctionKind::Min("salary".into()), spec.clone(), "lowest")
        .call(WindowFunctionKind::Max("name".into()), spec, "last_name");
    let result = run(&query);

    assert_eq!(ints(&result, "headcount"), vec![3, 3, 3, 2, 2, 2, 2]);
    assert_eq!(
        ints(&result, "lowest"),
        vec![75000, 75000, 75000, 65000, 65000, 85000, 85000]
    );
    assert_eq!(
        texts(&result, "last_name"),
        vec!["Charlie", "Charlie", "Charlie", "Eve", "Eve", "Grace", "Grace"]
    );
}

/// Test outer ORDER BY over a window output
#[test]
fn test_outer_order_by_window_output() {
    let query = WindowQuery::new()
        .select(["name"])
        .call(WindowFunctionKind::DenseRank, by_salary_desc(), "dr")
        .order_by(SortKey::asc("dr"));
    let result = run(&query);
    assert_eq!(
        texts(&result, "name"),
        vec!["Frank", "Charlie", "Alice", "Grace", "Bob", "Eve", "Diana"]
    );
}

/// Test that the same query twice yields identical output
#[test]
fn test_evaluation_is_deterministic() {
    let query = WindowQuery::new()
        .call(WindowFunctionKind::Rank, by_department(), "r")
        .call(WindowFunctionKind::Ntile(2), by_salary_desc(), "half")
        .call(WindowFunctionKind::Avg("salary".into()), by_department(), "avg");
    assert_eq!(run(&query), run(&query));
}
