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

//! Winframe CLI - window-function analyses over a toy retail dataset
//!

mod dataset;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use tracing_subscriber::EnvFilter;

use winframe::{
    EngineConfig, Executor, Expr, Result, SortKey, Value, WindowFrame, WindowFunctionKind,
    WindowQuery, WindowResult, WindowSpec,
};

/// Version string constant
const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR"),
    ".",
    env!("CARGO_PKG_VERSION_PATCH")
);

/// Winframe window-function demo
#[derive(Parser, Debug)]
#[command(name = "winframe")]
#[command(author = "Winframe Contributors")]
#[command(version = VERSION)]
#[command(about = "Window-function analyses over a small retail dataset")]
#[command(
    long_about = "Runs ranking, running-total, growth, segmentation and moving-average\n\
analyses over five customers, five products and five transactions.\n\n\
ENGINE CONFIG:\n\
  parallel=on|off               Evaluate partitions with rayon (default: on)\n\
  parallel_min_partitions=N     Partitions needed before going parallel (default: 4)\n\
  parallel_min_rows=N           Rows needed before going parallel (default: 1024)\n\n\
EXAMPLES:\n\
  winframe running\n\
  winframe --json segments\n\
  winframe --config parallel=off all"
)]
struct Args {
    /// Output results in JSON format
    #[arg(short = 'j', long = "json", default_value = "false")]
    json_output: bool,

    /// Engine settings as key=value&key=value
    #[arg(short = 'c', long = "config", default_value = "")]
    config: String,

    #[command(subcommand)]
    analysis: Analysis,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Analysis {
    /// Product revenue ranked within its category
    Products,
    /// Monthly sales with a running total
    Running,
    /// Month-over-month sales growth
    Growth,
    /// Customer spend quartiles and distribution
    Segments,
    /// Three-month moving average of sales
    Moving,
    /// Every analysis
    All,
}

impl Analysis {
    const EACH: [Analysis; 5] = [
        Analysis::Products,
        Analysis::Running,
        Analysis::Growth,
        Analysis::Segments,
        Analysis::Moving,
    ];

    fn title(self) -> &'static str {
        match self {
            Analysis::Products => "Product revenue by category",
            Analysis::Running => "Monthly sales running total",
            Analysis::Growth => "Month-over-month growth",
            Analysis::Segments => "Customer spend segments",
            Analysis::Moving => "Three-month moving average",
            Analysis::All => "All analyses",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Analysis::Products => "products",
            Analysis::Running => "running",
            Analysis::Growth => "growth",
            Analysis::Segments => "segments",
            Analysis::Moving => "moving",
            Analysis::All => "all",
        }
    }
}

fn run(executor: &Executor, analysis: Analysis) -> Result<WindowResult> {
    match analysis {
        Analysis::Products => {
            let (schema, rows) = dataset::product_revenue();
            let by_revenue = WindowSpec::new()
                .partition_by("category")
                .order_by(SortKey::desc("revenue"));
            let query = WindowQuery::new()
                .call(WindowFunctionKind::Rank, by_revenue.clone(), "revenue_rank")
                .call(WindowFunctionKind::DenseRank, by_revenue, "dense_rank")
                .order_by(SortKey::asc("category"))
                .order_by(SortKey::asc("revenue_rank"));
            executor.execute(&schema, rows, &query)
        }
        Analysis::Running => {
            let (schema, rows) = dataset::monthly_sales()?;
            let query = WindowQuery::new().call(
                WindowFunctionKind::Sum("sales".into()),
                by_month().frame(WindowFrame::running_rows()),
                "running_total",
            );
            executor.execute(&schema, rows, &query)
        }
        Analysis::Growth => {
            let (schema, rows) = dataset::monthly_sales()?;
            let query = WindowQuery::new()
                .call(WindowFunctionKind::lag("sales"), by_month(), "previous_sales")
                .derive("growth_pct", Expr::growth_percent("sales", "previous_sales"));
            executor.execute(&schema, rows, &query)
        }
        Analysis::Segments => {
            let (schema, rows) = dataset::customer_spend();
            let by_spend = WindowSpec::new().order_by(SortKey::asc("spend"));
            let query = WindowQuery::new()
                .call(
                    WindowFunctionKind::Ntile(4),
                    WindowSpec::new().order_by(SortKey::desc("spend")),
                    "quartile",
                )
                .call(WindowFunctionKind::CumeDist, by_spend.clone(), "cume_dist")
                .call(WindowFunctionKind::PercentRank, by_spend, "percent_rank")
                .order_by(SortKey::desc("spend"));
            executor.execute(&schema, rows, &query)
        }
        Analysis::Moving => {
            let (schema, rows) = dataset::monthly_sales()?;
            let query = WindowQuery::new()
                .call(
                    WindowFunctionKind::Avg("sales".into()),
                    by_month().frame(WindowFrame::trailing_rows(2)),
                    "moving_avg",
                )
                .derive("moving_avg_rounded", Expr::column("moving_avg").round(2));
            executor.execute(&schema, rows, &query)
        }
        Analysis::All => Err(winframe::Error::invalid_argument(
            "'all' expands to the individual analyses",
        )),
    }
}

fn by_month() -> WindowSpec {
    WindowSpec::new().order_by(SortKey::asc("month"))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null(_) => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => {
            if *f == f.trunc() {
                format!("{:.1}", f)
            } else {
                format!("{:.4}", f)
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .to_string()
            }
        }
        Value::Text(s) => s.to_string(),
        Value::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Timestamp(ts) => ts.format("%Y-%m-%d").to_string(),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null(_) => serde_json::Value::Null,
        Value::Integer(i) => serde_json::json!(i),
        Value::Float(f) => serde_json::json!(f),
        Value::Text(s) => serde_json::json!(s.as_ref()),
        Value::Boolean(b) => serde_json::json!(b),
        Value::Timestamp(ts) => serde_json::json!(ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()),
    }
}

fn output_json(analysis: Analysis, result: &WindowResult) -> std::result::Result<(), String> {
    let rows: Vec<Vec<serde_json::Value>> = result
        .rows()
        .iter()
        .map(|row| row.iter().map(value_to_json).collect())
        .collect();

    let document = serde_json::json!({
        "analysis": analysis.name(),
        "columns": result.column_names(),
        "rows": rows,
        "count": result.row_count()
    });

    println!(
        "{}",
        serde_json::to_string(&document).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn output_table(analysis: Analysis, result: &WindowResult) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(result.column_names().into_iter().map(Cell::new));
    for row in result.rows() {
        table.add_row(row.iter().map(|v| Cell::new(format_value(v))));
    }

    println!("\x1b[1m{}\x1b[0m", analysis.title());
    println!("{table}");
    let row_text = if result.row_count() == 1 { "row" } else { "rows" };
    println!("\x1b[1;32m{} {}\x1b[0m", result.row_count(), row_text);
    println!();
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match EngineConfig::parse(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let executor = Executor::new(config);

    let analyses: Vec<Analysis> = match args.analysis {
        Analysis::All => Analysis::EACH.to_vec(),
        single => vec![single],
    };

    for analysis in analyses {
        let result = match run(&executor, analysis) {
            Ok(result) => result,
            Err(e) => {
                eprintln!("Error in {}: {}", analysis.name(), e);
                return ExitCode::FAILURE;
            }
        };

        if args.json_output {
            if let Err(e) = output_json(analysis, &result) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        } else {
            output_table(analysis, &result);
        }
    }

    ExitCode::SUCCESS
}
