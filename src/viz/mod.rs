//! Chart selection for query results.
//!
//! Picks a chart shape from the result's column types. This is best-effort:
//! returning no chart is a normal outcome, not an error.

use serde::{Deserialize, Serialize};

use crate::db::QueryResult;
use crate::error::Result;

/// Maximum category count for a bar chart to stay readable.
const MAX_BAR_ROWS: usize = 50;

/// The kind of chart suggested for a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Time series line chart.
    Line,
    /// Categorical bar chart.
    Bar,
    /// Two-variable scatter plot.
    Scatter,
    /// Single-variable distribution.
    Histogram,
}

impl ChartKind {
    /// Returns the kind as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
            Self::Scatter => "scatter",
            Self::Histogram => "histogram",
        }
    }
}

/// A chart suggestion: kind plus the columns to plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Chart shape.
    pub kind: ChartKind,

    /// Column for the x axis.
    pub x: String,

    /// Column for the y axis (absent for histograms).
    pub y: Option<String>,

    /// Human-readable chart title.
    pub title: String,
}

/// Best-effort chart selection for a query result.
pub trait Visualizer: Send + Sync {
    /// Suggests a chart for the results, or `None` when no heuristic fits.
    fn auto_visualize(&self, results: &QueryResult, question: &str) -> Result<Option<ChartSpec>>;
}

/// Rule-based visualizer driven by result column types.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicVisualizer;

impl HeuristicVisualizer {
    /// Creates a new heuristic visualizer.
    pub fn new() -> Self {
        Self
    }
}

impl Visualizer for HeuristicVisualizer {
    fn auto_visualize(&self, results: &QueryResult, _question: &str) -> Result<Option<ChartSpec>> {
        if results.is_empty() {
            return Ok(None);
        }

        let numeric: Vec<&str> = results
            .columns
            .iter()
            .filter(|c| is_numeric_type(&c.data_type))
            .map(|c| c.name.as_str())
            .collect();
        let datetime: Vec<&str> = results
            .columns
            .iter()
            .filter(|c| is_datetime_type(&c.data_type))
            .map(|c| c.name.as_str())
            .collect();
        let categorical: Vec<&str> = results
            .columns
            .iter()
            .filter(|c| !is_numeric_type(&c.data_type) && !is_datetime_type(&c.data_type))
            .map(|c| c.name.as_str())
            .collect();

        // Time series beats everything else.
        if let (Some(&x), Some(&y)) = (datetime.first(), numeric.first()) {
            return Ok(Some(ChartSpec {
                kind: ChartKind::Line,
                x: x.to_string(),
                y: Some(y.to_string()),
                title: format!("Time Series: {y} over {x}"),
            }));
        }

        if let (Some(&x), Some(&y)) = (categorical.first(), numeric.first()) {
            if results.rows.len() <= MAX_BAR_ROWS {
                return Ok(Some(ChartSpec {
                    kind: ChartKind::Bar,
                    x: x.to_string(),
                    y: Some(y.to_string()),
                    title: format!("{y} by {x}"),
                }));
            }
        }

        if numeric.len() >= 2 {
            let (x, y) = (numeric[0], numeric[1]);
            return Ok(Some(ChartSpec {
                kind: ChartKind::Scatter,
                x: x.to_string(),
                y: Some(y.to_string()),
                title: format!("{y} vs {x}"),
            }));
        }

        if numeric.len() == 1 {
            let x = numeric[0];
            return Ok(Some(ChartSpec {
                kind: ChartKind::Histogram,
                x: x.to_string(),
                y: None,
                title: format!("Distribution of {x}"),
            }));
        }

        Ok(None)
    }
}

/// Returns true for numeric Postgres type names.
fn is_numeric_type(data_type: &str) -> bool {
    matches!(
        data_type.to_lowercase().as_str(),
        "int2"
            | "int4"
            | "int8"
            | "smallint"
            | "int"
            | "integer"
            | "bigint"
            | "numeric"
            | "decimal"
            | "real"
            | "float4"
            | "float8"
            | "double precision"
    )
}

/// Returns true for date/time Postgres type names.
fn is_datetime_type(data_type: &str) -> bool {
    let lower = data_type.to_lowercase();
    lower == "date" || lower.starts_with("timestamp")
}
