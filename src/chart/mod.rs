// src/chart/mod.rs
pub mod render;

pub use render::{render_chart, render_group_charts, ChartSize};

use indexmap::IndexMap;

use crate::group::BenchmarkRecord;
use crate::table::Column;

/// A tracked performance metric; each one gets its own chart per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    UsPerIteration,
    IterationsPerSec,
    Baseline,
}

impl Metric {
    /// Period, frequency, baseline: the order charts appear in the report.
    pub const ALL: [Metric; 3] = [
        Metric::UsPerIteration,
        Metric::IterationsPerSec,
        Metric::Baseline,
    ];

    pub const fn column(self) -> Column {
        match self {
            Metric::UsPerIteration => Column::UsPerIteration,
            Metric::IterationsPerSec => Column::IterationsPerSec,
            Metric::Baseline => Column::Baseline,
        }
    }

    /// Y-axis label; the column header the values came from.
    pub const fn label(self) -> &'static str {
        self.column().name()
    }

    pub fn value(self, record: &BenchmarkRecord) -> f64 {
        match self {
            Metric::UsPerIteration => record.us_per_iteration,
            Metric::IterationsPerSec => record.iterations_per_sec,
            Metric::Baseline => record.baseline,
        }
    }
}

pub const X_AXIS_LABEL: &str = "Problem Space";

/// One experiment's line: `(problem space, metric)` points in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(i64, f64)>,
}

/// A rendered chart for one (group, metric) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub group: String,
    pub metric: Metric,
    pub svg: String,
}

/// Build one series per experiment, in first-seen order.
///
/// Points are appended in row order; repeated x values are kept.
pub fn build_series(records: &[BenchmarkRecord], metric: Metric) -> Vec<Series> {
    let mut lines: IndexMap<&str, Vec<(i64, f64)>> = IndexMap::new();
    for rec in records {
        lines
            .entry(rec.experiment.as_str())
            .or_default()
            .push((rec.problem_space, metric.value(rec)));
    }
    lines
        .into_iter()
        .map(|(name, points)| Series {
            name: name.to_string(),
            points,
        })
        .collect()
}
