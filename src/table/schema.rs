// src/table/schema.rs

use std::fmt;

/// A column the report understands. Header names are matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Group,
    Experiment,
    ProblemSpace,
    Failure,
    Baseline,
    UsPerIteration,
    IterationsPerSec,
}

/// The declared schema: every column a benchmark CSV must carry.
pub const REQUIRED_COLUMNS: [Column; 7] = [
    Column::Group,
    Column::Experiment,
    Column::ProblemSpace,
    Column::Failure,
    Column::Baseline,
    Column::UsPerIteration,
    Column::IterationsPerSec,
];

impl Column {
    pub const fn name(self) -> &'static str {
        match self {
            Column::Group => "Group",
            Column::Experiment => "Experiment",
            Column::ProblemSpace => "Problem Space",
            Column::Failure => "Failure",
            Column::Baseline => "Baseline",
            Column::UsPerIteration => "us/Iteration",
            Column::IterationsPerSec => "Iterations/sec",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        REQUIRED_COLUMNS.into_iter().find(|c| c.name() == name)
    }

    /// Identifying columns are consumed by grouping and never shown in the data table.
    pub const fn is_identifying(self) -> bool {
        matches!(self, Column::Group | Column::Failure)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
