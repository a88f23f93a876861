// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

/// Every way a conversion can fail. All of them are fatal to the run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("usage: {program} <input.csv> <output.html>")]
    Usage { program: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Parse(String),

    #[error("missing required column(s): {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("line {line}: column `{column}` has non-numeric value {value:?}")]
    NumericParse {
        column: String,
        value: String,
        line: u64,
    },

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("formatting report: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}
