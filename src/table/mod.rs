// src/table/mod.rs
pub mod project;
pub mod schema;

pub use project::{project, ColumnIndex, ProjectedTable};
pub use schema::{Column, REQUIRED_COLUMNS};

use std::{fs::File, io::Read, path::Path};

use csv::ReaderBuilder;
use tracing::{debug, info};

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Field names from the first record of the file.
    pub headers: Vec<String>,
    /// Every following record, one `String` per field, in file order.
    pub rows: Vec<Vec<String>>,
    /// 1-based source line on which each row starts, parallel to `rows`.
    pub lines: Vec<u64>,
}

/// Parse delimited text into a [`RawTable`].
///
/// Records may have differing field counts; whether that matters is decided
/// by the projector, which knows which columns it needs.
pub fn load_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut lines = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .map_err(|e| ReportError::Parse(format!("record {}: {}", idx + 1, e)))?;
        let fields: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        match headers {
            None => headers = Some(fields),
            Some(_) => {
                let line = record.position().map_or(idx as u64 + 1, |p| p.line());
                lines.push(line);
                rows.push(fields);
            }
        }
    }

    let headers = headers.unwrap_or_default();
    debug!(columns = headers.len(), rows = rows.len(), "parsed table");
    Ok(RawTable { headers, rows, lines })
}

/// Open `path` and parse it with [`load_table`]. The file handle is released on return.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table_file<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ReportError::io(path, e))?;
    let table = load_table(file)?;
    info!(rows = table.rows.len(), "loaded benchmark table");
    Ok(table)
}
