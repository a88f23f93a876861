// src/table/project.rs

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use super::{Column, RawTable, REQUIRED_COLUMNS};
use crate::error::{ReportError, Result};

/// A [`RawTable`] restricted to the recognised columns.
///
/// `header` maps column name → dense index, in the order the columns appear in
/// the source header. Every row holds exactly `header.len()` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedTable {
    pub header: IndexMap<String, usize>,
    pub rows: Vec<Vec<String>>,
    /// Source line of each row, carried over from [`RawTable::lines`].
    pub lines: Vec<u64>,
}

/// Resolved position of every schema column inside a [`ProjectedTable`] row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    slots: [usize; REQUIRED_COLUMNS.len()],
}

impl ColumnIndex {
    /// Look every schema column up once. Fails with the full list of absent names.
    pub fn resolve(header: &IndexMap<String, usize>) -> Result<Self> {
        let mut slots = [0; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, col) in slots.iter_mut().zip(REQUIRED_COLUMNS) {
            match header.get(col.name()) {
                Some(&idx) => *slot = idx,
                None => missing.push(col.name().to_string()),
            }
        }
        if !missing.is_empty() {
            return Err(ReportError::Schema { missing });
        }
        Ok(Self { slots })
    }

    pub fn get(&self, col: Column) -> usize {
        // REQUIRED_COLUMNS lists the variants in declaration order
        self.slots[col as usize]
    }
}

impl ProjectedTable {
    pub fn column_index(&self) -> Result<ColumnIndex> {
        ColumnIndex::resolve(&self.header)
    }

    /// Columns shown in the per-group data table: everything except `Group` and `Failure`,
    /// in projected order.
    pub fn display_columns(&self) -> Vec<(&str, usize)> {
        self.header
            .iter()
            .filter(|(name, _)| !Column::from_name(name).is_some_and(Column::is_identifying))
            .map(|(name, &idx)| (name.as_str(), idx))
            .collect()
    }
}

/// Keep only the schema columns of `raw`, rebuilding dense indices.
///
/// - Non-schema columns are dropped.
/// - A schema column named twice keeps its first occurrence.
/// - Any schema column absent from the header is a [`ReportError::Schema`].
/// - A row too short to hold a kept column is a [`ReportError::Parse`].
#[tracing::instrument(level = "debug", skip_all, fields(columns = raw.headers.len()))]
pub fn project(raw: &RawTable) -> Result<ProjectedTable> {
    // (source index, name) of each kept column, in source order
    let mut kept: Vec<(usize, &str)> = Vec::with_capacity(REQUIRED_COLUMNS.len());
    for (src, name) in raw.headers.iter().enumerate() {
        if Column::from_name(name).is_none() {
            debug!(column = %name, "dropping unrecognised column");
            continue;
        }
        if kept.iter().any(|(_, k)| *k == name.as_str()) {
            warn!(column = %name, index = src, "duplicate column in header, keeping the first");
            continue;
        }
        kept.push((src, name.as_str()));
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !kept.iter().any(|(_, k)| *k == c.name()))
        .map(|c| c.name().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Schema { missing });
    }

    let header: IndexMap<String, usize> = kept
        .iter()
        .enumerate()
        .map(|(dense, (_, name))| (name.to_string(), dense))
        .collect();

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (idx, row) in raw.rows.iter().enumerate() {
        let line = raw.lines.get(idx).copied().unwrap_or(idx as u64 + 2);
        let mut projected = Vec::with_capacity(kept.len());
        for &(src, name) in &kept {
            let field = row.get(src).ok_or_else(|| {
                ReportError::Parse(format!(
                    "line {}: has {} fields, column `{}` needs at least {}",
                    line,
                    row.len(),
                    name,
                    src + 1
                ))
            })?;
            projected.push(field.clone());
        }
        rows.push(projected);
    }

    info!(
        kept = header.len(),
        dropped = raw.headers.len() - header.len(),
        rows = rows.len(),
        "projected table"
    );
    Ok(ProjectedTable {
        header,
        rows,
        lines: raw.lines.clone(),
    })
}
