// src/pipeline.rs

use std::{io::Cursor, path::Path, time::Instant};

use tracing::info;

use crate::chart::render_group_charts;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::group::group_records;
use crate::report::{render_html, write_report};
use crate::table::{load_table, load_table_file, project, RawTable};

fn build_report(raw: &RawTable, config: &ReportConfig) -> Result<String> {
    let table = project(raw)?;
    let grouped = group_records(&table)?;
    let charts = render_group_charts(&grouped, config.chart_size(), config.parallel)?;
    render_html(&config.title, &grouped, &table.display_columns(), &charts)
}

/// Run the whole conversion on in-memory CSV text and return the HTML document.
pub fn convert_str(csv: &str, config: &ReportConfig) -> Result<String> {
    let raw = load_table(Cursor::new(csv))?;
    build_report(&raw, config)
}

/// Read `input`, build the report, and write it to `output`.
///
/// The output file is only touched once the complete document exists in memory.
#[tracing::instrument(level = "info", skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q, config: &ReportConfig) -> Result<()> {
    let start = Instant::now();
    let raw = load_table_file(input)?;
    let html = build_report(&raw, config)?;
    write_report(output, &html)?;
    info!(elapsed = ?start.elapsed(), "report complete");
    Ok(())
}
