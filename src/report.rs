// src/report.rs

use std::{
    fmt::Write as FmtWrite,
    io::Write,
    path::Path,
};

use htmlize::escape_text;
use tempfile::NamedTempFile;
use tracing::info;

use crate::chart::{Chart, Metric};
use crate::error::{ReportError, Result};
use crate::group::GroupedData;

const STYLE: &str = r#"
table {
    margin: auto;
    border-spacing: 0px;
}

th, td {
    padding: 10px;
    border: 1px solid black;
}

svg {
    width: 100%;
    height: 75vh;
}
"#;

/// Build the report document.
///
/// For each group, in `grouped` order: its three charts (period, frequency,
/// baseline), then a table of its retained rows restricted to `columns`
/// (`(header name, projected index)` pairs).
pub fn render_html(
    title: &str,
    grouped: &GroupedData,
    columns: &[(&str, usize)],
    charts: &[Chart],
) -> Result<String> {
    let mut html = String::with_capacity(charts.iter().map(|c| c.svg.len()).sum::<usize>() + 4096);

    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html>")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>{}</title>", escape_text(title))?;
    writeln!(html, "<style>{}</style>", STYLE)?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    for (group, records) in grouped.iter() {
        writeln!(html, "<section>")?;
        writeln!(html, "<h2>{}</h2>", escape_text(group))?;

        for metric in Metric::ALL {
            if let Some(chart) = charts
                .iter()
                .find(|c| c.group == group && c.metric == metric)
            {
                writeln!(html, "<div>{}</div>", chart.svg)?;
            }
        }

        writeln!(html, "<table>")?;
        write!(html, "<tr>")?;
        for (name, _) in columns {
            write!(html, "<th>{}</th>", escape_text(*name))?;
        }
        writeln!(html, "</tr>")?;

        for rec in records {
            write!(html, "<tr>")?;
            for &(_, idx) in columns {
                let cell = rec.fields.get(idx).map(String::as_str).unwrap_or("");
                write!(html, "<td>{}</td>", escape_text(cell))?;
            }
            writeln!(html, "</tr>")?;
        }
        writeln!(html, "</table>")?;
        writeln!(html, "</section>")?;
    }

    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    Ok(html)
}

/// Write `html` to `path` atomically: a temp file next to the target is filled,
/// then renamed over it. On any error the target is left untouched.
#[tracing::instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), bytes = html.len()))]
pub fn write_report<P: AsRef<Path>>(path: P, html: &str) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ReportError::io(dir, e))?;
    tmp.write_all(html.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ReportError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| ReportError::io(path, e.error))?;

    info!("wrote report");
    Ok(())
}
