// src/group.rs

use std::str::FromStr;

use indexmap::IndexMap;
use tracing::info;

use crate::error::{ReportError, Result};
use crate::table::{Column, ColumnIndex, ProjectedTable};

/// One non-failed benchmark measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    pub group: String,
    pub experiment: String,
    pub problem_space: i64,
    pub failure: bool,
    pub baseline: f64,
    pub us_per_iteration: f64,
    pub iterations_per_sec: f64,
    /// The projected row text, shown as-is in the report table.
    pub fields: Vec<String>,
}

/// Retained records per group, groups in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedData {
    groups: IndexMap<String, Vec<BenchmarkRecord>>,
}

impl GroupedData {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, group: &str) -> Option<&[BenchmarkRecord]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[BenchmarkRecord])> {
        self.groups
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    fn push(&mut self, record: BenchmarkRecord) {
        self.groups
            .entry(record.group.clone())
            .or_default()
            .push(record);
    }
}

/// `1` means the measurement failed; anything else counts as a success.
pub fn parse_failure_flag(raw: &str) -> bool {
    raw.trim().parse::<i64>() == Ok(1)
}

fn parse_field<T: FromStr>(raw: &str, column: Column, line: u64) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ReportError::NumericParse {
            column: column.name().to_string(),
            value: raw.to_string(),
            line,
        })
}

fn parse_metric(raw: &str, column: Column, line: u64) -> Result<f64> {
    let value: f64 = parse_field(raw, column, line)?;
    if !value.is_finite() {
        return Err(ReportError::NumericParse {
            column: column.name().to_string(),
            value: raw.to_string(),
            line,
        });
    }
    Ok(value)
}

/// Partition the rows of `table` by `Group`, dropping failed rows entirely.
///
/// Numeric fields of retained rows are parsed here, once; the first bad value
/// aborts the whole grouping.
#[tracing::instrument(level = "debug", skip_all, fields(rows = table.rows.len()))]
pub fn group_records(table: &ProjectedTable) -> Result<GroupedData> {
    let idx: ColumnIndex = table.column_index()?;
    let mut grouped = GroupedData::default();
    let mut failed = 0usize;

    for (row_no, row) in table.rows.iter().enumerate() {
        // header is line 1
        let line = table.lines.get(row_no).copied().unwrap_or(row_no as u64 + 2);
        let field = move |col: Column| row[idx.get(col)].as_str();

        if parse_failure_flag(field(Column::Failure)) {
            failed += 1;
            continue;
        }

        grouped.push(BenchmarkRecord {
            group: field(Column::Group).to_string(),
            experiment: field(Column::Experiment).to_string(),
            problem_space: parse_field(field(Column::ProblemSpace), Column::ProblemSpace, line)?,
            failure: false,
            baseline: parse_metric(field(Column::Baseline), Column::Baseline, line)?,
            us_per_iteration: parse_metric(
                field(Column::UsPerIteration),
                Column::UsPerIteration,
                line,
            )?,
            iterations_per_sec: parse_metric(
                field(Column::IterationsPerSec),
                Column::IterationsPerSec,
                line,
            )?,
            fields: row.clone(),
        });
    }

    info!(
        groups = grouped.len(),
        retained = table.rows.len() - failed,
        failed,
        "grouped benchmark records"
    );
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{load_table, project};
    use std::io::Cursor;

    const HEADER: &str = "Group,Experiment,Problem Space,Failure,Baseline,us/Iteration,Iterations/sec\n";

    fn grouped(body: &str) -> Result<GroupedData> {
        let raw = load_table(Cursor::new(format!("{HEADER}{body}")))?;
        group_records(&project(&raw)?)
    }

    #[test]
    fn failure_flag_only_matches_one() {
        assert!(parse_failure_flag("1"));
        assert!(parse_failure_flag(" 1 "));
        assert!(!parse_failure_flag("0"));
        assert!(!parse_failure_flag(""));
        assert!(!parse_failure_flag("true"));
        assert!(!parse_failure_flag("11"));
    }

    #[test]
    fn failed_rows_never_reach_a_group() -> Result<()> {
        let data = grouped(
            "G1,E1,10,0,1.0,5.0,200\n\
             G1,E1,20,0,1.0,9.0,111\n\
             G1,E2,10,1,1.0,99,1\n\
             G2,E1,10,1,1.0,99,1\n",
        )?;

        assert_eq!(data.names().collect::<Vec<_>>(), vec!["G1"]);
        let g1 = data.get("G1").unwrap();
        assert_eq!(g1.len(), 2);
        assert!(g1.iter().all(|r| r.experiment == "E1" && !r.failure));
        assert!(data.get("G2").is_none());
        Ok(())
    }

    #[test]
    fn groups_keep_first_appearance_order() -> Result<()> {
        let data = grouped(
            "zeta,a,1,0,1,1,1\n\
             alpha,a,1,0,1,1,1\n\
             zeta,b,2,0,1,1,1\n\
             alpha,b,2,0,1,1,1\n",
        )?;

        assert_eq!(data.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        let zeta: Vec<&str> = data.get("zeta").unwrap().iter().map(|r| r.experiment.as_str()).collect();
        assert_eq!(zeta, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn order_follows_retained_rows_only() -> Result<()> {
        let data = grouped(
            "late,a,1,1,1,1,1\n\
             early,a,1,0,1,1,1\n\
             late,a,2,0,1,1,1\n",
        )?;
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["early", "late"]);
        Ok(())
    }

    #[test]
    fn group_keys_are_exact() -> Result<()> {
        let data = grouped(
            "sort,a,1,0,1,1,1\n\
             Sort,a,1,0,1,1,1\n\
             sort ,a,1,0,1,1,1\n",
        )?;
        assert_eq!(data.len(), 3);
        Ok(())
    }

    #[test]
    fn parses_numbers_and_keeps_text() -> Result<()> {
        let data = grouped("G,E, 64 ,0,1.5,2.25,444444.4\n")?;
        let rec = &data.get("G").unwrap()[0];

        assert_eq!(rec.problem_space, 64);
        assert_eq!(rec.baseline, 1.5);
        assert_eq!(rec.us_per_iteration, 2.25);
        assert_eq!(rec.iterations_per_sec, 444444.4);
        assert_eq!(rec.fields[2], " 64 ");
        Ok(())
    }

    #[test]
    fn bad_metric_aborts() {
        let err = grouped("G,E,10,0,1.0,NaN_typo,200\n").unwrap_err();
        match err {
            ReportError::NumericParse { column, value, line } => {
                assert_eq!(column, "us/Iteration");
                assert_eq!(value, "NaN_typo");
                assert_eq!(line, 2);
            }
            other => panic!("expected numeric error, got {other:?}"),
        }
    }

    #[test]
    fn numeric_error_names_the_source_line() {
        let err = grouped(
            "G,\"two\nline name\",10,0,1.0,1.0,1\n\
             G,E,10,0,1.0,bad,200\n",
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::NumericParse { line: 4, .. }), "got {err:?}");
        assert!(err.to_string().starts_with("line 4:"), "got {err}");
    }

    #[test]
    fn fractional_problem_space_is_rejected() {
        let err = grouped("G,E,1.5,0,1.0,1.0,1\n").unwrap_err();
        assert!(
            matches!(err, ReportError::NumericParse { ref column, .. } if column == "Problem Space"),
            "got {err:?}"
        );
    }

    #[test]
    fn non_finite_metric_is_rejected() {
        let err = grouped("G,E,1,0,inf,1.0,1\n").unwrap_err();
        assert!(matches!(err, ReportError::NumericParse { .. }), "got {err:?}");
    }

    #[test]
    fn junk_in_failed_row_is_ignored() -> Result<()> {
        let data = grouped(
            "G,E,1,0,1,1,1\n\
             G,E,oops,1,bad,worse,worst\n",
        )?;
        assert_eq!(data.get("G").unwrap().len(), 1);
        Ok(())
    }
}
