// src/chart/render.rs

use std::ops::Range;

use plotters::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

use super::{build_series, Chart, Metric, Series, X_AXIS_LABEL};
use crate::error::{ReportError, Result};
use crate::group::{BenchmarkRecord, GroupedData};

/// Pixel size of one SVG chart (the report stylesheet rescales it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

/// Render a labelled multi-line chart to an SVG string.
pub fn render_chart(title: &str, metric: Metric, series: &[Series], size: ChartSize) -> Result<String> {
    let mut svg = String::new();
    draw(&mut svg, title, metric, series, size)
        .map_err(|e| ReportError::Render(format!("{} / {}: {}", title, metric.label(), e)))?;
    Ok(svg)
}

fn draw(
    svg: &mut String,
    title: &str,
    metric: Metric,
    series: &[Series],
    size: ChartSize,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let points = || series.iter().flat_map(|s| s.points.iter());
    let x_range = x_axis(points().map(|&(x, _)| x));
    let y_range = y_axis(points().map(|&(_, y)| y))
        .ok_or("values span more than the f64 range")?;

    let root = SVGBackend::with_string(svg, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(X_AXIS_LABEL)
        .y_desc(metric.label())
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()?;

    for (i, line) in series.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(LineSeries::new(
                line.points.iter().map(|&(x, y)| (x as f64, y)),
                color.stroke_width(2),
            ))?
            .label(line.name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Integer problem spaces; a single x value gets one unit either side.
fn x_axis(values: impl Iterator<Item = i64>) -> Range<f64> {
    let (lo, hi) = values.fold((i64::MAX, i64::MIN), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo as f64 - 1.0)..(hi as f64 + 1.0);
    }
    lo as f64..hi as f64
}

/// 5% headroom above and below; a flat line is padded around its value.
///
/// Ends are clamped to finite `f64`s. `None` when the span between them still
/// overflows.
fn y_axis(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return Some(0.0..1.0);
    }
    let pad = if hi > lo {
        hi * 0.05 - lo * 0.05
    } else if lo != 0.0 {
        lo.abs() * 0.05
    } else {
        1.0
    };
    let range = (lo - pad).max(f64::MIN)..(hi + pad).min(f64::MAX);
    (range.end - range.start).is_finite().then_some(range)
}

fn render_job(group: &str, records: &[BenchmarkRecord], metric: Metric, size: ChartSize) -> Result<Chart> {
    let series = build_series(records, metric);
    debug!(group, metric = metric.label(), series = series.len(), "rendering chart");
    Ok(Chart {
        group: group.to_string(),
        metric,
        svg: render_chart(group, metric, &series, size)?,
    })
}

/// Render every (group, metric) chart.
///
/// The result is ordered group-then-metric whether or not the work ran in parallel.
#[tracing::instrument(level = "debug", skip(grouped), fields(groups = grouped.len()))]
pub fn render_group_charts(grouped: &GroupedData, size: ChartSize, parallel: bool) -> Result<Vec<Chart>> {
    let jobs: Vec<(&str, &[BenchmarkRecord], Metric)> = grouped
        .iter()
        .flat_map(|(group, records)| Metric::ALL.into_iter().map(move |m| (group, records, m)))
        .collect();

    let charts = if parallel {
        jobs.par_iter()
            .map(|&(group, records, metric)| render_job(group, records, metric, size))
            .collect::<Result<Vec<_>>>()?
    } else {
        jobs.iter()
            .map(|&(group, records, metric)| render_job(group, records, metric, size))
            .collect::<Result<Vec<_>>>()?
    };

    info!(charts = charts.len(), parallel, "rendered charts");
    Ok(charts)
}
