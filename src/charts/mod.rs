//! CN-010: Chart rendering — one plotters sink per aggregate.
//!
//! Every renderer owns its canvas for the duration of one call: the
//! drawing area is created, presented, and released before the function
//! returns, so no chart's backing memory outlives its aggregate.

use plotters::prelude::*;
use std::path::Path;

use crate::core::aggregate::{DayCount, HistogramBin, NamedCount, ScatterPoint};

fn chart_err<E: std::fmt::Display>(e: E) -> String {
    format!("chart render error: {}", e)
}

/// Vertical bar chart over ranked (label, count) pairs.
pub fn render_bar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    data: &[NamedCount],
    size: (u32, u32),
) -> Result<(), String> {
    if data.is_empty() {
        return Err("no data to render".to_string());
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let max = data.iter().map(|d| d.count).max().unwrap_or(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(110)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..data.len() as i32, 0f64..max + 1.0)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(data.len())
        .x_label_formatter(&|idx: &i32| {
            data.get(*idx as usize)
                .map(|d| d.name.clone())
                .unwrap_or_default()
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(data.iter().enumerate().map(|(i, d)| {
            Rectangle::new(
                [(i as i32, 0.0), (i as i32 + 1, d.count as f64)],
                BLUE.filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Histogram over pre-computed equal-width bins.
pub fn render_histogram(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bins: &[HistogramBin],
) -> Result<(), String> {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err("no data to render".to_string());
    };

    let root = BitMapBackend::new(path, (800, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let max = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64;
    let span = (last.hi - first.lo).max(1.0);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(first.lo..first.lo + span, 0f64..max + 1.0)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(bins.iter().map(|b| {
            let hi = if b.hi > b.lo { b.hi } else { b.lo + span };
            Rectangle::new([(b.lo, 0.0), (hi, b.count as f64)], BLUE.filled())
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Scatter plot, one circle per point.
pub fn render_scatter(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[ScatterPoint],
) -> Result<(), String> {
    if points.is_empty() {
        return Err("no data to render".to_string());
    }

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let max_x = points
        .iter()
        .map(|p| p.prep_time_min)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);
    let max_y = points.iter().map(|p| p.like_count).max().unwrap_or(0) as f64;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_x * 1.05, 0f64..max_y + 1.0)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.prep_time_min, p.like_count as f64), 4, BLUE.filled())),
        )
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Horizontal bar chart over ranked (label, count) pairs.
pub fn render_hbar_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    data: &[NamedCount],
) -> Result<(), String> {
    if data.is_empty() {
        return Err("no data to render".to_string());
    }

    let root = BitMapBackend::new(path, (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let max = data.iter().map(|d| d.count).max().unwrap_or(1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(110)
        .build_cartesian_2d(0f64..max + 1.0, 0i32..data.len() as i32)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .y_labels(data.len())
        .y_label_formatter(&|idx: &i32| {
            data.get(*idx as usize)
                .map(|d| d.name.clone())
                .unwrap_or_default()
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(data.iter().enumerate().map(|(i, d)| {
            Rectangle::new(
                [(0.0, i as i32), (d.count as f64, i as i32 + 1)],
                BLUE.filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}

/// Line chart of daily counts; x axis is the day index labeled with the
/// ISO date.
pub fn render_line_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    days: &[DayCount],
) -> Result<(), String> {
    if days.is_empty() {
        return Err("no data to render".to_string());
    }

    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let max = days.iter().map(|d| d.count).max().unwrap_or(1) as f64;
    let x_max = (days.len() as i32 - 1).max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..x_max, 0f64..max + 1.0)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(days.len().min(12))
        .x_label_formatter(&|idx: &i32| {
            days.get(*idx as usize)
                .map(|d| d.date.to_string())
                .unwrap_or_default()
        })
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            days.iter()
                .enumerate()
                .map(|(i, d)| (i as i32, d.count as f64)),
            &BLUE,
        ))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)
}
