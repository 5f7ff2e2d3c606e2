//! SVG chart rendering with plotters, styled with the dashboard palette

use std::ops::Range;

use chrono::{DateTime, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::config::Palette;
use crate::models::SeriesTable;
use crate::utils::errors::DashboardError;

pub const MAIN_SIZE: (u32, u32) = (960, 420);
pub const HALF_SIZE: (u32, u32) = (470, 340);

const FONT: &str = "sans-serif";

type Root<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn millis(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

fn format_millis(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.naive_utc().format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn text(palette: &Palette, size: u32) -> TextStyle<'static> {
    (FONT, size).into_font().color(&palette.text)
}

/// Time span of the table, widened by an hour when every row shares one instant
fn time_range(table: &SeriesTable) -> Result<Range<i64>, DashboardError> {
    let mut stamps = table.rows().iter().map(|r| millis(&r.timestamp));
    let first = stamps
        .next()
        .ok_or_else(|| DashboardError::Render("No rows to plot".to_string()))?;
    let (min, max) = stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
    if min == max {
        return Ok(min - 3_600_000..max + 3_600_000);
    }
    Ok(min..max)
}

/// Value span over finite values with 10% padding, optionally forced to include zero
fn value_range<I>(values: I, include_zero: bool) -> Result<Range<f64>, DashboardError>
where
    I: IntoIterator<Item = f64>,
{
    let (mut min, mut max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() {
        return Err(DashboardError::Render("No finite values to plot".to_string()));
    }
    if include_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }

    let padding = (max - min).max(1e-8) * 0.1;
    let lower = if include_zero && min == 0.0 { 0.0 } else { min - padding };
    Ok(lower..max + padding)
}

/// Render into an in-memory SVG document
fn render_svg<F>(size: (u32, u32), palette: &Palette, draw: F) -> Result<String, DashboardError>
where
    F: FnOnce(&Root<'_>) -> Result<(), String>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&palette.surface)
            .map_err(|e| DashboardError::Render(format!("Failed to fill canvas: {}", e)))?;
        draw(&root).map_err(DashboardError::Render)?;
        root.present()
            .map_err(|e| DashboardError::Render(format!("Failed to render chart: {}", e)))?;
    }
    Ok(svg)
}

/// Multi-series line chart over time, one colour per series label
pub fn line_chart(table: &SeriesTable, title: &str, y_desc: &str, palette: &Palette) -> Result<String, DashboardError> {
    time_series_chart(table, title, y_desc, palette, MAIN_SIZE, false)
}

/// Filled area chart over time, one layer per series label
pub fn area_chart(table: &SeriesTable, title: &str, y_desc: &str, palette: &Palette) -> Result<String, DashboardError> {
    time_series_chart(table, title, y_desc, palette, HALF_SIZE, true)
}

fn time_series_chart(
    table: &SeriesTable,
    title: &str,
    y_desc: &str,
    palette: &Palette,
    size: (u32, u32),
    filled: bool,
) -> Result<String, DashboardError> {
    let x_range = time_range(table)?;
    let y_range = value_range(table.rows().iter().map(|r| r.value), false)?;
    let labels = table.labels();
    let baseline = y_range.start;

    render_svg(size, palette, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, text(palette, 18))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| format!("Failed to build chart: {}", e))?;

        chart
            .configure_mesh()
            .bold_line_style(palette.text_secondary.mix(0.3))
            .light_line_style(TRANSPARENT)
            .axis_style(palette.text_secondary)
            .label_style(text(palette, 12))
            .axis_desc_style(text(palette, 13))
            .x_labels(6)
            .x_label_formatter(&|ms| format_millis(*ms))
            .x_desc("Date")
            .y_desc(y_desc)
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {}", e))?;

        for (i, label) in labels.iter().enumerate() {
            let color = palette.series_color(i);
            let points: Vec<(i64, f64)> = table
                .series(label)
                .filter(|r| r.value.is_finite())
                .map(|r| (millis(&r.timestamp), r.value))
                .collect();

            let anno = if filled {
                chart
                    .draw_series(AreaSeries::new(points, baseline, color.mix(0.25)).border_style(color.stroke_width(2)))
                    .map_err(|e| format!("Failed to draw area for {}: {}", label, e))?
            } else {
                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(|e| format!("Failed to draw line for {}: {}", label, e))?
            };
            anno.label(*label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(palette.background)
            .border_style(palette.text_secondary)
            .label_font(text(palette, 12))
            .draw()
            .map_err(|e| format!("Failed to draw legend: {}", e))?;

        Ok(())
    })
}

/// Bar per row over time (e.g. hourly precipitation), single colour
pub fn time_bar_chart(table: &SeriesTable, title: &str, y_desc: &str, palette: &Palette) -> Result<String, DashboardError> {
    let x_range = time_range(table)?;
    let y_range = value_range(table.rows().iter().map(|r| r.value), true)?;

    // bars are 40 minutes wide, centred on the timestamp
    let half_width = 20 * 60 * 1000;
    let x_range = x_range.start - half_width..x_range.end + half_width;

    render_svg(HALF_SIZE, palette, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, text(palette, 18))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)
            .map_err(|e| format!("Failed to build chart: {}", e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(palette.text_secondary.mix(0.3))
            .light_line_style(TRANSPARENT)
            .axis_style(palette.text_secondary)
            .label_style(text(palette, 12))
            .axis_desc_style(text(palette, 13))
            .x_labels(5)
            .x_label_formatter(&|ms| format_millis(*ms))
            .x_desc("Date")
            .y_desc(y_desc)
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {}", e))?;

        let color = palette.primary;
        chart
            .draw_series(table.rows().iter().filter(|r| r.value.is_finite()).map(|r| {
                let t = millis(&r.timestamp);
                Rectangle::new(
                    [(t - half_width, r.value.max(0.0)), (t + half_width, r.value.min(0.0))],
                    color.filled(),
                )
            }))
            .map_err(|e| format!("Failed to draw bars: {}", e))?;

        Ok(())
    })
}

/// One bar per category (e.g. total change per coin)
pub fn category_bar_chart(
    bars: &[(String, f64)],
    title: &str,
    y_desc: &str,
    palette: &Palette,
) -> Result<String, DashboardError> {
    if bars.is_empty() {
        return Err(DashboardError::Render("No bars to plot".to_string()));
    }
    let y_range = value_range(bars.iter().map(|(_, v)| *v), true)?;
    let names: Vec<String> = bars.iter().map(|(name, _)| name.clone()).collect();
    let count = bars.len() as u32;

    render_svg(HALF_SIZE, palette, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, text(palette, 18))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..count).into_segmented(), y_range)
            .map_err(|e| format!("Failed to build chart: {}", e))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(palette.text_secondary.mix(0.3))
            .light_line_style(TRANSPARENT)
            .axis_style(palette.text_secondary)
            .label_style(text(palette, 12))
            .axis_desc_style(text(palette, 13))
            .x_labels(bars.len())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc(y_desc)
            .draw()
            .map_err(|e| format!("Failed to draw mesh: {}", e))?;

        chart
            .draw_series(bars.iter().enumerate().filter(|(_, (_, v))| v.is_finite()).map(|(i, (_, v))| {
                let i = i as u32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), v.max(0.0)),
                        (SegmentValue::Exact(i + 1), v.min(0.0)),
                    ],
                    palette.series_color(i as usize).filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))
            .map_err(|e| format!("Failed to draw bars: {}", e))?;

        Ok(())
    })
}

/// Blank chart carrying only `message`, used when data is unavailable
pub fn placeholder_chart(message: &str, size: (u32, u32), palette: &Palette) -> Result<String, DashboardError> {
    render_svg(size, palette, |root| {
        let (width, height) = root.dim_in_pixel();
        let style = (FONT, 16)
            .into_font()
            .color(&palette.text_secondary)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(message, ((width / 2) as i32, (height / 2) as i32), style))
            .map_err(|e| format!("Failed to draw message: {}", e))
    })
}
