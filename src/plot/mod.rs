//! SVG chart rendering with Plotters.
//!
//! Charts are drawn server-side into SVG strings so the dashboard page can
//! inline them. Each renderer is data-driven: all series, bounds, and labels
//! come from the report types, and the render call only draws.

use std::ops::Range;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::AppError;
use crate::report::Report;

pub mod bar;
pub mod boxplot;
pub mod scatter;

pub use bar::render_grouped_bar;
pub use boxplot::{render_box, render_faceted_box};
pub use scatter::render_scatter;

pub(crate) type DrawResult = Result<(), Box<dyn std::error::Error>>;

/// Qualitative palette for color groups (cycled).
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(99, 110, 250),
    RGBColor(239, 85, 59),
    RGBColor(0, 204, 150),
    RGBColor(171, 99, 250),
    RGBColor(255, 161, 90),
    RGBColor(25, 211, 243),
    RGBColor(255, 102, 146),
    RGBColor(182, 232, 128),
    RGBColor(255, 151, 255),
    RGBColor(254, 203, 82),
];

pub fn label_font() -> FontDesc<'static> {
    ("sans-serif", 13).into_font()
}

/// Size and labels of a single chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub width: u32,
    pub height: u32,
    pub x_desc: String,
    pub y_desc: String,
}

impl ChartSpec {
    pub fn new(width: u32, height: u32, x_desc: impl Into<String>, y_desc: impl Into<String>) -> Self {
        Self {
            width,
            height,
            x_desc: x_desc.into(),
            y_desc: y_desc.into(),
        }
    }
}

pub fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Fixed colors used by the prestige-level facet grid.
pub fn sex_color(group: &str) -> RGBColor {
    match group {
        "male" => RGBColor(0, 128, 0),
        "female" => RGBColor(128, 0, 128),
        _ => RGBColor(128, 128, 128),
    }
}

/// The static chart set shown on the dashboard, as inline SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticCharts {
    pub breadwinner_bar: String,
    pub prestige_income_scatter: String,
    pub income_box: String,
    pub prestige_box: String,
    pub income_by_prestige_grid: String,
}

/// Render every static chart of the report.
pub fn render_static_charts(report: &Report) -> Result<StaticCharts, AppError> {
    let breadwinner_bar = render_grouped_bar(
        &report.breadwinner_counts,
        &ChartSpec::new(900, 450, "Level of Agreement", "Number of People"),
    )?;
    let prestige_income_scatter = render_scatter(
        &report.prestige_income_scatter,
        &ChartSpec::new(600, 600, "Occupational Prestige", "Income"),
    )?;
    let income_box = render_box(&report.income_box, &ChartSpec::new(480, 360, "Income", ""))?;
    let prestige_box = render_box(
        &report.prestige_box,
        &ChartSpec::new(480, 360, "Occupational Prestige", ""),
    )?;
    let income_by_prestige_grid = render_faceted_box(
        &report.income_by_prestige_level,
        &ChartSpec::new(900, 780, "Income", "Sex"),
    )?;

    Ok(StaticCharts {
        breadwinner_bar,
        prestige_income_scatter,
        income_box,
        prestige_box,
        income_by_prestige_grid,
    })
}

/// Draw into a fresh SVG document and return its text.
pub(crate) fn render_svg<F>(width: u32, height: u32, draw: F) -> Result<String, AppError>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> DrawResult,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        draw(&root).map_err(|e| AppError::runtime(format!("Chart rendering failed: {e}")))?;
        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

fn render_err(e: impl std::fmt::Display) -> AppError {
    AppError::runtime(format!("Chart rendering failed: {e}"))
}

/// Axis range for `n` unit-wide category slots centered on `0, 1, ..., n-1`.
///
/// With `n` requested labels the mesh puts its ticks exactly on the integers,
/// so each slot gets one label.
pub(crate) fn category_range(n: usize) -> Range<f64> {
    -0.5..n as f64 - 0.5
}

/// Label of the category slot centered at `v`; empty between slots.
pub(crate) fn category_label(categories: &[String], v: f64) -> String {
    let slot = v.round();
    if slot < 0.0 || (v - slot).abs() > 1e-6 {
        return String::new();
    }
    categories.get(slot as usize).cloned().unwrap_or_default()
}

/// `[min, max]` padded by 5% on each side; degenerate spans widen to 1.
pub(crate) fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span <= 0.0 {
        return (lo - 0.5, hi + 0.5);
    }
    (lo - 0.05 * span, hi + 0.05 * span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_map_slot_centers() {
        let cats = vec!["agree".to_string(), "disagree".to_string()];
        assert_eq!(category_range(cats.len()), -0.5..1.5);
        assert_eq!(category_label(&cats, 0.0), "agree");
        assert_eq!(category_label(&cats, 1.0 + 1e-9), "disagree");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 5.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }

    #[test]
    fn padded_range_handles_degenerate_inputs() {
        assert_eq!(padded_range(std::iter::empty()), (0.0, 1.0));
        assert_eq!(padded_range([3.0, 3.0].into_iter()), (2.5, 3.5));
        let (lo, hi) = padded_range([0.0, 100.0].into_iter());
        assert_eq!((lo, hi), (-5.0, 105.0));
    }

    #[test]
    fn static_charts_render_as_svg() {
        let data = crate::data::sample_dataset(200, 3).unwrap();
        let report = crate::report::build_report(&data.dataset);
        let charts = render_static_charts(&report).unwrap();
        for svg in [
            &charts.breadwinner_bar,
            &charts.prestige_income_scatter,
            &charts.income_box,
            &charts.prestige_box,
            &charts.income_by_prestige_grid,
        ] {
            assert!(svg.starts_with("<svg"), "not an svg document");
            assert!(svg.trim_end().ends_with("</svg>"));
        }
        assert!(charts.income_by_prestige_grid.contains("26-36"));
    }
}
