//! Horizontal box plots, single and faceted.
//!
//! Values run along x, groups along y. Each box spans q1..q3 with a median
//! bar, whiskers to the furthest observation within 1.5×IQR, and the
//! remaining observations drawn as outlier dots.

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::{
    ChartSpec, DrawResult, category_label, category_range, label_font, padded_range, render_svg, series_color,
    sex_color,
};
use crate::report::{BoxGroup, BoxSeries, FacetedBoxes};

type BoxCoord = Cartesian2d<RangedCoordf64, RangedCoordf64>;

/// Half the height of a box, in category-slot units.
const HALF_BOX: f64 = 0.3;

/// One box per group, colored from the series palette. No legend: the y axis
/// already names every group.
pub fn render_box(series: &BoxSeries, spec: &ChartSpec) -> Result<String, AppError> {
    let slots: Vec<String> = series.groups.iter().map(|g| g.group.clone()).collect();
    let (x0, x1) = value_range(series.groups.iter());
    let n = slots.len().max(1);

    render_svg(spec.width, spec.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, category_range(n))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_desc(spec.x_desc.as_str())
            .y_desc(spec.y_desc.as_str())
            .y_labels(n)
            .x_label_formatter(&|v| format!("{v:.0}"))
            .y_label_formatter(&|v| category_label(&slots, *v))
            .label_style(label_font())
            .draw()?;

        draw_boxes(&mut chart, &series.groups, &slots, &|i: usize, _: &str| series_color(i))
    })
}

/// Grid of box plots, one panel per facet, `facet_columns` panels per row.
/// All panels share the x range and the group order so they compare directly.
pub fn render_faceted_box(facets: &FacetedBoxes, spec: &ChartSpec) -> Result<String, AppError> {
    let cols = facets.facet_columns.max(1);
    let rows = facets.panels.len().div_ceil(cols).max(1);

    let mut slots: Vec<String> = Vec::new();
    for g in facets.panels.iter().flat_map(|p| p.groups.iter()) {
        if !slots.contains(&g.group) {
            slots.push(g.group.clone());
        }
    }
    let n = slots.len().max(1);
    let (x0, x1) = value_range(facets.panels.iter().flat_map(|p| p.groups.iter()));
    let facet_name = facets.facet_by.name();

    render_svg(spec.width, spec.height, |root| {
        let areas = root.split_evenly((rows, cols));
        for (idx, (panel, area)) in facets.panels.iter().zip(areas.iter()).enumerate() {
            let bottom_row = idx / cols == rows - 1;
            let left_col = idx % cols == 0;

            let mut chart = ChartBuilder::on(area)
                .caption(format!("{facet_name}_levels={}", panel.label), label_font())
                .margin(8)
                .x_label_area_size(if bottom_row { 40 } else { 20 })
                .y_label_area_size(60)
                .build_cartesian_2d(x0..x1, category_range(n))?;

            let fmt_x = |v: &f64| format!("{v:.0}");
            let fmt_y = |v: &f64| category_label(&slots, *v);
            let mut mesh = chart.configure_mesh();
            mesh.disable_y_mesh()
                .y_labels(n)
                .x_labels(4)
                .x_label_formatter(&fmt_x)
                .y_label_formatter(&fmt_y)
                .label_style(label_font());
            if bottom_row {
                mesh.x_desc(spec.x_desc.as_str());
            }
            if left_col {
                mesh.y_desc(spec.y_desc.as_str());
            }
            mesh.draw()?;

            draw_boxes(&mut chart, &panel.groups, &slots, &|_: usize, group: &str| sex_color(group))?;
        }
        Ok(())
    })
}

fn value_range<'a>(groups: impl Iterator<Item = &'a BoxGroup>) -> (f64, f64) {
    padded_range(groups.flat_map(|g| [g.stats.min, g.stats.max]))
}

fn draw_boxes(
    chart: &mut ChartContext<'_, SVGBackend<'_>, BoxCoord>,
    groups: &[BoxGroup],
    slots: &[String],
    color_of: &dyn Fn(usize, &str) -> RGBColor,
) -> DrawResult {
    for (gi, g) in groups.iter().enumerate() {
        let Some(slot) = slots.iter().position(|s| *s == g.group) else {
            continue;
        };
        let c = slot as f64;
        let (lo, hi) = (c - HALF_BOX, c + HALF_BOX);
        let color = color_of(gi, &g.group);
        let s = &g.stats;

        chart.draw_series(std::iter::once(Rectangle::new([(s.q1, lo), (s.q3, hi)], color.mix(0.3).filled())))?;
        chart.draw_series(std::iter::once(Rectangle::new([(s.q1, lo), (s.q3, hi)], color.stroke_width(1))))?;

        let cap = HALF_BOX / 2.0;
        let lines = [
            vec![(s.median, lo), (s.median, hi)],
            vec![(s.lower_whisker, c), (s.q1, c)],
            vec![(s.q3, c), (s.upper_whisker, c)],
            vec![(s.lower_whisker, c - cap), (s.lower_whisker, c + cap)],
            vec![(s.upper_whisker, c - cap), (s.upper_whisker, c + cap)],
        ];
        chart.draw_series(lines.into_iter().map(|pts| PathElement::new(pts, color.stroke_width(2))))?;

        chart.draw_series(s.outliers.iter().map(|&v| Circle::new((v, c), 2, color.filled())))?;
    }
    Ok(())
}
