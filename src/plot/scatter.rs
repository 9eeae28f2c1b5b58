//! Scatter plot with one fitted trend line per color group.

use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::{ChartSpec, label_font, padded_range, render_svg, series_color};
use crate::report::ScatterData;

pub fn render_scatter(data: &ScatterData, spec: &ChartSpec) -> Result<String, AppError> {
    let all_points = || data.groups.iter().flat_map(|g| g.points.iter());
    let (x0, x1) = padded_range(all_points().map(|p| p.0));
    let (y0, y1) = padded_range(all_points().map(|p| p.1));

    render_svg(spec.width, spec.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_desc.as_str())
            .y_desc(spec.y_desc.as_str())
            .x_label_formatter(&|v| format!("{v:.0}"))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .label_style(label_font())
            .draw()?;

        for (gi, group) in data.groups.iter().enumerate() {
            let color = series_color(gi);

            chart
                .draw_series(
                    group
                        .points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 3, color.mix(0.55).filled())),
                )?
                .label(group.group.as_str())
                .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));

            // Trend line spans the group's own x extent.
            if let Some(trend) = &group.trend {
                let (gx0, gx1) = group
                    .points
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
                chart.draw_series(LineSeries::new(
                    [(gx0, trend.predict(gx0)), (gx1, trend.predict(gx1))],
                    color.stroke_width(2),
                ))?;
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(label_font())
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, Dataset, Respondent};
    use crate::report::scatter_with_trend;

    #[test]
    fn scatter_renders_points_and_legend() {
        let row = |sex: &str, prestige: f64, income: f64| Respondent {
            sex: Some(sex.into()),
            job_prestige: Some(prestige),
            income: Some(income),
            ..Default::default()
        };
        let ds = Dataset::new(vec![
            row("male", 20.0, 20_000.0),
            row("male", 60.0, 60_000.0),
            row("female", 30.0, 25_000.0),
            row("female", 70.0, 45_000.0),
        ]);
        let data = scatter_with_trend(&ds, Column::JobPrestige, Column::Income, Column::Sex);
        let svg = render_scatter(&data, &ChartSpec::new(600, 600, "Occupational Prestige", "Income")).unwrap();
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("female"));
    }
}
