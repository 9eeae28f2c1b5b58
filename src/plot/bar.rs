//! Grouped bar chart of category counts.

use plotters::prelude::*;

use crate::error::AppError;
use crate::plot::{ChartSpec, category_label, category_range, label_font, render_svg, series_color};
use crate::report::GroupedCounts;

/// Share of each category slot covered by bars; the rest is the gap.
const SLOT_FILL: f64 = 0.8;

/// Render `counts` as side-by-side bars: one slot per x category, one bar per
/// color group within the slot.
pub fn render_grouped_bar(counts: &GroupedCounts, spec: &ChartSpec) -> Result<String, AppError> {
    let n = counts.x_categories.len().max(1);
    let k = counts.groups.len().max(1);
    let y_max = (counts.max_count() as f64 * 1.1).max(1.0);
    let bar_width = SLOT_FILL / k as f64;
    let gap = (1.0 - SLOT_FILL) / 2.0;

    render_svg(spec.width, spec.height, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(category_range(n), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(spec.x_desc.as_str())
            .y_desc(spec.y_desc.as_str())
            .x_labels(n)
            .x_label_formatter(&|v| category_label(&counts.x_categories, *v))
            .y_label_formatter(&|v| format!("{v:.0}"))
            .label_style(label_font())
            .draw()?;

        for (gi, group) in counts.groups.iter().enumerate() {
            let color = series_color(gi);
            let bars = counts.x_categories.iter().enumerate().filter_map(|(xi, x)| {
                let c = counts.count(x, group);
                if c == 0 {
                    return None;
                }
                let x0 = xi as f64 - 0.5 + gap + gi as f64 * bar_width;
                Some(Rectangle::new([(x0, 0.0), (x0 + bar_width, c as f64)], color.filled()))
            });
            chart
                .draw_series(bars)?
                .label(group.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
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
    use crate::domain::{Column, Respondent};
    use crate::report::count_by;

    #[test]
    fn grouped_bar_labels_categories_and_groups() {
        let rows = vec![
            Respondent { sex: Some("male".into()), male_breadwinner: Some("agree".into()), ..Default::default() },
            Respondent { sex: Some("female".into()), male_breadwinner: Some("strongly disagree".into()), ..Default::default() },
        ];
        let counts = count_by(&rows, Column::MaleBreadwinner, Column::Sex);
        let svg = render_grouped_bar(&counts, &ChartSpec::new(600, 400, "Level of Agreement", "Number of People"))
            .unwrap();
        // One axis label per category, even where one name contains another.
        for category in &counts.x_categories {
            assert_eq!(svg.matches(&format!(">\n{category}\n</text>")).count(), 1, "{category}");
        }
        assert!(svg.contains("female"));
        assert!(svg.contains("Number of People"));
    }

    #[test]
    fn empty_counts_still_render() {
        let counts = count_by(std::iter::empty(), Column::Satjob, Column::Region);
        let svg = render_grouped_bar(&counts, &ChartSpec::new(300, 200, "x", "y")).unwrap();
        assert!(svg.starts_with("<svg"));
    }
}
