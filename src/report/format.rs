//! Plain-text rendering of report tables for terminal output.
//!
//! We keep formatting code in one place so the aggregation code stays clean
//! and output changes are localized.

use crate::domain::DataSource;
use crate::io::ingest::IngestStats;
use crate::report::{BoxSeries, GroupedCounts, Report, SummaryTable};

/// Format the full run summary (dataset stats + every static table).
pub fn format_run_summary(source: &DataSource, stats: &IngestStats, report: &Report) -> String {
    let mut out = String::new();

    out.push_str("=== gss - The 2019 GSS: Gender Wage Gap ===\n");
    out.push_str(&format!("Source: {}\n", source.describe()));
    out.push_str(&format!(
        "Rows: n={} | ages recoded={} | missing cells={}\n",
        stats.rows_read,
        stats.ages_recoded,
        stats.missing_by_column.values().sum::<usize>()
    ));

    out.push_str("\nTable comparing variables by gender:\n");
    out.push_str(&format_summary_table(&report.summary));

    out.push_str("\nViews about male breadwinners:\n");
    out.push_str(&format_counts(&report.breadwinner_counts));

    out.push_str("\nIncome vs occupational prestige (OLS per group):\n");
    for g in &report.prestige_income_scatter.groups {
        match &g.trend {
            Some(t) => out.push_str(&format!(
                "  {:<10} n={:<5} income = {:.2} + {:.2} * prestige (R^2={:.3})\n",
                g.group, t.n, t.intercept, t.slope, t.r_squared
            )),
            None => out.push_str(&format!("  {:<10} n={:<5} (no trend line)\n", g.group, g.points.len())),
        }
    }

    out.push_str("\nIncome by gender:\n");
    out.push_str(&format_box_series(&report.income_box));
    out.push_str("\nOccupational prestige by gender:\n");
    out.push_str(&format_box_series(&report.prestige_box));

    out.push_str("\nIncome by gender and level of job prestige:\n");
    for panel in &report.income_by_prestige_level.panels {
        out.push_str(&format!("  [{}]\n", panel.label));
        for g in &panel.groups {
            out.push_str(&format!(
                "    {:<10} n={:<5} median={:.0}\n",
                g.group, g.stats.n, g.stats.median
            ));
        }
    }

    out
}

/// Format the grouped-mean table with aligned columns.
pub fn format_summary_table(table: &SummaryTable) -> String {
    let headers = table.headers();
    let widths: Vec<usize> = headers.iter().map(|h| h.len().max(10)).collect();

    let mut out = String::new();
    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{h:>w$}"))
        .collect();
    out.push_str(header_line.join("  ").trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for row in &table.rows {
        let mut cells = vec![format!("{:>w$}", row.group, w = widths[0])];
        for (mean, &w) in row.means.iter().zip(&widths[1..]) {
            cells.push(format!("{:>w$}", fmt_mean(*mean)));
        }
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }

    out
}

/// Format grouped counts as a cross-tabulation (x categories by rows).
pub fn format_counts(counts: &GroupedCounts) -> String {
    let first = counts
        .x_categories
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0)
        .max(counts.x.label().len());
    let widths: Vec<usize> = counts.groups.iter().map(|g| g.chars().count().max(6)).collect();

    let mut out = String::new();
    let mut header = format!("{:<first$}", counts.x.label());
    for (g, &w) in counts.groups.iter().zip(&widths) {
        header.push_str(&format!("  {g:>w$}"));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for x in &counts.x_categories {
        let mut line = format!("{:<first$}", truncate(x, first));
        for (g, &w) in counts.groups.iter().zip(&widths) {
            line.push_str(&format!("  {:>w$}", counts.count(x, g)));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

fn format_box_series(series: &BoxSeries) -> String {
    let mut out = String::new();
    for g in &series.groups {
        let s = &g.stats;
        out.push_str(&format!(
            "  {:<10} n={:<5} min={:.1} q1={:.1} median={:.1} q3={:.1} max={:.1} outliers={}\n",
            g.group,
            s.n,
            s.min,
            s.q1,
            s.median,
            s.q3,
            s.max,
            s.outliers.len()
        ));
    }
    out
}

fn fmt_mean(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Column, Respondent};
    use crate::report::{SummaryRow, count_by};

    #[test]
    fn summary_table_aligns_and_marks_missing() {
        let table = SummaryTable {
            by: Column::Sex,
            columns: vec![Column::Income, Column::Education],
            rows: vec![
                SummaryRow {
                    group: "female".into(),
                    means: vec![Some(28_000.5), None],
                },
                SummaryRow {
                    group: "male".into(),
                    means: vec![Some(33_000.0), Some(14.25)],
                },
            ],
        };
        let text = format_summary_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Gender") && lines[0].contains("Years of Education"));
        assert!(lines[2].contains("28000.50"));
        assert!(lines[2].trim_end().ends_with('-'));
        assert!(lines[3].ends_with("14.25"));
    }

    #[test]
    fn counts_render_as_crosstab() {
        let rows = vec![
            Respondent { sex: Some("male".into()), male_breadwinner: Some("agree".into()), ..Default::default() },
            Respondent { sex: Some("female".into()), male_breadwinner: Some("agree".into()), ..Default::default() },
            Respondent { sex: Some("female".into()), male_breadwinner: Some("agree".into()), ..Default::default() },
        ];
        let text = format_counts(&count_by(&rows, Column::MaleBreadwinner, Column::Sex));
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("Level of Agreement"));
        assert!(lines[1].starts_with("agree"));
        assert!(lines[1].ends_with("2"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("strongly agree", 6), "stron.");
        assert_eq!(truncate("agree", 6), "agree");
    }
}
