//! Static Report Builder: grouped aggregates over the cleaned dataset.
//!
//! Every function here is a pure function of its input table. Calling
//! [`build_report`] twice on the same dataset yields equal reports; nothing is
//! cached between calls.
//!
//! Group and category orders follow two conventions:
//! - the summary table sorts group keys ascending
//! - counts, scatter groups, and box groups use first-appearance order

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Column, Dataset, Respondent, Selection};
use crate::math::{BoxStats, LineFit, bin_index, fit_line, mean, round2};

pub mod format;

pub use format::*;

/// Bin edges for occupational prestige (right-closed).
pub const PRESTIGE_EDGES: [f64; 7] = [14.0, 25.0, 36.0, 47.0, 58.0, 69.0, 80.0];

/// Labels for the bins defined by [`PRESTIGE_EDGES`].
pub const PRESTIGE_LABELS: [&str; 6] = ["15-25", "26-36", "37-47", "48-58", "59-69", "70-80"];

/// The numeric columns averaged in the summary table.
pub const SUMMARY_COLUMNS: [Column; 4] = [
    Column::Income,
    Column::JobPrestige,
    Column::SocioeconomicIndex,
    Column::Education,
];

/// Number of facet columns in the prestige-level grid.
pub const FACET_COLUMNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub group: String,
    /// One entry per `SummaryTable::columns`, rounded to two decimals.
    /// `None` when the group has no values for that column.
    pub means: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub by: Column,
    pub columns: Vec<Column>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn headers(&self) -> Vec<&'static str> {
        std::iter::once(self.by.label())
            .chain(self.columns.iter().map(|c| c.label()))
            .collect()
    }

    pub fn mean_of(&self, group: &str, column: Column) -> Option<f64> {
        let idx = self.columns.iter().position(|&c| c == column)?;
        self.rows.iter().find(|r| r.group == group)?.means[idx]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountCell {
    pub x: String,
    pub group: String,
    pub count: usize,
}

/// Row counts by two categorical columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedCounts {
    pub x: Column,
    pub color: Column,
    pub x_categories: Vec<String>,
    pub groups: Vec<String>,
    /// Only non-zero cells, in first-appearance order.
    pub cells: Vec<CountCell>,
}

impl GroupedCounts {
    pub fn count(&self, x: &str, group: &str) -> usize {
        self.cells
            .iter()
            .find(|c| c.x == x && c.group == group)
            .map(|c| c.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.cells.iter().map(|c| c.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.cells.iter().map(|c| c.count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGroup {
    pub group: String,
    pub points: Vec<(f64, f64)>,
    pub trend: Option<LineFit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterData {
    pub x: Column,
    pub y: Column,
    pub color: Column,
    pub groups: Vec<ScatterGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub group: String,
    pub stats: BoxStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub value: Column,
    pub by: Column,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetPanel {
    pub label: String,
    pub groups: Vec<BoxGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetedBoxes {
    pub value: Column,
    pub by: Column,
    pub facet_by: Column,
    pub facet_columns: usize,
    pub panels: Vec<FacetPanel>,
}

/// All static views of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: SummaryTable,
    pub breadwinner_counts: GroupedCounts,
    pub prestige_income_scatter: ScatterData,
    pub income_box: BoxSeries,
    pub prestige_box: BoxSeries,
    pub income_by_prestige_level: FacetedBoxes,
}

/// Build every static view from the cleaned dataset.
pub fn build_report(dataset: &Dataset) -> Report {
    Report {
        summary: summary_by(dataset, Column::Sex, &SUMMARY_COLUMNS),
        breadwinner_counts: count_by(dataset.rows(), Column::MaleBreadwinner, Column::Sex),
        prestige_income_scatter: scatter_with_trend(dataset, Column::JobPrestige, Column::Income, Column::Sex),
        income_box: box_by(dataset, Column::Income, Column::Sex),
        prestige_box: box_by(dataset, Column::JobPrestige, Column::Sex),
        income_by_prestige_level: income_by_prestige_level(dataset),
    }
}

/// Per-group means of `columns`, rounded to two decimals.
///
/// Rows missing the group key are dropped. Each mean uses only that column's
/// non-missing values within the group.
pub fn summary_by(dataset: &Dataset, by: Column, columns: &[Column]) -> SummaryTable {
    let mut groups: BTreeMap<String, Vec<Vec<f64>>> = BTreeMap::new();
    for row in dataset.rows() {
        let Some(key) = row.category(by) else {
            continue;
        };
        let slots = groups
            .entry(key)
            .or_insert_with(|| vec![Vec::new(); columns.len()]);
        for (slot, &column) in slots.iter_mut().zip(columns) {
            if let Some(v) = row.number(column) {
                slot.push(v);
            }
        }
    }

    let rows = groups
        .into_iter()
        .map(|(group, values)| SummaryRow {
            group,
            means: values.iter().map(|v| mean(v).map(round2)).collect(),
        })
        .collect();

    SummaryTable {
        by,
        columns: columns.to_vec(),
        rows,
    }
}

/// Count rows by (`x`, `color`), skipping rows missing either key.
pub fn count_by<'a>(rows: impl IntoIterator<Item = &'a Respondent>, x: Column, color: Column) -> GroupedCounts {
    let mut x_categories: Vec<String> = Vec::new();
    let mut groups: Vec<String> = Vec::new();
    let mut cells: Vec<CountCell> = Vec::new();

    for row in rows {
        let (Some(xv), Some(gv)) = (row.category(x), row.category(color)) else {
            continue;
        };
        if !x_categories.contains(&xv) {
            x_categories.push(xv.clone());
        }
        if !groups.contains(&gv) {
            groups.push(gv.clone());
        }
        match cells.iter_mut().find(|c| c.x == xv && c.group == gv) {
            Some(cell) => cell.count += 1,
            None => cells.push(CountCell {
                x: xv,
                group: gv,
                count: 1,
            }),
        }
    }

    GroupedCounts {
        x,
        color,
        x_categories,
        groups,
        cells,
    }
}

/// Counts backing the dashboard's dynamic bar chart.
///
/// `subset` is expected to be [`Dataset::interactive_subset`].
pub fn interactive_counts(subset: &Dataset, selection: Selection) -> GroupedCounts {
    count_by(subset.rows(), selection.x.column(), selection.color.column())
}

/// Scatter points grouped by `color`, with one OLS trend line per group.
pub fn scatter_with_trend(dataset: &Dataset, x: Column, y: Column, color: Column) -> ScatterData {
    let mut groups: Vec<ScatterGroup> = Vec::new();
    for row in dataset.rows() {
        let (Some(key), Some(xv), Some(yv)) = (row.category(color), row.number(x), row.number(y)) else {
            continue;
        };
        match groups.iter_mut().find(|g| g.group == key) {
            Some(g) => g.points.push((xv, yv)),
            None => groups.push(ScatterGroup {
                group: key,
                points: vec![(xv, yv)],
                trend: None,
            }),
        }
    }
    for g in &mut groups {
        g.trend = fit_line(&g.points);
    }

    ScatterData { x, y, color, groups }
}

/// Box statistics of `value` for each `by` group.
pub fn box_by(dataset: &Dataset, value: Column, by: Column) -> BoxSeries {
    BoxSeries {
        value,
        by,
        groups: box_groups(dataset.rows().iter(), value, by),
    }
}

fn box_groups<'a>(rows: impl Iterator<Item = &'a Respondent>, value: Column, by: Column) -> Vec<BoxGroup> {
    let mut buckets: Vec<(String, Vec<f64>)> = Vec::new();
    for row in rows {
        let (Some(key), Some(v)) = (row.category(by), row.number(value)) else {
            continue;
        };
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(v),
            None => buckets.push((key, vec![v])),
        }
    }
    buckets
        .into_iter()
        .filter_map(|(group, values)| BoxStats::from_values(&values).map(|stats| BoxGroup { group, stats }))
        .collect()
}

/// Prestige-level label for a job-prestige score, if it falls in a bin.
pub fn prestige_level(job_prestige: f64) -> Option<&'static str> {
    bin_index(&PRESTIGE_EDGES, job_prestige).map(|i| PRESTIGE_LABELS[i])
}

/// Income box plots by sex, one facet per prestige level.
///
/// Rows missing income, sex, or prestige, or whose prestige falls outside
/// every bin, are dropped. All six panels are present, in bin order.
pub fn income_by_prestige_level(dataset: &Dataset) -> FacetedBoxes {
    let required = [Column::Income, Column::Sex, Column::JobPrestige];
    let mut per_level: Vec<Vec<&Respondent>> = vec![Vec::new(); PRESTIGE_LABELS.len()];
    for row in dataset.complete_rows(&required) {
        if let Some(i) = row.job_prestige.and_then(|p| bin_index(&PRESTIGE_EDGES, p)) {
            per_level[i].push(row);
        }
    }

    let panels = PRESTIGE_LABELS
        .iter()
        .zip(per_level)
        .map(|(label, rows)| FacetPanel {
            label: (*label).to_string(),
            groups: box_groups(rows.into_iter(), Column::Income, Column::Sex),
        })
        .collect();

    FacetedBoxes {
        value: Column::Income,
        by: Column::Sex,
        facet_by: Column::JobPrestige,
        facet_columns: FACET_COLUMNS,
        panels,
    }
}
