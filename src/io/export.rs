//! Write a static copy of the report to a directory.
//!
//! The export is meant to be easy to consume without the server: a summary CSV
//! for spreadsheets, the full report as JSON, and one SVG per chart.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::AppError;
use crate::plot::StaticCharts;
use crate::report::{Report, SummaryTable};

pub const SUMMARY_CSV: &str = "summary.csv";
pub const REPORT_JSON: &str = "report.json";

/// JSON envelope written to `report.json`.
#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    generated_at: String,
    source: &'a str,
    rows: usize,
    report: &'a Report,
}

/// Write every export file into `dir` (created if needed) and return the paths written.
pub fn write_report_dir(
    dir: &Path,
    report: &Report,
    charts: &StaticCharts,
    interactive_svg: &str,
    source: &str,
    rows: usize,
    generated_at: DateTime<Local>,
) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::usage(format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let mut written = Vec::new();

    let summary_path = dir.join(SUMMARY_CSV);
    write_summary_csv(&summary_path, &report.summary)?;
    written.push(summary_path);

    let json_path = dir.join(REPORT_JSON);
    write_report_json(&json_path, report, source, rows, generated_at)?;
    written.push(json_path);

    let svgs = [
        ("breadwinner_bar.svg", charts.breadwinner_bar.as_str()),
        ("prestige_income_scatter.svg", charts.prestige_income_scatter.as_str()),
        ("income_box.svg", charts.income_box.as_str()),
        ("prestige_box.svg", charts.prestige_box.as_str()),
        ("income_by_prestige_level.svg", charts.income_by_prestige_grid.as_str()),
        ("interactive_bar.svg", interactive_svg),
    ];
    for (name, svg) in svgs {
        let path = dir.join(name);
        write_text(&path, svg)?;
        written.push(path);
    }

    log::info!("wrote {} export files to {}", written.len(), dir.display());
    Ok(written)
}

/// Write the grouped-mean table as CSV (display headers, two-decimal means).
pub fn write_summary_csv(path: &Path, table: &SummaryTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(table.headers())
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for row in &table.rows {
        let mut record = vec![row.group.clone()];
        record.extend(row.means.iter().map(|m| m.map(|v| format!("{v:.2}")).unwrap_or_default()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to flush export CSV: {e}")))
}

pub fn write_report_json(
    path: &Path,
    report: &Report,
    source: &str,
    rows: usize,
    generated_at: DateTime<Local>,
) -> Result<(), AppError> {
    let file = ReportFile {
        generated_at: generated_at.to_rfc3339(),
        source,
        rows,
        report,
    };
    let json = serde_json::to_string_pretty(&file)
        .map_err(|e| AppError::usage(format!("Failed to serialize report JSON: {e}")))?;
    write_text(path, &json)
}

fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    fs::write(path, text).map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Column;
    use crate::report::SummaryRow;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("gss-export-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn summary_csv_uses_display_headers() {
        let dir = temp_dir("csv");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SUMMARY_CSV);
        let table = SummaryTable {
            by: Column::Sex,
            columns: vec![Column::Income, Column::JobPrestige],
            rows: vec![
                SummaryRow { group: "female".into(), means: vec![Some(40000.5), Some(44.123)] },
                SummaryRow { group: "male".into(), means: vec![None, Some(45.0)] },
            ],
        };
        write_summary_csv(&path, &table).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Gender,Income,Occupational Prestige");
        assert_eq!(lines[1], "female,40000.50,44.12");
        assert_eq!(lines[2], "male,,45.00");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn report_dir_contains_every_artifact() {
        let dir = temp_dir("dir");
        let data = crate::data::sample_dataset(120, 4).unwrap();
        let report = crate::report::build_report(&data.dataset);
        let charts = crate::plot::render_static_charts(&report).unwrap();

        let written = write_report_dir(&dir, &report, &charts, "<svg></svg>", "sample", 120, Local::now()).unwrap();
        assert_eq!(written.len(), 8);
        for path in &written {
            assert!(path.exists(), "{} missing", path.display());
        }

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(REPORT_JSON)).unwrap()).unwrap();
        assert_eq!(json["rows"], 120);
        assert_eq!(json["report"]["income_by_prestige_level"]["panels"].as_array().unwrap().len(), 6);
        fs::remove_dir_all(&dir).unwrap();
    }
}
