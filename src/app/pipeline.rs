//! Shared "report pipeline" logic used by both the `serve` and `report` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch/read -> decode -> clean -> static report -> charts
//!
//! The subcommands can then focus on presentation (HTTP vs terminal/files).

use chrono::{DateTime, Local};

use crate::data::{GssClient, sample_dataset};
use crate::domain::DataSource;
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_file};
use crate::plot::{StaticCharts, render_static_charts};
use crate::report::{Report, build_report};
use crate::web::Dashboard;

/// All computed outputs of a single pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub report: Report,
    pub generated_at: DateTime<Local>,
}

/// Load and clean the dataset from the configured source.
pub fn load_dataset(source: &DataSource) -> Result<IngestedData, AppError> {
    log::info!("loading dataset from {}", source.describe());
    let data = match source {
        DataSource::Remote { url } => GssClient::new(url.clone())?.fetch_dataset()?,
        DataSource::File { path } => load_file(path)?,
        DataSource::Sample { count, seed } => sample_dataset(*count, *seed)?,
    };
    log::info!(
        "loaded {} rows ({} ages recoded)",
        data.stats.rows_read,
        data.stats.ages_recoded
    );
    Ok(data)
}

/// Execute the full pipeline: load, clean, and build every static view.
pub fn run_report(source: &DataSource) -> Result<RunOutput, AppError> {
    let ingest = load_dataset(source)?;
    Ok(run_report_with_data(ingest))
}

/// Build the static report from an already-cleaned dataset.
pub fn run_report_with_data(ingest: IngestedData) -> RunOutput {
    let report = build_report(&ingest.dataset);
    RunOutput {
        ingest,
        report,
        generated_at: Local::now(),
    }
}

/// Everything the dashboard serves: static charts are rendered here, once.
pub fn build_dashboard(run: RunOutput, source: String) -> Result<Dashboard, AppError> {
    let charts: StaticCharts = render_static_charts(&run.report)?;
    let interactive = run.ingest.dataset.interactive_subset();
    log::info!(
        "interactive subset: {} of {} rows complete",
        interactive.len(),
        run.ingest.dataset.len()
    );

    Ok(Dashboard {
        report: run.report,
        charts,
        interactive,
        stats: run.ingest.stats,
        source,
        generated_at: run.generated_at,
    })
}

/// Shortcut for callers that already hold a cleaned dataset.
pub fn build_dashboard_from(ingest: IngestedData, source: String) -> Result<Dashboard, AppError> {
    build_dashboard(run_report_with_data(ingest), source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_source_runs_end_to_end() {
        let source = DataSource::Sample { count: 300, seed: 9 };
        let run = run_report(&source).unwrap();
        assert_eq!(run.ingest.stats.rows_read, 300);
        assert!(!run.report.summary.rows.is_empty());

        let dashboard = build_dashboard(run, source.describe()).unwrap();
        assert!(dashboard.interactive.len() <= dashboard.stats.rows_read);
        assert!(dashboard.charts.breadwinner_bar.starts_with("<svg"));
    }

    #[test]
    fn report_is_stable_across_runs() {
        let data = sample_dataset(150, 2).unwrap();
        let a = run_report_with_data(data.clone());
        let b = run_report_with_data(data);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn missing_file_is_a_usage_error() {
        let source = DataSource::File {
            path: "/nonexistent/gss2018.csv".into(),
        };
        let err = load_dataset(&source).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }
}
