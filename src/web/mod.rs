//! Interactive Dashboard: HTTP surface over the precomputed report.
//!
//! Everything static (report tables, static SVG charts, the interactive
//! subset) is built once before the server starts and shared read-only. The
//! only per-request work is the dynamic bar chart, recomputed from the two
//! dropdown values on every request. There is no cache, no queue, and no
//! per-session state.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use chrono::{DateTime, Local};

use crate::domain::{Dataset, Selection};
use crate::error::AppError;
use crate::io::ingest::IngestStats;
use crate::plot::{ChartSpec, StaticCharts, render_grouped_bar};
use crate::report::{GroupedCounts, Report, SummaryTable, interactive_counts};

pub mod page;

/// Height of the dynamic bar chart.
pub const INTERACTIVE_HEIGHT: u32 = 700;
pub const INTERACTIVE_WIDTH: u32 = 900;

/// Read-only state shared by every request.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub report: Report,
    pub charts: StaticCharts,
    /// Rows with no missing value in any of the nine dropdown columns.
    pub interactive: Dataset,
    pub stats: IngestStats,
    pub source: String,
    pub generated_at: DateTime<Local>,
}

impl Dashboard {
    /// Recompute the dynamic chart for one dropdown selection.
    pub fn interactive_counts(&self, selection: Selection) -> GroupedCounts {
        interactive_counts(&self.interactive, selection)
    }

    pub fn render_interactive(&self, selection: Selection) -> Result<String, AppError> {
        let counts = self.interactive_counts(selection);
        log::debug!(
            "recomputing interactive bar: x={} color={} rows={}",
            selection.x.as_str(),
            selection.color.as_str(),
            counts.total()
        );
        render_grouped_bar(
            &counts,
            &ChartSpec::new(
                INTERACTIVE_WIDTH,
                INTERACTIVE_HEIGHT,
                selection.x.as_str(),
                "count",
            ),
        )
    }
}

pub type SharedDashboard = Arc<Dashboard>;

/// Error surface for handlers: the message goes back as a plain 500.
pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::error!("request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub fn router(dashboard: SharedDashboard) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/interactive-bar", get(interactive_bar_handler))
        .route("/api/interactive-counts", get(interactive_counts_handler))
        .route("/api/summary", get(summary_handler))
        .with_state(dashboard)
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(dashboard: SharedDashboard, host: &str, port: u16) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .map_err(|e| AppError::usage(format!("Failed to bind {host}:{port}: {e}")))?;
    log::info!("dashboard listening on http://{host}:{port}");

    axum::serve(listener, router(dashboard))
        .await
        .map_err(|e| AppError::runtime(format!("Server failed: {e}")))
}

/// Run [`serve`] on a single-threaded runtime, blocking the caller.
pub fn run_blocking(dashboard: SharedDashboard, host: &str, port: u16) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::runtime(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(serve(dashboard, host, port))
}

async fn index_handler(
    State(dashboard): State<SharedDashboard>,
    Query(selection): Query<Selection>,
) -> Result<Html<String>, ApiError> {
    let graph = dashboard.render_interactive(selection)?;
    Ok(Html(page::render_page(&dashboard, selection, &graph)))
}

async fn interactive_bar_handler(
    State(dashboard): State<SharedDashboard>,
    Query(selection): Query<Selection>,
) -> Result<impl IntoResponse, ApiError> {
    let svg = dashboard.render_interactive(selection)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

async fn interactive_counts_handler(
    State(dashboard): State<SharedDashboard>,
    Query(selection): Query<Selection>,
) -> Json<GroupedCounts> {
    Json(dashboard.interactive_counts(selection))
}

async fn summary_handler(State(dashboard): State<SharedDashboard>) -> Json<SummaryTable> {
    Json(dashboard.report.summary.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupColumn, XAxisColumn};

    fn dashboard() -> SharedDashboard {
        let run = crate::app::pipeline::build_dashboard_from(
            crate::data::sample_dataset(250, 5).unwrap(),
            "test sample".to_string(),
        )
        .unwrap();
        Arc::new(run)
    }

    #[tokio::test]
    async fn index_renders_default_selection() {
        let d = dashboard();
        let Html(body) = index_handler(State(d), Query(Selection::default())).await.ok().unwrap();
        assert!(body.contains("The 2019 GSS: Gender Wage Gap"));
        assert!(body.contains(r#"<option value="male_breadwinner" selected>"#));
        assert!(body.contains(r#"<option value="sex" selected>"#));
        assert_eq!(body.matches("<svg").count(), 6);
    }

    #[tokio::test]
    async fn counts_endpoint_tracks_selection() {
        let d = dashboard();
        let selection = Selection {
            x: XAxisColumn::Satjob,
            color: GroupColumn::Region,
        };
        let Json(counts) = interactive_counts_handler(State(d.clone()), Query(selection)).await;
        assert_eq!(counts.x, XAxisColumn::Satjob.column());
        assert_eq!(counts.color, GroupColumn::Region.column());
        assert_eq!(counts.total(), d.interactive.len());
    }

    #[tokio::test]
    async fn summary_endpoint_returns_report_table() {
        let d = dashboard();
        let Json(table) = summary_handler(State(d.clone())).await;
        assert_eq!(table, d.report.summary);
    }

    #[test]
    fn selection_query_accepts_only_known_columns() {
        let parse = |uri: &str| Query::<Selection>::try_from_uri(&uri.parse::<axum::http::Uri>().unwrap());

        let Query(selection) = parse("/api/interactive-bar?x=satjob&color=region").unwrap();
        assert_eq!(
            selection,
            Selection {
                x: XAxisColumn::Satjob,
                color: GroupColumn::Region,
            }
        );

        let Query(selection) = parse("/api/interactive-bar").unwrap();
        assert_eq!(selection, Selection::default());

        for bad in ["/api/interactive-bar?x=income", "/api/interactive-bar?x=satjob&color=age"] {
            let rejection = parse(bad).unwrap_err();
            assert_eq!(rejection.status(), StatusCode::BAD_REQUEST, "{bad}");
        }
    }

    #[test]
    fn every_selection_renders() {
        let d = dashboard();
        for x in XAxisColumn::ALL {
            for color in GroupColumn::ALL {
                let svg = d.render_interactive(Selection { x, color }).unwrap();
                assert!(svg.contains(x.as_str()));
            }
        }
    }
}
