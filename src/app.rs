//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads and cleans the GSS extract
//! - builds the static report and charts
//! - serves the dashboard or prints/exports the report

use std::sync::Arc;

use clap::Parser;

use crate::cli::{Command, ReportArgs, ServeArgs};
use crate::domain::{ReportConfig, Selection, ServeConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `gss` binary.
pub fn run() -> Result<(), AppError> {
    // `gss` and `gss --port 9000` behave like `gss serve ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // Optional `.env`, mainly for RUST_LOG.
    let _ = dotenvy::dotenv();

    match cli.command {
        Command::Serve(args) => {
            init_logging(args.debug);
            handle_serve(serve_config_from_args(&args))
        }
        Command::Report(args) => {
            init_logging(args.debug);
            handle_report(report_config_from_args(&args))
        }
    }
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).try_init();
}

fn handle_serve(config: ServeConfig) -> Result<(), AppError> {
    if config.debug {
        log::debug!("debug logging enabled");
    }

    // Blocking fetch and all static work happen before the async runtime starts.
    let run = pipeline::run_report(&config.source)?;
    let dashboard = pipeline::build_dashboard(run, config.source.describe())?;

    crate::web::run_blocking(Arc::new(dashboard), &config.host, config.port)
}

fn handle_report(config: ReportConfig) -> Result<(), AppError> {
    let run = pipeline::run_report(&config.source)?;

    println!(
        "{}",
        crate::report::format_run_summary(&config.source, &run.ingest.stats, &run.report)
    );

    if let Some(dir) = &config.out_dir {
        let dashboard = pipeline::build_dashboard(run, config.source.describe())?;
        let interactive = dashboard.render_interactive(Selection::default())?;
        let written = crate::io::export::write_report_dir(
            dir,
            &dashboard.report,
            &dashboard.charts,
            &interactive,
            &dashboard.source,
            dashboard.stats.rows_read,
            dashboard.generated_at,
        )?;
        for path in written {
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}

pub fn serve_config_from_args(args: &ServeArgs) -> ServeConfig {
    ServeConfig {
        source: args.source.to_source(),
        host: args.host.clone(),
        port: args.port,
        debug: args.debug,
    }
}

pub fn report_config_from_args(args: &ReportArgs) -> ReportConfig {
    ReportConfig {
        source: args.source.to_source(),
        out_dir: args.out.clone(),
    }
}

/// Rewrite argv so `gss` defaults to `gss serve`.
///
/// Rules:
/// - `gss`                      -> `gss serve`
/// - `gss --port 9000 ...`      -> `gss serve --port 9000 ...`
/// - `gss --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "serve" | "report");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "serve flags".
    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_serves() {
        assert_eq!(rewrite_args(argv(&["gss"])), argv(&["gss", "serve"]));
        assert_eq!(
            rewrite_args(argv(&["gss", "--port", "9000"])),
            argv(&["gss", "serve", "--port", "9000"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        for args in [
            argv(&["gss", "report", "--sample", "10"]),
            argv(&["gss", "serve"]),
            argv(&["gss", "--help"]),
            argv(&["gss", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn config_from_args_resolves_source() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&["gss", "--sample", "25", "--debug"])));
        let Command::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        let config = serve_config_from_args(&args);
        assert!(config.debug);
        assert_eq!(config.port, 8050);
        assert_eq!(config.source.describe(), "synthetic sample (n=25, seed=42)");
    }
}
