//! Command-line parsing for the GSS dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! loading/report/serving code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_SOURCE_URL, DataSource};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gss", version, about = "The 2019 GSS: Gender Wage Gap dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the dataset, build the report, and serve the interactive dashboard.
    Serve(ServeArgs),
    /// Load the dataset, print the report tables, and optionally export charts.
    Report(ReportArgs),
}

/// Where to read the raw CSV from. Defaults to the public GSS 2018 extract.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// URL of the raw CSV.
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    pub url: String,

    /// Read a local copy of the CSV instead of fetching it.
    #[arg(long, value_name = "PATH", conflicts_with = "sample")]
    pub csv: Option<PathBuf>,

    /// Generate N synthetic respondents instead of fetching (offline demo).
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Random seed for `--sample`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl SourceArgs {
    pub fn to_source(&self) -> DataSource {
        if let Some(path) = &self.csv {
            DataSource::File { path: path.clone() }
        } else if let Some(count) = self.sample {
            DataSource::Sample {
                count,
                seed: self.seed,
            }
        } else {
            DataSource::Remote { url: self.url.clone() }
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ServeArgs {
    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8050)]
    pub port: u16,

    /// Verbose logging (default level `debug` instead of `info`).
    #[arg(long)]
    pub debug: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Write summary.csv, report.json and the chart SVGs into this directory.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Verbose logging.
    #[arg(long)]
    pub debug: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn serve_defaults() {
        let Command::Serve(args) = parse(&["gss", "serve"]).command else {
            panic!("expected serve");
        };
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 8050);
        assert!(!args.debug);
        assert_eq!(
            args.source.to_source(),
            DataSource::Remote {
                url: DEFAULT_SOURCE_URL.to_string()
            }
        );
    }

    #[test]
    fn source_flags_select_source() {
        let Command::Report(args) = parse(&["gss", "report", "--sample", "50", "--seed", "7"]).command else {
            panic!("expected report");
        };
        assert_eq!(args.source.to_source(), DataSource::Sample { count: 50, seed: 7 });

        let Command::Serve(args) = parse(&["gss", "serve", "--csv", "gss.csv", "-p", "9000"]).command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, 9000);
        assert_eq!(args.source.to_source(), DataSource::File { path: "gss.csv".into() });
    }

    #[test]
    fn csv_and_sample_conflict() {
        assert!(Cli::try_parse_from(["gss", "report", "--csv", "a.csv", "--sample", "5"]).is_err());
    }
}
