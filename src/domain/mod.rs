//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the fixed column vocabulary (`Column`, `XAxisColumn`, `GroupColumn`)
//! - the cleaned survey table (`Respondent`, `Dataset`)
//! - resolved run configuration (`DataSource`, `ServeConfig`, `ReportConfig`)

pub mod types;

pub use types::*;
