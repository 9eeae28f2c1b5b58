//! `gss-dashboard` library crate.
//!
//! The binary (`gss`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or opening sockets
//! - the report can be built once and served or exported from the same code

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod web;
