//! Input/output helpers.
//!
//! - CSV ingest + cleaning (`ingest`)
//! - static report exports (CSV/JSON/SVG) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
