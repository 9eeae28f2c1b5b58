//! Dataset sources: the remote GSS extract and a synthetic stand-in.

pub mod gss;
pub mod sample;

pub use gss::GssClient;
pub use sample::{generate_sample_csv, sample_dataset};
