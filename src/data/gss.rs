//! Remote fetch of the GSS extract.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::AppError;
use crate::io::ingest::{IngestedData, ingest_bytes};

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

pub struct GssClient {
    client: Client,
    url: String,
}

impl GssClient {
    pub fn new(url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Download the raw (Windows-1252 encoded) CSV bytes.
    ///
    /// One attempt only; any failure is returned to the caller.
    pub fn fetch_raw(&self) -> Result<Vec<u8>, AppError> {
        log::info!("fetching dataset from {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::runtime(format!("Dataset request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "Dataset request failed with status {}.",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| AppError::runtime(format!("Failed to read dataset body: {e}")))?;
        log::debug!("downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Fetch and clean in one step.
    pub fn fetch_dataset(&self) -> Result<IngestedData, AppError> {
        let raw = self.fetch_raw()?;
        ingest_bytes(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EXIT_RUNTIME;

    #[test]
    fn unreachable_source_is_a_runtime_error() {
        // Port 1 on loopback refuses the connection.
        let client = GssClient::new("http://127.0.0.1:1/gss2018.csv").unwrap();
        let err = client.fetch_dataset().unwrap_err();
        assert_eq!(err.exit_code(), EXIT_RUNTIME);
        assert!(err.message().starts_with("Dataset request failed"), "{err}");
    }
}
