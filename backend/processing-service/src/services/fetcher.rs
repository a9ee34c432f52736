//! Remote fetcher - retrieves source image bytes over HTTP
//!
//! One attempt per URL, no retries. Any transport or non-success status
//! outcome is surfaced as a fetch error carrying the URL; the caller decides
//! severity. No explicit timeout is configured beyond the client default.

use crate::error::{AppError, Result};
use bytes::Bytes;
use reqwest::Client as HttpClient;

pub struct ImageFetcher {
    client: HttpClient,
}

impl ImageFetcher {
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
        }
    }

    /// Fetch the raw bytes behind `url`
    pub async fn fetch(&self, url: &str) -> Result<Bytes> {
        let fetch_err = |reason: String| AppError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_err(e.to_string()))?;

        response.bytes().await.map_err(|e| fetch_err(e.to_string()))
    }
}

impl Default for ImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}
