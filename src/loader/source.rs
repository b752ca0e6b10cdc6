//! Where page resources come from.

use super::error::LoadError;
use reqwest::blocking::Client;
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Endpoint serving the layout JSON of a page.
pub const LAYOUT_ENDPOINT: &str = "api/get-json-file";
/// Endpoint serving the rendered page raster.
pub const IMAGE_ENDPOINT: &str = "api/get-pdf-file";

/// A backend that serves page layout documents and page rasters by name.
///
/// Implementations are called from two threads at once, one per resource.
pub trait PageSource: Send + Sync {
    /// Raw layout JSON for `file_name`.
    fn fetch_layout(&self, file_name: &str) -> Result<Vec<u8>, LoadError>;

    /// Encoded page image for `file_name`.
    fn fetch_image(&self, file_name: &str) -> Result<Vec<u8>, LoadError>;
}

/// The HTTP backend.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    base_url: Url,
}

impl HttpPageSource {
    /// A source rooted at `base_url`, with an optional request timeout.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, LoadError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| LoadError::Network {
            url: base_url.to_owned(),
            source,
        })?;
        Self::with_client(base_url, client)
    }

    /// A source rooted at `base_url` that sends requests through `client`.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self, LoadError> {
        // A trailing slash makes `Url::join` append instead of replace.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized).map_err(|e| LoadError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { client, base_url })
    }

    /// Full URL of `endpoint` for a resource name.
    pub fn endpoint_url(&self, endpoint: &str, file_name: &str) -> Result<Url, LoadError> {
        let mut url = self.base_url.join(endpoint).map_err(|e| LoadError::InvalidUrl {
            url: self.base_url.to_string(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("fileName", file_name);
        Ok(url)
    }

    fn get(&self, endpoint: &str, file_name: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.endpoint_url(endpoint, file_name)?;
        let shown = url.to_string();
        debug!(url = %shown, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| LoadError::Network {
                url: shown.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: shown,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|source| LoadError::Network { url: shown, source })?;
        Ok(body.to_vec())
    }
}

impl PageSource for HttpPageSource {
    fn fetch_layout(&self, file_name: &str) -> Result<Vec<u8>, LoadError> {
        self.get(LAYOUT_ENDPOINT, file_name)
    }

    fn fetch_image(&self, file_name: &str) -> Result<Vec<u8>, LoadError> {
        self.get(IMAGE_ENDPOINT, file_name)
    }
}
