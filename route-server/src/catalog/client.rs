//! HTTP client for remotely hosted catalog assets.
//!
//! Used when the line and neighborhood GeoJSON files are served by a static
//! file host instead of being read from a local directory.

use std::sync::Arc;

use tokio::sync::Semaphore;

use super::error::CatalogError;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the HTTP catalog client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpCatalogConfig {
    /// Base URL under which the asset layout lives
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl HttpCatalogConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Asset client over HTTP.
///
/// Uses a semaphore to bound the number of in-flight requests, since a
/// matching run fetches every line at once.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl HttpCatalog {
    /// Create a new client with the given configuration.
    pub fn new(config: HttpCatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Full URL of an asset.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch an asset's bytes.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, CatalogError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| CatalogError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.url_for(path);
        tracing::debug!(%url, "fetching asset");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
