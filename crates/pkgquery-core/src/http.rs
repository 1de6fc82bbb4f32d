use crate::error::{CoreError, Result};
use std::time::Duration;

/// Default outbound request timeout. Conservative enough for slow registry
/// mirrors without holding a request slot open indefinitely.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Thin wrapper around a shared `reqwest::Client`.
///
/// One client is built at startup and shared by all registry clients so
/// connections are pooled. There is deliberately no response caching: each
/// incoming request issues exactly one outbound call.
///
/// # Examples
///
/// ```no_run
/// use pkgquery_core::HttpClient;
///
/// # async fn example() -> pkgquery_core::error::Result<()> {
/// let http = HttpClient::new();
/// let body = http.get("https://pypi.org/pypi/flask/json").await?;
/// println!("fetched {} bytes", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with an explicit timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying TLS backend cannot be initialized, which
    /// means the process cannot do any useful work.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pkgquery/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }

    /// Performs a GET request and returns the response body.
    ///
    /// # Errors
    ///
    /// - `CoreError::RegistryStatus` with the status code for non-2xx
    ///   responses (the caller maps 404 to a not-found error);
    /// - `CoreError::RegistryError` for transport failures, including
    ///   timeouts.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CoreError::RegistryError {
                package: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "registry returned error status");
            return Err(CoreError::RegistryStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CoreError::RegistryError {
                package: url.to_string(),
                source: e,
            })?;

        Ok(body.to_vec())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
