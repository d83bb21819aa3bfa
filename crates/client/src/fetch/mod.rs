//! HTTP fetch of interaction lookup pages.
//!
//! ### Request
//! - One GET per drug to the configured template URL, no retry.
//! - Drug names are form-encoded unless `encode_drug_names` is off.
//! - Max redirects: 5, timeout: 20s, max body bytes: 5MB (configurable).
//!
//! ### Outcome
//! - Only status 200 counts as success. Any other status becomes
//!   `TransportFailure::Status` and the body is never read.
//! - Past the redirect limit the last 3xx response is returned as is, so it
//!   surfaces as a `Status` failure carrying that code.
//! - Connection, DNS, timeout and read errors become `TransportFailure::Network`.

pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use ddicheck_core::config::DRUG_PLACEHOLDER;
use ddicheck_core::{AppConfig, Error, TransportFailure};
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use self::url::{UrlError, lookup_url};

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Lookup URL template containing `{drug}`
    pub lookup_url: String,

    /// Whether to form-encode drug names (default: true)
    pub encode_drug_names: bool,

    /// User agent string (default: "ddicheck/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            lookup_url: config.lookup_url.clone(),
            encode_drug_names: config.encode_drug_names,
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// A successfully fetched lookup page.
#[derive(Debug, Clone)]
pub struct DocumentBody {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Source of lookup pages for drug identifiers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the interaction page for one drug.
    async fn fetch(&self, drug: &str) -> Result<DocumentBody, TransportFailure>;
}

/// Fetcher backed by reqwest.
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    ///
    /// Fails with `InvalidUrl` if the lookup template cannot produce an http(s) URL.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        if !config.lookup_url.contains(DRUG_PLACEHOLDER) {
            return Err(Error::InvalidUrl(format!(
                "lookup URL template must contain {}: {}",
                DRUG_PLACEHOLDER, config.lookup_url
            )));
        }
        lookup_url(&config.lookup_url, "aspirin", config.encode_drug_names)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.lookup_url, e)))?;

        let max_redirects = config.max_redirects;
        let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() > max_redirects { attempt.stop() } else { attempt.follow() }
        });

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(redirect_policy)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// The URL that would be requested for `drug`.
    pub fn lookup_url(&self, drug: &str) -> Result<Url, UrlError> {
        lookup_url(&self.config.lookup_url, drug, self.config.encode_drug_names)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn too_large(&self, size: u64) -> TransportFailure {
        TransportFailure::TooLarge { size, limit: self.config.max_bytes as u64 }
    }
}

fn network_failure(err: &reqwest::Error) -> TransportFailure {
    let message = if err.is_timeout() { format!("request timed out: {}", err) } else { format!("network error: {}", err) };
    TransportFailure::Network { message }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, drug: &str) -> Result<DocumentBody, TransportFailure> {
        let start = Instant::now();
        let url = self
            .lookup_url(drug)
            .map_err(|e| TransportFailure::Network { message: format!("cannot build lookup URL: {}", e) })?;

        let response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| network_failure(&e))?;

        let status = response.status();

        if status != StatusCode::OK {
            tracing::debug!("lookup for {} returned status {}", drug, status.as_u16());
            return Err(TransportFailure::Status { code: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(self.too_large(len));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| network_failure(&e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(self.too_large(bytes.len() as u64));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(DocumentBody { url, final_url, content_type, bytes, fetch_ms })
    }
}
