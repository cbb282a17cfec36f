//! Analysis service client.
//!
//! The service is reached through the [`HttpClient`] trait so the session
//! controller can be driven by a stub in tests. [`ReqwestHttpClient`] is the
//! production implementation.

use std::sync::Arc;

use async_trait::async_trait;
use repotrace_models::AnalysisReport;
use tracing::{debug, trace};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{AnalysisError, Result};

/// Path segments of the analysis endpoint, relative to the base URL.
const ANALYZE_PATH: [&str; 2] = ["api", "analyze"];

/// Query parameter carrying the repository reference.
const REFERENCE_PARAM: &str = "url";

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP client abstraction.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issues a GET request and returns the response, whatever its status.
    ///
    /// Only failures to obtain a response are errors.
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

/// reqwest-backed [`HttpClient`].
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Creates a client honoring the configured timeout.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("repotrace/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AnalysisError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AnalysisError::Transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(format!("failed to read body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

/// Builds `<base>/api/analyze?url=<reference>` with the reference encoded.
pub fn analyze_url(base: &Url, reference: &str) -> Result<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|_| AnalysisError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(ANALYZE_PATH);
    url.query_pairs_mut().append_pair(REFERENCE_PARAM, reference);
    Ok(url)
}

/// Client for the analysis endpoint.
///
/// Cheap to clone; clones share the underlying HTTP client.
#[derive(Clone)]
pub struct AnalysisService {
    http: Arc<dyn HttpClient>,
    base_url: Url,
}

impl AnalysisService {
    /// Creates a service over an arbitrary HTTP client.
    pub fn new(http: Arc<dyn HttpClient>, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Creates a reqwest-backed service from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = ReqwestHttpClient::new(config)?;
        Ok(Self::new(Arc::new(http), config.base_url.clone()))
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Requests an analysis of `reference`.
    ///
    /// Non-2xx statuses and bodies that are not a valid report are errors.
    pub async fn analyze(&self, reference: &str) -> Result<AnalysisReport> {
        let url = analyze_url(&self.base_url, reference)?;
        debug!("Requesting analysis: {}", url);

        let response = self.http.get(&url).await?;
        if !response.is_success() {
            trace!("Error body: {}", response.body);
            return Err(AnalysisError::Status {
                status: response.status,
            });
        }

        Ok(AnalysisReport::from_json(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8080").unwrap()
    }

    #[test]
    fn test_analyze_url_encodes_reference() {
        let url = analyze_url(&base(), "octocat/Hello-World").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/analyze?url=octocat%2FHello-World"
        );
    }

    #[test]
    fn test_analyze_url_encodes_full_url() {
        let url = analyze_url(&base(), "https://github.com/rust-lang/rust?tab=1").unwrap();
        let (key, value) = url.query_pairs().next().unwrap();
        assert_eq!(key, "url");
        assert_eq!(value, "https://github.com/rust-lang/rust?tab=1");
        assert_eq!(url.query_pairs().count(), 1);
    }

    #[test]
    fn test_analyze_url_keeps_base_path() {
        let base = Url::parse("https://example.com/repotrace/").unwrap();
        let url = analyze_url(&base, "a/b").unwrap();
        assert_eq!(url.path(), "/repotrace/api/analyze");
    }

    #[test]
    fn test_http_response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
