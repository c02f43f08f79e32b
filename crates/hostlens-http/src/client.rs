//! HTTP client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Method, Response};
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
};

/// Query string pairs appended to a request URL
pub type QueryParams<'a> = [(&'a str, String)];

/// Mockable HTTP client trait
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Execute a GET request
    async fn get(&self, url: &str, query: &QueryParams<'_>) -> Result<Response>;

    /// Execute a POST request with an optional JSON body
    async fn post_json(
        &self,
        url: &str,
        query: &QueryParams<'_>,
        body: Option<serde_json::Value>,
    ) -> Result<Response>;

    /// Execute a custom HTTP request
    async fn request(
        &self,
        method: Method,
        url: &str,
        query: &QueryParams<'_>,
        body: Option<serde_json::Value>,
    ) -> Result<Response>;
}

/// Production HTTP client
pub struct HttpClient {
    inner: reqwest::Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .redirect(if config.max_redirects > 0 {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            });

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        // Configure proxy if provided
        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        // Configure connection pooling
        if config.pool_enabled {
            builder = builder.pool_idle_timeout(config.pool_idle_timeout);
        } else {
            builder = builder.pool_max_idle_per_host(0);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Create HTTP client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default())
    }

    /// Get underlying reqwest client (for advanced usage)
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get(&self, url: &str, query: &QueryParams<'_>) -> Result<Response> {
        debug!("HTTP GET: {}", url);
        self.request(Method::GET, url, query, None).await
    }

    async fn post_json(
        &self,
        url: &str,
        query: &QueryParams<'_>,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        debug!("HTTP POST: {}", url);
        self.request(Method::POST, url, query, body).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        query: &QueryParams<'_>,
        body: Option<serde_json::Value>,
    ) -> Result<Response> {
        let url = url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let mut request = self
            .inner
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        if !query.is_empty() {
            request = request.query(query);
        }

        // `json` also sets Content-Type: application/json
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(HttpError::RequestFailed)?;

        // Check for HTTP error status
        if !response.status().is_success() {
            return Err(HttpError::HttpStatus {
                status: response.status(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        Ok(response)
    }
}

/// Create a shared HTTP client (Arc-wrapped for cloning)
pub fn shared_client(config: HttpConfig) -> Result<Arc<dyn HttpClientTrait>> {
    Ok(Arc::new(HttpClient::new(config)?))
}
