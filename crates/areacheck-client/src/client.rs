use areacheck_common::protocol::error::{AreaCheckError, Result};
use areacheck_common::protocol::Reply;
use areacheck_common::transport::{HttpTransport, CHECK_ROUTE, CLEAR_ROUTE};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::fmt::Display;
use std::time::Duration;

/// Timeout applied to each request unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the AreaCheck HTTP API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct AreaCheckClient {
    base_url: String,
    timeout: Duration,
    http: Client<HttpConnector, Full<Bytes>>,
}

impl AreaCheckClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.starts_with("http://") {
            return Err(AreaCheckError::InvalidConfig(format!(
                "Server URL must start with http://, got {}",
                base_url
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::builder(TokioExecutor::new()).build_http(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Evaluates a point.
    ///
    /// Coordinates are sent as their `Display` text, so `"abc"` reaches the
    /// server unchanged and comes back as a rejection.
    pub async fn check(&self, x: impl Display, y: impl Display, r: impl Display) -> Result<Reply> {
        parse_reply(&self.check_raw(x, y, r).await?)
    }

    /// Empties the server's history.
    pub async fn clear(&self) -> Result<Reply> {
        parse_reply(&self.clear_raw().await?)
    }

    /// Like [`check`](Self::check), but returns the reply text untouched.
    pub async fn check_raw(&self, x: impl Display, y: impl Display, r: impl Display) -> Result<String> {
        let body = HttpTransport::build_check_body(&x.to_string(), &y.to_string(), &r.to_string());
        self.post(CHECK_ROUTE, Some("application/json"), body).await
    }

    /// Like [`clear`](Self::clear), but returns the reply text untouched.
    pub async fn clear_raw(&self) -> Result<String> {
        self.post(CLEAR_ROUTE, None, String::new()).await
    }

    async fn post(&self, route: &str, content_type: Option<&str>, body: String) -> Result<String> {
        let url = format!("{}{}", self.base_url, route);

        let mut builder = Request::builder().method(Method::POST).uri(&url);
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| AreaCheckError::Transport(format!("Failed to build request: {}", e)))?;

        tracing::debug!("POST {}", url);

        let response = tokio::time::timeout(self.timeout, self.http.request(request))
            .await
            .map_err(|_| AreaCheckError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| AreaCheckError::Transport(format!("HTTP request failed: {}", e)))?;

        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| AreaCheckError::Transport(format!("Failed to read response: {}", e)))?
            .to_bytes();

        String::from_utf8(bytes.to_vec())
            .map_err(|e| AreaCheckError::InvalidResponse(format!("Reply is not UTF-8: {}", e)))
    }
}

/// Parses reply text, turning an `ok:false` envelope into [`AreaCheckError::Rejected`].
pub fn parse_reply(text: &str) -> Result<Reply> {
    let reply: Reply = serde_json::from_str(text)?;
    reply.into_result().map_err(AreaCheckError::Rejected)
}
