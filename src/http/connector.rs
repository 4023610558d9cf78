//! The pluggable transport seam and its production implementation.
//!
//! A [`Connector`] performs exactly one physical attempt: it carries no retry
//! logic, no backoff, and no failure classification beyond the
//! timeout/other-I/O split the executor's retry rule depends on. The
//! production [`HttpConnector`] is backed by a shared [`reqwest::Client`];
//! tests substitute scripted implementations.

use crate::http::request::EndpointRequest;
use crate::http::response::EndpointResponse;
use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Fixed connect timeout for every attempt.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(3000);
/// Fixed read timeout for every attempt.
pub const READ_TIMEOUT: Duration = Duration::from_millis(3000);

/// A transport-level failure from a single connection attempt.
///
/// Timeouts are kept distinct because the retry policy treats them
/// differently from every other I/O failure.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The attempt timed out (connecting or reading).
    #[error("timed out: {0}")]
    Timeout(String),
    /// Any other I/O failure.
    #[error("i/o failure: {0}")]
    Io(String),
}

/// Capability seam for opening one connection attempt.
///
/// Implementations must be safe to call concurrently; the executor may be
/// driven from many tasks at once.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Perform a single attempt for the given request and return the full
    /// response, or a classified transport failure. Non-2xx statuses are
    /// *not* failures at this level.
    async fn open(&self, request: &EndpointRequest) -> Result<EndpointResponse, ConnectError>;
}

/// Production connector backed by reqwest.
///
/// Each attempt:
/// - applies the fixed connect/read timeouts;
/// - asks the server not to keep the connection alive (`Connection: close`,
///   best-effort);
/// - follows redirects and never caches responses;
/// - declares the exact `Content-Length` up front when a body is present
///   (fixed-length, non-chunked) and sets `Content-Type` when non-empty.
#[derive(Clone)]
pub struct HttpConnector {
    client: reqwest::Client,
}

impl HttpConnector {
    /// Create a connector with the fixed timeout/redirect configuration.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .redirect(Policy::limited(10))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to default reqwest client");
                reqwest::Client::new()
            });
        HttpConnector { client }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn open(&self, request: &EndpointRequest) -> Result<EndpointResponse, ConnectError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .header(reqwest::header::CONNECTION, "close");

        for (key, value) in request.headers() {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body() {
            if let Some(content_type) = request.content_type() {
                if !content_type.is_empty() {
                    builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
                }
            }
            // Bytes bodies are sent with an exact Content-Length, never
            // chunked.
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers
                    .entry(key.as_str().to_string())
                    .or_default()
                    .push(value.to_string());
            }
        }

        // reqwest drops the body stream on every exit path; an empty body
        // reads as an empty string, never as an absent value.
        let body = response.text().await.map_err(classify)?;

        Ok(EndpointResponse::new(status, body, headers))
    }
}

fn classify(error: reqwest::Error) -> ConnectError {
    if error.is_timeout() {
        ConnectError::Timeout(error.to_string())
    } else {
        ConnectError::Io(error.to_string())
    }
}
