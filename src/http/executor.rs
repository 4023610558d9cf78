//! The resilient request executor.
//!
//! Builds a validated [`EndpointRequest`], performs it through the
//! [`Connector`] seam, and applies the retry policy:
//!
//! - **Exactly one retry**, for every endpoint, triggered by either a
//!   transport timeout on the first attempt or a retryable status
//!   (`500`, `503`, `504`) on the first attempt. `502` is deliberately not
//!   retryable.
//! - A fixed backoff of 1000 ms before the retry, for both trigger cases.
//! - The retry attempt's outcome is returned unconditionally: a timeout on
//!   the second attempt propagates as-is, with no third attempt.
//! - Non-timeout transport failures are never retried.
//!
//! The final outcome is then classified: a persistent retryable status
//! becomes [`AuthError::ServerError`] even though a response was received,
//! while any other status, including 4xx and 502, is a successful executor
//! outcome whose HTTP semantics are the caller's concern.
//!
//! # Examples
//!
//! ```ignore
//! use silent_auth::http::RequestExecutor;
//! use std::collections::HashMap;
//!
//! let executor = RequestExecutor::new();
//! let response = executor
//!     .send_get("https://login.example.com/health", HashMap::new())
//!     .await?;
//! assert_eq!(response.status(), 200);
//! ```

use crate::error::{AuthError, Result};
use crate::http::connector::{ConnectError, Connector, HttpConnector};
use crate::http::request::EndpointRequest;
use crate::http::response::EndpointResponse;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Waiting period before the single retry, to avoid hitting the server again
/// immediately after a failure.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(1000);

/// True for the statuses the executor retries once: Internal Server Error,
/// Service Unavailable and Gateway Timeout. 502 Bad Gateway is excluded on
/// purpose; do not widen this to all 5xx.
pub fn retryable_status(status: u16) -> bool {
    matches!(status, 500 | 503 | 504)
}

/// Sends single HTTP requests with the bounded retry policy.
///
/// Each call is independent and blocking only for its own task: there is no
/// shared mutable state, so one executor may be used concurrently from any
/// number of tasks. Worst case per call is two connect/read timeout windows
/// plus one backoff.
#[derive(Clone)]
pub struct RequestExecutor {
    connector: Arc<dyn Connector>,
    backoff: Duration,
}

impl RequestExecutor {
    /// Executor backed by the production [`HttpConnector`].
    pub fn new() -> Self {
        Self::with_connector(Arc::new(HttpConnector::new()))
    }

    /// Executor backed by a custom connector. This is the substitution seam
    /// for tests.
    pub fn with_connector(connector: Arc<dyn Connector>) -> Self {
        RequestExecutor {
            connector,
            backoff: RETRY_BACKOFF,
        }
    }

    /// Override the retry backoff. Intended for tests; production code keeps
    /// the fixed [`RETRY_BACKOFF`].
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Send a GET request.
    pub async fn send_get(
        &self,
        url: &str,
        headers: HashMap<String, String>,
    ) -> Result<EndpointResponse> {
        let request = EndpointRequest::get(url, headers)?;
        self.send(&request).await
    }

    /// Send a POST request with an optional body and content type.
    pub async fn send_post(
        &self,
        url: &str,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
        content_type: Option<String>,
    ) -> Result<EndpointResponse> {
        let request = EndpointRequest::post(url, headers, body, content_type)?;
        self.send(&request).await
    }

    /// Execute with retry, then classify the final outcome.
    async fn send(&self, request: &EndpointRequest) -> Result<EndpointResponse> {
        let response = match self.send_with_retry(request).await {
            Ok(response) => response,
            Err(ConnectError::Timeout(message)) => {
                return Err(AuthError::NetworkTimeout(message));
            }
            Err(ConnectError::Io(message)) => return Err(AuthError::Transport(message)),
        };

        if retryable_status(response.status()) {
            // The retry already ran; a persistent retryable status is a
            // failure of the whole operation.
            return Err(AuthError::ServerError {
                status: response.status(),
                body: response.into_body(),
            });
        }

        Ok(response)
    }

    /// One attempt, plus at most one more when the first attempt times out or
    /// returns a retryable status. Whatever the second attempt produces is
    /// returned unconditionally.
    async fn send_with_retry(
        &self,
        request: &EndpointRequest,
    ) -> std::result::Result<EndpointResponse, ConnectError> {
        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = match self.connector.open(request).await {
            Ok(response) => response,
            Err(ConnectError::Timeout(message)) => {
                tracing::warn!(url = %request.url(), %message, "timeout, retrying once");
                self.wait_before_retry().await;
                return self.connector.open(request).await;
            }
            // Other transport failures are not retried.
            Err(other) => return Err(other),
        };

        if retryable_status(response.status()) {
            tracing::warn!(
                url = %request.url(),
                status = response.status(),
                "retryable status, retrying once"
            );
            self.wait_before_retry().await;
            return self.connector.open(request).await;
        }

        Ok(response)
    }

    async fn wait_before_retry(&self) {
        sleep(self.backoff).await;
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}
