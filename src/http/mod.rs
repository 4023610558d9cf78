//! Resilient HTTP execution against the token service.
//!
//! # Module Organization
//!
//! ```text
//! http/
//! ├── request   - EndpointRequest construction and validation
//! ├── response  - EndpointResponse (status, body, multi-valued headers)
//! ├── connector - Connector seam + reqwest-backed HttpConnector
//! └── executor  - RequestExecutor with the bounded retry policy
//! ```
//!
//! # Data Flow
//!
//! ```text
//! send_get / send_post
//!     → EndpointRequest (validate URL, synthesize Host)
//!     → send_with_retry (≤ 2 attempts through the Connector, 1 s backoff)
//!     → classify: Ok(response) | NetworkTimeout | ServerError | Transport
//! ```
//!
//! Fixed bounds: 3000 ms connect timeout, 3000 ms read timeout, 1000 ms
//! retry backoff, exactly one retry, retryable statuses `{500, 503, 504}`.

mod connector;
mod executor;
mod request;
mod response;

pub use connector::{ConnectError, Connector, HttpConnector, CONNECT_TIMEOUT, READ_TIMEOUT};
pub use executor::{retryable_status, RequestExecutor, RETRY_BACKOFF};
pub use request::EndpointRequest;
pub use response::EndpointResponse;
