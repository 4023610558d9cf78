#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Design
//!
//! Two cooperating components, with data flowing one direction:
//!
//! 1. **Request executor** ([`http`]): builds and sends a single GET/POST,
//!    classifies the outcome, and applies the bounded retry policy: exactly
//!    one retry, 1 second backoff, triggered by a transport timeout or a
//!    `500`/`503`/`504` response (`502` is deliberately excluded). A
//!    persistent retryable status is reported as [`AuthError::ServerError`]
//!    rather than handed back as a response; every other status, 4xx
//!    included, is a successful executor outcome for the caller to
//!    interpret.
//! 2. **Silent acquisition coordinator** ([`client`]): decides whether a
//!    cached credential satisfies a token request or whether a
//!    refresh-token exchange must run through the executor, owns the
//!    single current-account slot, and reports account transitions to
//!    callers and observers.
//!
//! The transport ([`http::Connector`]) and the token store ([`TokenCache`])
//! are trait seams: production uses reqwest and an in-memory cache, tests
//! substitute their own. Interactive sign-in, durable credential storage and
//! token validation stay outside the crate.
//!
//! ## Concurrency
//!
//! Executor calls share no mutable state and may run concurrently from any
//! number of tasks. The coordinator's account slot is mutex-guarded so
//! sign-in/sign-out/refresh serialize, and account-change notifications are
//! emitted exactly once per transition. Callers that cannot await use the
//! [`blocking`] wrappers.
//!
//! ## Module Structure
//!
//! - **[`http`]** - endpoint request/response types, the connector seam, and
//!   the retrying executor
//! - **[`client`]** - configuration, token cache seam, refresh exchange, and
//!   the single-account coordinator
//! - **[`types`]** - accounts, scopes, credentials, results
//! - **[`error`]** - the failure taxonomy
//! - **[`blocking`]** - synchronous wrappers owning a private runtime

pub mod blocking;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::{
    AccountChangeSubscription, ClientConfig, InMemoryTokenCache, SingleAccountClient, TokenCache,
    RESERVED_SCOPES,
};
pub use error::{AuthError, Result};
pub use http::{EndpointRequest, EndpointResponse, RequestExecutor};
pub use types::{
    AccessCredential, Account, AccountChange, AuthenticationResult, CurrentAccount, ScopeSet,
    TokenRequest,
};
