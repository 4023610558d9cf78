//! Blocking wrappers for callers without an async runtime.
//!
//! [`SingleAccountClient`](crate::SingleAccountClient) is async; the
//! wrapper here owns a private current-thread runtime and drives the same
//! implementation to completion on the calling thread, so both variants
//! share identical semantics. Each call occupies the calling thread for the
//! full duration of connect + read (+ the 1 second backoff when a retry
//! triggers); invoke it from a worker thread when that matters.
//!
//! # Examples
//!
//! ```ignore
//! use silent_auth::blocking::SingleAccountClient;
//! use silent_auth::{ClientConfig, TokenRequest};
//!
//! let client = SingleAccountClient::new(ClientConfig::new(
//!     "client-id",
//!     "https://login.example.com/common",
//! ))?;
//! let result = client.acquire_token_silent(&TokenRequest::new(["user.read"]))?;
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AccessCredential, Account, AuthenticationResult, CurrentAccount, TokenRequest};
use crate::{ClientConfig, TokenCache};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Blocking facade over [`crate::SingleAccountClient`].
pub struct SingleAccountClient {
    inner: crate::SingleAccountClient,
    runtime: Runtime,
}

impl SingleAccountClient {
    /// Blocking client with the production executor and an in-memory cache.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AuthError::Transport(format!("failed to start runtime: {e}")))?;
        // The reqwest client must be created inside a runtime context.
        let inner = runtime.block_on(async { crate::SingleAccountClient::new(config) });
        Ok(SingleAccountClient { inner, runtime })
    }

    /// Blocking client over an existing async client (custom executor or
    /// cache already wired in).
    pub fn from_async(inner: crate::SingleAccountClient) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| AuthError::Transport(format!("failed to start runtime: {e}")))?;
        Ok(SingleAccountClient { inner, runtime })
    }

    /// Blocking variant of
    /// [`get_current_account`](crate::SingleAccountClient::get_current_account).
    pub fn get_current_account(&self) -> Result<CurrentAccount> {
        self.runtime.block_on(self.inner.get_current_account())
    }

    /// Blocking variant of
    /// [`sign_in`](crate::SingleAccountClient::sign_in).
    pub fn sign_in(
        &self,
        account: Account,
        credential: AccessCredential,
        refresh_token: Option<String>,
    ) -> Result<()> {
        self.runtime
            .block_on(self.inner.sign_in(account, credential, refresh_token))
    }

    /// Blocking variant of
    /// [`sign_out`](crate::SingleAccountClient::sign_out).
    pub fn sign_out(&self) -> Result<bool> {
        self.runtime.block_on(self.inner.sign_out())
    }

    /// Blocking variant of
    /// [`acquire_token_silent`](crate::SingleAccountClient::acquire_token_silent).
    pub fn acquire_token_silent(&self, request: &TokenRequest) -> Result<AuthenticationResult> {
        self.runtime
            .block_on(self.inner.acquire_token_silent(request))
    }

    /// Access the wrapped async client.
    pub fn as_async(&self) -> &crate::SingleAccountClient {
        &self.inner
    }
}

/// Convenience constructor matching
/// [`crate::SingleAccountClient::with_parts`].
pub fn with_parts(
    config: ClientConfig,
    executor: crate::http::RequestExecutor,
    cache: Arc<dyn TokenCache>,
) -> Result<SingleAccountClient> {
    SingleAccountClient::from_async(crate::SingleAccountClient::with_parts(
        config, executor, cache,
    ))
}
