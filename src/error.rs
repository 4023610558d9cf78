//! Error types and result handling.
//!
//! The taxonomy separates failures by where they occur and whether the retry
//! policy already ran:
//!
//! | Variant | Origin | Retried? |
//! |---------|--------|----------|
//! | [`AuthError::InvalidArgument`] | request construction | never reaches the network |
//! | [`AuthError::NetworkTimeout`] | transport | retry exhausted |
//! | [`AuthError::ServerError`] | final response was 500/503/504 | retry exhausted |
//! | [`AuthError::Transport`] | other I/O failure | not retried |
//! | [`AuthError::NoCurrentAccount`] | coordinator | not applicable |
//! | [`AuthError::AccountAlreadySignedIn`] | coordinator | not applicable |
//! | [`AuthError::CacheMiss`] | coordinator, no refresh token | not applicable |
//! | [`AuthError::RefreshFailure`] | token endpoint rejected the grant | not applicable |
//! | [`AuthError::InvalidResponse`] | token endpoint returned malformed JSON | not applicable |
//!
//! The coordinator propagates executor failures verbatim; it never
//! reinterprets a `ServerError` as a cache problem.

use thiserror::Error;

/// Result type alias using [`AuthError`].
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors surfaced by the request executor and the silent acquisition client.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Malformed request input (null/unparseable URL, non-http(s) scheme).
    /// Raised before any network activity.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The transport timed out and the retry policy is exhausted. Carries the
    /// original timeout message.
    #[error("network timeout: {0}")]
    NetworkTimeout(String),

    /// The final attempt returned a retryable status (500, 503 or 504).
    /// A response was technically received, but a persistent retryable status
    /// is a failure of the whole operation, not a partial success.
    #[error("server error: status {status}; body: {body}")]
    ServerError {
        /// HTTP status code of the final attempt.
        status: u16,
        /// Response body of the final attempt (may be empty).
        body: String,
    },

    /// Any other transport-level I/O failure. Not retried.
    #[error("transport error: {0}")]
    Transport(String),

    /// No account is signed in; silent acquisition has nothing to work with.
    #[error("no current account")]
    NoCurrentAccount,

    /// A different account already occupies the single-account slot. The
    /// existing account must be signed out first.
    #[error("another account is already signed in")]
    AccountAlreadySignedIn,

    /// No cached credential satisfied the request and no refresh token is
    /// available to attempt a network exchange.
    #[error("no cached credential or refresh token for the request")]
    CacheMiss,

    /// The token endpoint rejected the refresh-token grant.
    #[error("refresh failed: {error}: {description}")]
    RefreshFailure {
        /// Machine-readable error code from the token endpoint
        /// (e.g. `invalid_grant`), or the raw body when not JSON.
        error: String,
        /// Human-readable description from the token endpoint.
        description: String,
    },

    /// The token endpoint returned a success status with a body that could
    /// not be parsed as a token response.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    /// True when this failure is a transport timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AuthError::NetworkTimeout(_))
    }

    /// True when this failure came out of the request executor (as opposed to
    /// the coordinator's cache/exchange logic).
    pub fn is_executor_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidArgument(_)
                | AuthError::NetworkTimeout(_)
                | AuthError::ServerError { .. }
                | AuthError::Transport(_)
        )
    }
}
