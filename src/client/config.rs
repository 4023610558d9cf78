//! Client configuration.

/// Scopes the client always includes in a token request. Callers must not
/// pass these explicitly; they are appended after the requested scopes.
pub const RESERVED_SCOPES: [&str; 3] = ["openid", "profile", "offline_access"];

/// Configuration for a [`crate::SingleAccountClient`].
///
/// # Examples
///
/// ```
/// use silent_auth::ClientConfig;
///
/// let config = ClientConfig::new("my-client-id", "https://login.example.com/common");
/// assert_eq!(config.token_endpoint(None), "https://login.example.com/common/oauth2/v2.0/token");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Application (client) identifier registered with the identity service.
    pub client_id: String,
    /// Default authority used when a request carries no override.
    pub authority: String,
}

impl ClientConfig {
    /// Create a configuration with the given client id and default authority.
    pub fn new<C: Into<String>, A: Into<String>>(client_id: C, authority: A) -> Self {
        ClientConfig {
            client_id: client_id.into(),
            authority: authority.into().trim_end_matches('/').to_string(),
        }
    }

    /// The token endpoint under the effective authority. An override takes
    /// precedence over the configured default.
    pub fn token_endpoint(&self, authority_override: Option<&str>) -> String {
        let authority = authority_override
            .map(|a| a.trim_end_matches('/'))
            .unwrap_or(&self.authority);
        format!("{authority}/oauth2/v2.0/token")
    }

    /// The effective authority for a request.
    pub fn effective_authority(&self, authority_override: Option<&str>) -> String {
        authority_override
            .map(|a| a.trim_end_matches('/').to_string())
            .unwrap_or_else(|| self.authority.clone())
    }
}
