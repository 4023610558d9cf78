//! Refresh-token grant against the token endpoint.
//!
//! Builds the `application/x-www-form-urlencoded` grant body, sends it
//! through the [`RequestExecutor`] (which owns all retry behavior), and maps
//! the endpoint's JSON success/error bodies into crate types. Executor
//! failures pass through untouched.

use crate::client::config::ClientConfig;
use crate::error::{AuthError, Result};
use crate::http::RequestExecutor;
use crate::types::{AccessCredential, ScopeSet};
use bytes::Bytes;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};
use url::form_urlencoded;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const CORRELATION_ID_HEADER: &str = "client-request-id";

/// Successful token response from the endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Error body from the endpoint (e.g. `invalid_grant`).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Result of a successful exchange.
#[derive(Debug)]
pub(crate) struct ExchangeOutcome {
    /// The freshly issued credential.
    pub credential: AccessCredential,
    /// A rotated refresh token, when the endpoint issued one.
    pub refresh_token: Option<String>,
}

/// Redeem a refresh token for a new access credential.
pub(crate) async fn redeem_refresh_token(
    executor: &RequestExecutor,
    config: &ClientConfig,
    authority_override: Option<&str>,
    refresh_token: &str,
    scopes: &ScopeSet,
) -> Result<ExchangeOutcome> {
    let endpoint = config.token_endpoint(authority_override);
    let body = build_grant_body(&config.client_id, refresh_token, scopes);

    let correlation_id = uuid::Uuid::new_v4().to_string();
    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert(CORRELATION_ID_HEADER.to_string(), correlation_id.clone());

    tracing::debug!(%endpoint, %correlation_id, "redeeming refresh token");

    let response = executor
        .send_post(
            &endpoint,
            headers,
            Some(Bytes::from(body)),
            Some(FORM_CONTENT_TYPE.to_string()),
        )
        .await?;

    let status = response.status();
    if !(200..300).contains(&status) {
        return Err(parse_error_body(status, response.body()));
    }

    parse_success_body(response.body(), scopes)
}

fn build_grant_body(client_id: &str, refresh_token: &str, scopes: &ScopeSet) -> String {
    form_urlencoded::Serializer::new(String::new())
        .append_pair("grant_type", "refresh_token")
        .append_pair("client_id", client_id)
        .append_pair("refresh_token", refresh_token)
        .append_pair("scope", &scopes.join())
        .finish()
}

fn parse_success_body(body: &str, requested_scopes: &ScopeSet) -> Result<ExchangeOutcome> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| AuthError::InvalidResponse(format!("token response: {e}")))?;

    // The endpoint may narrow or widen the granted scopes; trust its answer
    // when it gives one.
    let scopes = match parsed.scope.as_deref() {
        Some(granted) if !granted.is_empty() => ScopeSet::new(granted.split_whitespace()),
        _ => requested_scopes.clone(),
    };

    Ok(ExchangeOutcome {
        credential: AccessCredential {
            secret: parsed.access_token,
            scopes,
            expires_on: SystemTime::now() + Duration::from_secs(parsed.expires_in),
        },
        refresh_token: parsed.refresh_token,
    })
}

fn parse_error_body(status: u16, body: &str) -> AuthError {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(parsed) => AuthError::RefreshFailure {
            error: parsed.error,
            description: parsed.error_description,
        },
        // Not JSON; keep the raw body so nothing is lost.
        Err(_) => AuthError::RefreshFailure {
            error: format!("http_{status}"),
            description: body.to_string(),
        },
    }
}
