//! Endpoint request construction and validation.
//!
//! An [`EndpointRequest`] is validated and frozen before any network
//! activity:
//!
//! - the URL must parse and must use the `http` or `https` scheme
//!   (case-insensitive; the parser normalizes schemes to lowercase);
//! - a `Host` header is always synthesized from the URL authority, with the
//!   scheme's default port (`:80` / `:443`) appended when the URL carries no
//!   explicit port;
//! - caller-supplied headers merge in *after* the computed `Host`, so a
//!   caller mapping for `Host` overwrites the computed value (last-wins) but
//!   the header can never be silently absent.
//!
//! Construction failures are [`AuthError::InvalidArgument`] and occur before
//! any I/O.

use crate::error::{AuthError, Result};
use bytes::Bytes;
use http::Method;
use std::collections::HashMap;
use url::Url;

/// Header name for the synthesized host mapping.
pub const HOST_HEADER: &str = "Host";

const HTTP_SCHEME: &str = "http";
const HTTPS_SCHEME: &str = "https";
const HTTP_DEFAULT_PORT: u16 = 80;
const HTTPS_DEFAULT_PORT: u16 = 443;

/// An immutable, validated HTTP request against a single endpoint.
///
/// Produced by [`EndpointRequest::get`] / [`EndpointRequest::post`] and
/// consumed by the executor; fields are never mutated after construction.
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    url: Url,
    method: Method,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
    content_type: Option<String>,
}

impl EndpointRequest {
    /// Build a GET request.
    pub fn get(url: &str, headers: HashMap<String, String>) -> Result<Self> {
        Self::new(Method::GET, url, headers, None, None)
    }

    /// Build a POST request with an optional body and content type.
    pub fn post(
        url: &str,
        headers: HashMap<String, String>,
        body: Option<Bytes>,
        content_type: Option<String>,
    ) -> Result<Self> {
        Self::new(Method::POST, url, headers, body, content_type)
    }

    fn new(
        method: Method,
        url: &str,
        caller_headers: HashMap<String, String>,
        body: Option<Bytes>,
        content_type: Option<String>,
    ) -> Result<Self> {
        let url: Url = url
            .parse()
            .map_err(|e| AuthError::InvalidArgument(format!("unparseable url: {e}")))?;

        if url.scheme() != HTTP_SCHEME && url.scheme() != HTTPS_SCHEME {
            return Err(AuthError::InvalidArgument(format!(
                "unsupported scheme '{}': only http and https are allowed",
                url.scheme()
            )));
        }

        let mut headers = HashMap::new();
        headers.insert(HOST_HEADER.to_string(), url_authority(&url)?);
        // Caller headers merge last so an explicit Host mapping wins.
        headers.extend(caller_headers);

        Ok(EndpointRequest {
            url,
            method,
            headers,
            body,
            content_type,
        })
    }

    /// The validated target URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The merged request headers, including the synthesized `Host`.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The request body, if any.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The content type to declare when a body is present. An empty string is
    /// treated as absent by the connector.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// Authority string for the `Host` header. The URL parser drops a port that
/// equals the scheme default, so "no explicit port" and "default port spelled
/// out" both resolve to the same `host:port` form.
fn url_authority(url: &Url) -> Result<String> {
    let host = url
        .host_str()
        .ok_or_else(|| AuthError::InvalidArgument("url has no host".to_string()))?;

    let port = url.port().unwrap_or(if url.scheme() == HTTPS_SCHEME {
        HTTPS_DEFAULT_PORT
    } else {
        HTTP_DEFAULT_PORT
    });

    Ok(format!("{host}:{port}"))
}
