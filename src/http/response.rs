//! Endpoint response representation.

use std::collections::HashMap;

/// An immutable response produced by a connector attempt.
///
/// The body is always a string: a server that returns no bytes yields an
/// empty string, never an absent value. Header keys are non-unique; every
/// value sent for a key is preserved, in no particular order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    status: u16,
    body: String,
    headers: HashMap<String, Vec<String>>,
}

impl EndpointResponse {
    /// Build a response. Only connector implementations should construct
    /// these; the executor and coordinator treat them as read-only.
    pub fn new(status: u16, body: String, headers: HashMap<String, Vec<String>>) -> Self {
        EndpointResponse {
            status,
            body,
            headers,
        }
    }

    /// HTTP status code of the response.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Full response body. Empty when the server sent none.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// All values recorded for a header key, if any.
    pub fn header_values(&self, key: &str) -> Option<&[String]> {
        self.headers.get(key).map(Vec::as_slice)
    }

    /// The complete response header mapping.
    pub fn headers(&self) -> &HashMap<String, Vec<String>> {
        &self.headers
    }

    /// Consume the response, returning the body.
    pub fn into_body(self) -> String {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_valued_headers_round_trip() {
        let mut headers = HashMap::new();
        headers.insert(
            "set-cookie".to_string(),
            vec!["a=1".to_string(), "b=2".to_string()],
        );
        let response = EndpointResponse::new(200, String::new(), headers);
        assert_eq!(response.header_values("set-cookie").unwrap().len(), 2);
        assert!(response.header_values("missing").is_none());
    }

    #[test]
    fn test_empty_body_is_empty_string() {
        let response = EndpointResponse::new(204, String::new(), HashMap::new());
        assert_eq!(response.body(), "");
        assert_eq!(response.status(), 204);
    }
}
