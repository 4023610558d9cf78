//! Request executor tests against a real HTTP server (mockito).
//!
//! Scripted-connector unit tests pin the retry policy attempt-by-attempt;
//! these tests confirm the production reqwest connector end to end: header
//! and body transmission, status pass-through, and attempt counts.

use silent_auth::http::RequestExecutor;
use silent_auth::AuthError;
use std::collections::HashMap;
use std::time::Duration;

fn executor() -> RequestExecutor {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    // Zero backoff keeps the retry tests fast; policy is otherwise stock.
    RequestExecutor::new().with_backoff(Duration::ZERO)
}

#[tokio::test]
async fn get_returns_status_body_and_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_header("x-request-tag", "abc")
        .with_body("alive")
        .create_async()
        .await;

    let response = executor()
        .send_get(&format!("{}/health", server.url()), HashMap::new())
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.body(), "alive");
    assert_eq!(
        response.header_values("x-request-tag"),
        Some(&["abc".to_string()][..])
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn post_transmits_body_and_content_type() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/token")
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body("grant_type=refresh_token")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let response = executor()
        .send_post(
            &format!("{}/token", server.url()),
            HashMap::new(),
            Some(bytes::Bytes::from_static(b"grant_type=refresh_token")),
            Some("application/x-www-form-urlencoded".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn caller_headers_reach_the_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_header("accept", "application/json")
        .with_status(200)
        .create_async()
        .await;

    let mut headers = HashMap::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    executor().send_get(&server.url(), headers).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn empty_body_reads_as_empty_string() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(204)
        .create_async()
        .await;

    let response = executor().send_get(&server.url(), HashMap::new()).await.unwrap();
    assert_eq!(response.status(), 204);
    assert_eq!(response.body(), "");
}

#[tokio::test]
async fn persistent_500_is_server_error_after_exactly_two_attempts() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(500)
        .with_body("boom")
        .expect(2)
        .create_async()
        .await;

    let err = executor().send_get(&server.url(), HashMap::new()).await.unwrap_err();
    match err {
        AuthError::ServerError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected ServerError, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn bad_gateway_passes_through_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(502)
        .with_body("bad gateway")
        .expect(1)
        .create_async()
        .await;

    let response = executor().send_get(&server.url(), HashMap::new()).await.unwrap();
    assert_eq!(response.status(), 502);
    assert_eq!(response.body(), "bad gateway");
    mock.assert_async().await;
}

#[tokio::test]
async fn client_error_is_a_successful_outcome() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .with_body(r#"{"error":"not_found"}"#)
        .create_async()
        .await;

    let response = executor()
        .send_get(&format!("{}/missing", server.url()), HashMap::new())
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert_eq!(response.body(), r#"{"error":"not_found"}"#);
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Port 9 (discard) is assumed closed.
    let err = executor()
        .send_get("http://127.0.0.1:9/", HashMap::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Transport(_) | AuthError::NetworkTimeout(_)
    ));
}

#[tokio::test]
async fn invalid_scheme_fails_before_any_network_activity() {
    let err = executor()
        .send_get("ftp://example.com/", HashMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidArgument(_)));
}
