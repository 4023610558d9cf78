//! End-to-end silent acquisition against a mock token endpoint.

use mockito::Matcher;
use silent_auth::http::RequestExecutor;
use silent_auth::{
    AccessCredential, Account, AuthError, ClientConfig, InMemoryTokenCache, ScopeSet,
    SingleAccountClient, TokenRequest,
};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

const TOKEN_PATH: &str = "/oauth2/v2.0/token";

fn account(authority: &str) -> Account {
    Account {
        id: "user-1".to_string(),
        home_account_id: "user-1.tenant".to_string(),
        tenant_id: "tenant".to_string(),
        authority: authority.to_string(),
        username: "user-1@example.com".to_string(),
    }
}

fn expired_credential() -> AccessCredential {
    AccessCredential {
        secret: "stale-token".to_string(),
        scopes: ScopeSet::new(["user.read", "openid", "profile", "offline_access"]),
        expires_on: SystemTime::now(),
    }
}

fn valid_credential() -> AccessCredential {
    AccessCredential {
        expires_on: SystemTime::now() + Duration::from_secs(3600),
        ..expired_credential()
    }
}

fn client_for(authority: &str) -> SingleAccountClient {
    SingleAccountClient::with_parts(
        ClientConfig::new("client-id", authority),
        RequestExecutor::new().with_backoff(Duration::ZERO),
        Arc::new(InMemoryTokenCache::new()),
    )
}

fn grant_matcher(refresh_token: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("grant_type".into(), "refresh_token".into()),
        Matcher::UrlEncoded("client_id".into(), "client-id".into()),
        Matcher::UrlEncoded("refresh_token".into(), refresh_token.into()),
        Matcher::UrlEncoded(
            "scope".into(),
            "user.read openid profile offline_access".into(),
        ),
    ])
}

#[tokio::test]
async fn expired_cache_triggers_refresh_and_updates_cache() {
    let mut server = mockito::Server::new_async().await;
    let authority = server.url();
    let mock = server
        .mock("POST", TOKEN_PATH)
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_header("client-request-id", Matcher::Any)
        .match_body(grant_matcher("rt-1"))
        .with_status(200)
        .with_body(r#"{"access_token":"fresh-token","expires_in":3600,"refresh_token":"rt-1","token_type":"Bearer"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&authority);
    client
        .sign_in(account(&authority), expired_credential(), Some("rt-1".into()))
        .await
        .unwrap();

    let request = TokenRequest::new(["user.read"]);
    let result = client.acquire_token_silent(&request).await.unwrap();
    assert_eq!(result.access_token, "fresh-token");
    assert!(!result.from_cache);

    // The refreshed credential now satisfies the same request from cache.
    let cached = client.acquire_token_silent(&request).await.unwrap();
    assert_eq!(cached.access_token, "fresh-token");
    assert!(cached.from_cache);

    mock.assert_async().await;
}

#[tokio::test]
async fn valid_cache_never_touches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let authority = server.url();
    let mock = server
        .mock("POST", TOKEN_PATH)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&authority);
    client
        .sign_in(account(&authority), valid_credential(), Some("rt-1".into()))
        .await
        .unwrap();

    let result = client
        .acquire_token_silent(&TokenRequest::new(["user.read"]))
        .await
        .unwrap();
    assert!(result.from_cache);
    assert_eq!(result.access_token, "stale-token");

    mock.assert_async().await;
}

#[tokio::test]
async fn rotated_refresh_token_is_used_on_the_next_exchange() {
    let mut server = mockito::Server::new_async().await;
    let authority = server.url();
    let first = server
        .mock("POST", TOKEN_PATH)
        .match_body(grant_matcher("rt-1"))
        .with_status(200)
        .with_body(r#"{"access_token":"t1","expires_in":3600,"refresh_token":"rt-2"}"#)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("POST", TOKEN_PATH)
        .match_body(grant_matcher("rt-2"))
        .with_status(200)
        .with_body(r#"{"access_token":"t2","expires_in":3600}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&authority);
    client
        .sign_in(account(&authority), expired_credential(), Some("rt-1".into()))
        .await
        .unwrap();

    let forced = TokenRequest::new(["user.read"]).force_refresh(true);
    assert_eq!(
        client.acquire_token_silent(&forced).await.unwrap().access_token,
        "t1"
    );
    assert_eq!(
        client.acquire_token_silent(&forced).await.unwrap().access_token,
        "t2"
    );

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn rejected_grant_surfaces_the_endpoint_error() {
    let mut server = mockito::Server::new_async().await;
    let authority = server.url();
    server
        .mock("POST", TOKEN_PATH)
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant","error_description":"refresh token revoked"}"#)
        .create_async()
        .await;

    let client = client_for(&authority);
    client
        .sign_in(account(&authority), expired_credential(), Some("rt-1".into()))
        .await
        .unwrap();

    let err = client
        .acquire_token_silent(&TokenRequest::new(["user.read"]))
        .await
        .unwrap_err();
    match err {
        AuthError::RefreshFailure { error, description } => {
            assert_eq!(error, "invalid_grant");
            assert_eq!(description, "refresh token revoked");
        }
        other => panic!("expected RefreshFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn persistent_outage_surfaces_the_executor_failure() {
    let mut server = mockito::Server::new_async().await;
    let authority = server.url();
    let mock = server
        .mock("POST", TOKEN_PATH)
        .with_status(503)
        .with_body("maintenance")
        .expect(2) // the executor's single retry, nothing more
        .create_async()
        .await;

    let client = client_for(&authority);
    client
        .sign_in(account(&authority), expired_credential(), Some("rt-1".into()))
        .await
        .unwrap();

    let err = client
        .acquire_token_silent(&TokenRequest::new(["user.read"]))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::ServerError { status: 503, .. }));
    mock.assert_async().await;
}

// The blocking facade drives the same implementation; a plain thread with no
// async runtime exercises the full sign-in → acquire → sign-out sequence.
#[test]
fn blocking_wrapper_has_identical_semantics() {
    let mut server = mockito::Server::new();
    let authority = server.url();
    let mock = server
        .mock("POST", TOKEN_PATH)
        .match_body(grant_matcher("rt-1"))
        .with_status(200)
        .with_body(r#"{"access_token":"fresh-token","expires_in":3600}"#)
        .expect(1)
        .create();

    let client = silent_auth::blocking::with_parts(
        ClientConfig::new("client-id", &authority),
        RequestExecutor::new().with_backoff(Duration::ZERO),
        Arc::new(InMemoryTokenCache::new()),
    )
    .unwrap();

    client
        .sign_in(account(&authority), expired_credential(), Some("rt-1".into()))
        .unwrap();

    // First report: none -> user-1.
    let loaded = client.get_current_account().unwrap();
    assert_eq!(loaded.account.as_ref().map(|a| a.id.as_str()), Some("user-1"));
    assert!(loaded.change.is_some());

    let result = client
        .acquire_token_silent(&TokenRequest::new(["user.read"]))
        .unwrap();
    assert_eq!(result.access_token, "fresh-token");

    assert!(client.sign_out().unwrap());
    let current = client.get_current_account().unwrap();
    assert_eq!(current.account, None);
    let change = current.change.unwrap();
    assert_eq!(change.prior.unwrap().id, "user-1");
    assert_eq!(change.current, None);

    mock.assert();
}
