//! Integration tests for the GitHub forge.
//!
//! The HTTP path is exercised against a local wiremock server through
//! `GitHubForge::with_api_base`; no network access is needed.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relcut::forge::github::GitHubForge;
use relcut::forge::{CreatePrRequest, Forge, ForgeError, PrState};

fn request() -> CreatePrRequest {
    CreatePrRequest {
        head: "release/candidate/v1.3.0".to_string(),
        base: "release/stable".to_string(),
        title: "Merge release candidate for v1.3.0".to_string(),
        body: "### This PR must be merged by merge commit".to_string(),
    }
}

#[tokio::test]
async fn create_pr_posts_expected_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/widgets/pulls"))
        .and(header("authorization", "Bearer token-123"))
        .and(body_partial_json(json!({
            "title": "Merge release candidate for v1.3.0",
            "head": "release/candidate/v1.3.0",
            "base": "release/stable",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "number": 42,
            "html_url": "https://github.com/acme/widgets/pull/42",
            "state": "open",
            "merged": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let forge = GitHubForge::with_api_base("token-123", "acme", "widgets", server.uri());
    let pr = forge.create_pr(request()).await.unwrap();

    assert_eq!(pr.number, 42);
    assert_eq!(pr.url, "https://github.com/acme/widgets/pull/42");
    assert_eq!(pr.state, PrState::Open);
}

#[tokio::test]
async fn bad_token_is_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;

    let forge = GitHubForge::with_api_base("bad", "acme", "widgets", server.uri());
    let err = forge.create_pr(request()).await.unwrap_err();

    match err {
        ForgeError::AuthFailed(message) => assert_eq!(message, "Bad credentials"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn validation_failure_carries_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "A pull request already exists for this head",
        })))
        .mount(&server)
        .await;

    let forge = GitHubForge::with_api_base("token", "acme", "widgets", server.uri());
    let err = forge.create_pr(request()).await.unwrap_err();

    match err {
        ForgeError::ApiError { status, message } => {
            assert_eq!(status, 422);
            assert!(message.contains("already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_repository_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let forge = GitHubForge::with_api_base("token", "acme", "gone", server.uri());
    let err = forge.create_pr(request()).await.unwrap_err();
    assert!(matches!(err, ForgeError::NotFound(_)));
}

#[tokio::test]
async fn connection_refused_is_network_error() {
    // Port 1 is never listening.
    let forge = GitHubForge::with_api_base("token", "acme", "widgets", "http://127.0.0.1:1");
    let err = forge.create_pr(request()).await.unwrap_err();
    assert!(matches!(err, ForgeError::NetworkError(_)));
}
