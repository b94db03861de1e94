mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use link_shortcut::domain::entities::NewLink;
use link_shortcut::domain::repositories::LinkRepository;
use link_shortcut::infrastructure::persistence::MemoryLinkRepository;
use serde_json::Value;

#[tokio::test]
async fn test_redirect_success() {
    let (server, state) = common::create_test_server();
    let hash = common::add_link(&state, "example.com").await;

    let response = server.get(&format!("/l/{hash}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "http://example.com");
}

#[tokio::test]
async fn test_redirect_aliases() {
    let (server, state) = common::create_test_server();
    let hash = common::add_link(&state, "https://rust-lang.org").await;

    for prefix in ["l", "link", "url"] {
        let response = server.get(&format!("/{prefix}/{hash}")).await;

        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.header("location"), "https://rust-lang.org");
    }
}

#[tokio::test]
async fn test_redirect_with_full_hash() {
    let (server, state) = common::create_test_server();
    common::add_link(&state, "example.com").await;

    // URL-safe base64 keeps '=' padding, which is valid in a path segment.
    let response = server.get("/l/roF3Sgod2P9BNSfe1s1vRg==").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_redirect_counts_accesses() {
    let repository = Arc::new(MemoryLinkRepository::new());
    let state = common::create_test_state_with(repository.clone());
    let hash = common::add_link(&state, "example.com").await;
    let server = common::create_test_server_for(state);

    for _ in 0..3 {
        server
            .get(&format!("/l/{hash}"))
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    let link = repository
        .find_by_url("http://example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(link.access_count, 3);
    assert_eq!(link.row_version, 3);
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (server, _state) = common::create_test_server();

    let response = server.get("/l/zzzzz").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_prefix_too_short() {
    let (server, state) = common::create_test_server();
    common::add_link(&state, "example.com").await;

    let response = server.get("/l/roF3").await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_redirect_ambiguous_prefix() {
    let repository = Arc::new(MemoryLinkRepository::new());
    for (url, hash) in [("http://a.com", "abcde111"), ("http://b.com", "abcde222")] {
        repository
            .create(NewLink {
                url: url.to_string(),
                hash: hash.to_string(),
                name: None,
                description: None,
            })
            .await
            .unwrap();
    }
    let state = common::create_test_state_with(repository.clone());
    let server = common::create_test_server_for(state);

    let response = server.get("/l/abcde").await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "ambiguous_identifier");

    // A longer prefix disambiguates.
    server
        .get("/l/abcde1")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
}
