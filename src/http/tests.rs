//! Tests for the HTTP transport module

use super::*;
use crate::config::SearchConfig;
use crate::error::{Error, ErrorKind};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn search_body(total: u64, ids: std::ops::Range<u64>) -> serde_json::Value {
    let items: Vec<_> = ids
        .map(|id| {
            json!({
                "id": id,
                "name": format!("repo-{id}"),
                "stargazers_count": 1000 - id,
                "owner": {"login": format!("owner-{id}"), "avatar_url": null}
            })
        })
        .collect();
    json!({"total_count": total, "incomplete_results": false, "items": items})
}

fn client_for(server: &MockServer) -> GitHubClient {
    let config = SearchConfig::builder()
        .base_url(server.uri())
        .language("swift")
        .build();
    GitHubClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_fetch_page_sends_search_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(query_param("q", "language:swift"))
        .and(query_param("sort", "stars"))
        .and(query_param("order", "desc"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "10"))
        .and(header("Accept", "application/vnd.github+json"))
        .and(header_exists("User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(25, 10..20)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.fetch_page(2, 10).await.unwrap();

    assert_eq!(response.page.total_count, 25);
    assert_eq!(response.page.items.len(), 10);
    assert_eq!(response.page.items[0].id, 10);
    assert_eq!(response.page.items[0].owner.login, "owner-10");
    assert!(response.rate_limit.is_none());
}

#[tokio::test]
async fn test_fetch_page_reads_rate_limit_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-RateLimit-Remaining", "9")
                .insert_header("X-RateLimit-Reset", "1700000060")
                .set_body_json(search_body(1, 0..1)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.fetch_page(1, 100).await.unwrap();

    let snapshot = response.rate_limit.unwrap();
    assert_eq!(snapshot.remaining, 9);
    assert_eq!(snapshot.reset_at.timestamp(), 1_700_000_060);
}

#[tokio::test]
async fn test_fetch_page_sends_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .and(header("Authorization", "token abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body(0, 0..0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = SearchConfig::builder()
        .base_url(mock_server.uri())
        .auth_token("abc123")
        .build();
    let client = GitHubClient::new(&config).unwrap();

    let response = client.fetch_page(1, 100).await.unwrap();
    assert_eq!(response.page.total_count, 0);
    assert!(response.page.items.is_empty());
}

#[tokio::test]
async fn test_fetch_page_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string("API rate limit exceeded for 127.0.0.1"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.fetch_page(1, 100).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServerError);
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("rate limit"));
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_page_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": "nope"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.fetch_page(1, 100).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    assert!(err.to_string().starts_with("Failed to decode response"));
}

#[tokio::test]
async fn test_fetch_page_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/repositories"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_json(search_body(0, 0..0)),
        )
        .mount(&mock_server)
        .await;

    let config = SearchConfig::builder()
        .base_url(mock_server.uri())
        .timeout(Duration::from_secs(1))
        .build();
    let client = GitHubClient::new(&config).unwrap();

    let err = client.fetch_page(1, 100).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 1000 }));
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn test_fetch_page_body_timeout() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    // Headers arrive at once, the body never finishes
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\n{")
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let config = SearchConfig::builder()
        .base_url(format!("http://{addr}"))
        .timeout(Duration::from_secs(1))
        .build();
    let client = GitHubClient::new(&config).unwrap();

    let err = client.fetch_page(1, 100).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 1000 }));
    server.abort();
}

#[tokio::test]
async fn test_fetch_page_connection_refused() {
    let config = SearchConfig::builder()
        .base_url("http://127.0.0.1:1")
        .build();
    let client = GitHubClient::new(&config).unwrap();

    let err = client.fetch_page(1, 100).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportFailure);
}

#[tokio::test]
async fn test_fetch_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "name": "The Octocat",
            "avatar_url": "https://avatars.example/octocat"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let user = client.fetch_user("octocat").await.unwrap();

    assert_eq!(user.login, "octocat");
    assert_eq!(user.name.as_deref(), Some("The Octocat"));
}

#[tokio::test]
async fn test_fetch_user_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.fetch_user("ghost").await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}
