
use scalr_cli::cache::SchemaCache;
use scalr_cli::transport::{ApiRequest, HttpTransport, Transport};
use std::time::Duration;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Runs blocking client code off the async test runtime
async fn blocking<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test]
async fn test_request_headers_and_body_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/iacp/v3/workspaces"))
        .and(header("Authorization", "Bearer t0k"))
        .and(header("Content-Type", "application/vnd.api+json"))
        .and(body_string(r#"{"data":{}}"#))
        .respond_with(
            ResponseTemplate::new(201).set_body_raw(
                r#"{"data":{"id":"ws-1","type":"workspaces"}}"#,
                "application/vnd.api+json",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/api/iacp/v3/workspaces", server.uri());
    let response = blocking(move || {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let request = ApiRequest {
            method: "POST".to_string(),
            url,
            headers: vec![
                ("Authorization".to_string(), "Bearer t0k".to_string()),
                (
                    "Content-Type".to_string(),
                    "application/vnd.api+json".to_string(),
                ),
            ],
            body: Some(r#"{"data":{}}"#.to_string()),
        };
        transport.send(&request).unwrap()
    })
    .await;

    assert_eq!(response.status, 201);
    assert!(response.is_success());
    assert_eq!(response.content_type, "application/vnd.api+json");
    assert!(response.body.contains("ws-1"));
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .and(query_param("page[number]", "1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let url = format!("{}/missing?page%5Bnumber%5D=1", server.uri());
    let response = blocking(move || {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        transport.send(&ApiRequest::get(url)).unwrap()
    })
    .await;

    assert_eq!(response.status, 404);
    assert!(!response.is_success());
    assert_eq!(response.body, "not found");
}

#[tokio::test]
async fn test_schema_is_downloaded_once_and_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/iacp/v3/openapi-preview.yml"))
        .and(header("User-Agent", scalr_cli::config::context::user_agent().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(test_helpers::WORKSPACE_SCHEMA))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().to_path_buf();
    let base_url = server.uri();
    let schema_url = format!("{base_url}/api/iacp/v3/openapi-preview.yml");

    let (first, second, cached) = blocking(move || {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let cache = SchemaCache::new(
            &cache_dir,
            &base_url,
            "openapi-preview.yml",
            Duration::from_secs(3600),
        );
        let first = cache.load_index(&transport, &schema_url, false).unwrap();
        let second = cache.load_index(&transport, &schema_url, false).unwrap();
        (first.len(), second.len(), cache.path().exists())
    })
    .await;

    assert_eq!(first, 5);
    assert_eq!(second, 5);
    assert!(cached);
}

#[tokio::test]
async fn test_schema_download_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().to_path_buf();
    let base_url = server.uri();

    let err = blocking(move || {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let cache = SchemaCache::new(&cache_dir, &base_url, "openapi.yml", Duration::from_secs(60));
        cache
            .load_index(&transport, &format!("{base_url}/openapi.yml"), false)
            .unwrap_err()
    })
    .await;

    assert!(matches!(
        err,
        scalr_cli::error::Error::SchemaUnavailable { .. }
    ));
}
