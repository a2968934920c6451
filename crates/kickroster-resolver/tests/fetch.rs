//! Integration tests for `JsonFetcher` using wiremock HTTP mocks.

use std::time::Duration;

use kickroster_resolver::{FetchError, FetchOptions, JsonFetcher};
use reqwest::header::{HeaderValue, USER_AGENT};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> JsonFetcher {
    JsonFetcher::new().expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_json_parses_successful_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/channels/hyghman"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "slug": "hyghman" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let value = fetcher()
        .fetch_json(
            &format!("{}/api/v2/channels/hyghman", server.uri()),
            &FetchOptions::default(),
        )
        .await
        .expect("should parse json");

    assert_eq!(value["slug"], "hyghman");
}

#[tokio::test]
async fn fetch_json_sends_browser_headers_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    fetcher()
        .fetch_json(&server.uri(), &FetchOptions::default())
        .await
        .expect("ok");

    let requests = server.received_requests().await.expect("recording enabled");
    let headers = &requests[0].headers;
    let ua = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(ua.starts_with("Mozilla/5.0"), "unexpected user agent: {ua}");
    assert_eq!(
        headers.get("accept").and_then(|v| v.to_str().ok()),
        Some("application/json,text/plain,*/*")
    );
}

#[tokio::test]
async fn fetch_json_per_call_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let options =
        FetchOptions::default().with_header(USER_AGENT, HeaderValue::from_static("custom/1.0"));
    fetcher().fetch_json(&server.uri(), &options).await.expect("ok");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(
        requests[0]
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok()),
        Some("custom/1.0")
    );
}

#[tokio::test]
async fn fetch_json_reports_status_with_truncated_snippet() {
    let server = MockServer::start().await;
    let body = "e".repeat(1_000);
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string(body))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_json(&server.uri(), &FetchOptions::default())
        .await
        .unwrap_err();

    match err {
        FetchError::HttpStatus {
            status, snippet, ..
        } => {
            assert_eq!(status, 503);
            assert_eq!(snippet.len(), 300);
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_json_status_error_message_names_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_json(&server.uri(), &FetchOptions::default())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("HTTP 404"), "message: {message}");
    assert!(message.contains("not here"), "message: {message}");
}

#[tokio::test]
async fn fetch_json_reports_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_json(&server.uri(), &FetchOptions::default())
        .await
        .unwrap_err();

    match err {
        FetchError::Parse { snippet, .. } => assert_eq!(snippet, "<html>blocked</html>"),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_json_follows_relative_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "../new/final"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/final"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": 1 })))
        .expect(1)
        .mount(&server)
        .await;

    let value = fetcher()
        .fetch_json(&format!("{}/old/start", server.uri()), &FetchOptions::default())
        .await
        .expect("redirect should be followed");

    assert_eq!(value["ok"], 1);
}

#[tokio::test]
async fn fetch_json_follows_absolute_redirect_to_other_host() {
    let origin = MockServer::start().await;
    let target = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/moved", target.uri()).as_str()),
        )
        .mount(&origin)
        .await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "moved": true })))
        .expect(1)
        .mount(&target)
        .await;

    let value = fetcher()
        .fetch_json(&origin.uri(), &FetchOptions::default())
        .await
        .expect("redirect should be followed");

    assert_eq!(value["moved"], true);
}

#[tokio::test]
async fn fetch_json_redirect_budget_exhaustion_surfaces_last_hop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .expect(3)
        .mount(&server)
        .await;

    let options = FetchOptions::new(Duration::from_secs(5), 2);
    let err = fetcher()
        .fetch_json(&format!("{}/loop", server.uri()), &options)
        .await
        .unwrap_err();

    assert!(
        matches!(err, FetchError::HttpStatus { status: 302, .. }),
        "expected HttpStatus(302), got {err:?}"
    );
}

#[tokio::test]
async fn fetch_json_redirect_without_location_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(307))
        .expect(1)
        .mount(&server)
        .await;

    let err = fetcher()
        .fetch_json(&server.uri(), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpStatus { status: 307, .. }));
}

#[tokio::test]
async fn fetch_json_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let options = FetchOptions::new(Duration::from_millis(200), 3);
    let err = fetcher().fetch_json(&server.uri(), &options).await.unwrap_err();

    match err {
        FetchError::Timeout { timeout_ms, .. } => assert_eq!(timeout_ms, 200),
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_json_reports_connection_failure() {
    // Bind then drop a listener to get a port with nothing behind it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = fetcher()
        .fetch_json(&format!("http://{addr}/"), &FetchOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network { .. }), "got {err:?}");
}
