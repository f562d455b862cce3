//! Retry and timeout behavior of ResilientFetcher against a mock provider

use std::time::{Duration, Instant};

use serde_json::json;
use vidsearch_core::{FetchOptions, FetcherConfig, ResilientFetcher, VidsearchError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(max_attempts: u32, base_backoff_ms: u64) -> FetchOptions {
    FetchOptions {
        max_attempts,
        attempt_timeout: Duration::from_secs(5),
        base_backoff: Duration::from_millis(base_backoff_ms),
    }
}

fn fetcher() -> ResilientFetcher {
    ResilientFetcher::new().expect("Fetcher should build")
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_count": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let value: serde_json::Value = fetcher()
        .fetch_json_with(&url, &options(3, 10))
        .await
        .expect("Fetch should succeed");

    assert_eq!(value["total_count"], 3);
}

#[tokio::test]
async fn test_always_500_exhausts_attempts() {
    for max_attempts in 1..=4 {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(max_attempts as u64)
            .mount(&server)
            .await;

        let url = format!("{}/search/", server.uri());
        let result = fetcher().fetch_text_with(&url, &options(max_attempts, 5)).await;

        match result {
            Err(VidsearchError::ServerError { status, attempts }) => {
                assert_eq!(status, 500);
                assert_eq!(attempts, max_attempts);
            }
            other => panic!("Expected ServerError, got {:?}", other),
        }
        assert_eq!(request_count(&server).await, max_attempts as usize);
    }
}

#[tokio::test]
async fn test_429_then_200_retries_once_with_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"page": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let started = Instant::now();
    let value: serde_json::Value = fetcher()
        .fetch_json_with(&url, &options(3, 200))
        .await
        .expect("Second attempt should succeed");

    assert_eq!(value["page"], 1);
    assert_eq!(request_count(&server).await, 2);
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_backoff_grows_linearly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let started = Instant::now();
    let result = fetcher().fetch_text_with(&url, &options(3, 100)).await;

    assert!(matches!(result, Err(VidsearchError::ServerError { status: 503, .. })));
    // 100ms after attempt 1, 200ms after attempt 2, nothing after the last
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_rate_limited_exhaustion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let result = fetcher().fetch_text_with(&url, &options(2, 5)).await;

    assert!(matches!(result, Err(VidsearchError::RateLimited { attempts: 2 })));
}

#[tokio::test]
async fn test_404_fails_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let result = fetcher().fetch_text_with(&url, &options(3, 5)).await;

    match result {
        Err(VidsearchError::ClientError {
            status,
            status_text,
        }) => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("Expected ClientError, got {:?}", other),
    }
    assert_eq!(request_count(&server).await, 1);
}

#[tokio::test]
async fn test_client_error_after_transient_stops_retrying() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let result = fetcher().fetch_text_with(&url, &options(5, 5)).await;

    assert!(matches!(result, Err(VidsearchError::ClientError { status: 400, .. })));
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_timeout_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let options = FetchOptions {
        max_attempts: 2,
        attempt_timeout: Duration::from_millis(50),
        base_backoff: Duration::from_millis(5),
    };
    let started = Instant::now();
    let result = fetcher().fetch_text_with(&url, &options).await;

    assert!(matches!(result, Err(VidsearchError::Timeout { attempts: 2 })));
    assert_eq!(request_count(&server).await, 2);
    assert!(started.elapsed() < Duration::from_millis(500));
}

#[tokio::test]
async fn test_network_failure_exhausts_attempts() {
    // Bind then drop to get a port nothing listens on
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .expect("Should bind an ephemeral port")
        .port();

    let url = format!("http://127.0.0.1:{}/search/", port);
    let result = fetcher().fetch_text_with(&url, &options(2, 5)).await;

    assert!(matches!(result, Err(VidsearchError::NetworkError(_))));
}

#[tokio::test]
async fn test_timed_out_attempt_recovers_on_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"total_count": 1}))
                .set_delay(Duration::from_millis(500)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_count": 2})))
        .mount(&server)
        .await;

    let options = FetchOptions {
        max_attempts: 3,
        attempt_timeout: Duration::from_millis(50),
        base_backoff: Duration::from_millis(5),
    };
    let url = format!("{}/search/", server.uri());
    let value: serde_json::Value = fetcher()
        .fetch_json_with(&url, &options)
        .await
        .expect("Second attempt should succeed");

    assert_eq!(value["total_count"], 2);
    assert_eq!(request_count(&server).await, 2);
}

#[tokio::test]
async fn test_invalid_json_is_parse_error_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let result: vidsearch_core::Result<serde_json::Value> =
        fetcher().fetch_json_with(&url, &options(3, 5)).await;

    assert!(matches!(result, Err(VidsearchError::ParseError(_))));
}

#[tokio::test]
async fn test_zero_attempts_still_makes_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/search/", server.uri());
    let result = fetcher().fetch_text_with(&url, &options(0, 5)).await;

    assert!(matches!(result, Err(VidsearchError::ServerError { attempts: 1, .. })));
}

#[tokio::test]
async fn test_configured_defaults_are_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let config = FetcherConfig {
        base_url: server.uri(),
        max_attempts: 2,
        timeout_ms: 1_000,
        base_backoff_ms: 5,
    };
    let fetcher = ResilientFetcher::with_config(config).expect("Fetcher should build");
    let url = format!("{}/search/", fetcher.base_url());
    let result = fetcher.fetch_text(&url).await;

    assert!(matches!(result, Err(VidsearchError::ServerError { attempts: 2, .. })));
}
