//! Transport-level status classification and retry behavior, exercised
//! against a local mock server.

use std::time::Duration;

use zetsubou::{Error, ZetsubouClient};

fn client(base_url: &str, retry_attempts: u32) -> ZetsubouClient {
    ZetsubouClient::builder()
        .api_key("ztb_live_test")
        .base_url(base_url)
        .timeout(Duration::from_secs(5))
        .retry_attempts(retry_attempts)
        // Sub-second backoff so exhaustion tests stay fast; the growth
        // factor under test is unchanged.
        .retry_backoff(Duration::from_millis(10))
        .build()
        .unwrap()
}

#[tokio::test]
async fn client_errors_are_typed_and_never_retried() {
    let cases: &[(usize, fn(&Error) -> bool)] = &[
        (400, |e| matches!(e, Error::Validation(_))),
        (401, |e| matches!(e, Error::Authentication(_))),
        (404, |e| matches!(e, Error::NotFound(_))),
        (429, |e| matches!(e, Error::RateLimited { .. })),
    ];

    for (status, is_expected) in cases {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v2/tools")
            .with_status(*status)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "nope", "code": "NOPE"}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client(&server.url(), 3).tools().list().await.unwrap_err();
        assert!(is_expected(&err), "status {status} mapped to {err:?}");
        assert_eq!(err.status(), Some(*status as u16));
        assert_eq!(err.detail().unwrap().message, "nope");
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn rate_limit_surfaces_retry_after_header() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/tools")
        .with_status(429)
        .with_header("retry-after", "7")
        .with_body("{}")
        .create_async()
        .await;

    let err = client(&server.url(), 3).tools().list().await.unwrap_err();
    assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
}

#[tokio::test]
async fn rate_limit_defaults_to_sixty_seconds_without_header() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/tools")
        .with_status(429)
        .with_body("{}")
        .create_async()
        .await;

    let err = client(&server.url(), 3).tools().list().await.unwrap_err();
    assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
}

#[tokio::test]
async fn server_errors_exhaust_the_full_retry_budget() {
    let mut server = mockito::Server::new_async().await;
    // retry_attempts = 2 means exactly 3 total attempts.
    let mock = server
        .mock("GET", "/api/v2/tools")
        .with_status(503)
        .with_body(r#"{"message": "overloaded"}"#)
        .expect(3)
        .create_async()
        .await;

    let err = client(&server.url(), 2).tools().list().await.unwrap_err();
    assert!(matches!(err, Error::Server(_)), "got {err:?}");
    assert_eq!(err.detail().unwrap().message, "overloaded");
    mock.assert_async().await;
}

#[tokio::test]
async fn zero_retries_means_single_attempt() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/tools")
        .with_status(500)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let err = client(&server.url(), 0).tools().list().await.unwrap_err();
    assert!(matches!(err, Error::Server(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn unknown_status_becomes_generic_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/tools")
        .with_status(418)
        .with_body("short and stout")
        .expect(1)
        .create_async()
        .await;

    let err = client(&server.url(), 3).tools().list().await.unwrap_err();
    assert!(matches!(err, Error::Api(_)), "got {err:?}");
    assert_eq!(err.status(), Some(418));
    // Non-JSON body is preserved as the synthesized message.
    assert_eq!(err.detail().unwrap().message, "short and stout");
    assert_eq!(err.detail().unwrap().code, "HTTP_418");
}

#[tokio::test]
async fn empty_error_body_synthesizes_http_message() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/v2/tools")
        .with_status(502)
        .create_async()
        .await;

    let err = client(&server.url(), 0).tools().list().await.unwrap_err();
    assert_eq!(err.detail().unwrap().message, "HTTP 502");
    assert_eq!(err.detail().unwrap().code, "HTTP_502");
}

#[tokio::test]
async fn connection_failures_surface_as_network_errors() {
    // Nothing listens on this port; connects are refused immediately.
    let err = client("http://127.0.0.1:9", 1).tools().list().await.unwrap_err();
    assert!(matches!(err, Error::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn api_key_header_is_attached_to_every_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .match_header("x-api-key", "ztb_live_test")
        .with_status(200)
        .with_body(r#"{"status": "ok"}"#)
        .expect(1)
        .create_async()
        .await;

    let body = client(&server.url(), 0).health_check().await.unwrap();
    assert_eq!(body["status"], "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn no_content_responses_decode_to_null() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(204)
        .create_async()
        .await;

    let body = client(&server.url(), 0).health_check().await.unwrap();
    assert!(body.is_null());
}
