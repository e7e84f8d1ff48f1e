// Common test utilities for integration tests.

use serde_json::Value;
use std::time::Duration;

/// Makes an HTTP request with an empty body.
pub async fn do_request(method: &str, url: &str) -> Result<reqwest::Response, reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let request = match method {
        "GET" => client.get(url),
        "POST" => client.post(url),
        _ => panic!("unsupported method: {}", method),
    };

    request.send().await
}

/// Makes an HTTP request and parses the JSON response body.
pub async fn do_json(method: &str, url: &str) -> (u16, Value) {
    let resp = assert_ok(do_request(method, url).await);
    let status = resp.status().as_u16();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = assert_ok(resp.bytes().await);

    assert!(
        content_type.contains("json"),
        "{} {} answered {} with content-type {:?}",
        method,
        url,
        status,
        content_type
    );
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("{} {}: invalid json body: {}", method, url, e));
    (status, json)
}

/// Unwraps a result, panicking with the error's display form.
pub fn assert_ok<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| panic!("unexpected error: {}", e))
}

/// Polls `check` until it holds or `within` elapses.
pub async fn eventually<F: Fn() -> bool>(within: Duration, check: F) -> bool {
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
