//! Single-attempt request helper on top of the hyper client.

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty};
use hyper::{Method, Request, Uri};
use std::time::Duration;
use tokio::time::timeout;

use super::HyperClient;

/// Status and fully collected body of a downstream response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a body-less request and collects the response.
///
/// Transport errors and timeouts are returned as errors; any HTTP status,
/// including 4xx/5xx, is a successful exchange and left to the caller.
pub async fn send(
    client: &HyperClient,
    method: Method,
    url: &str,
    headers: &[(&str, &str)],
    timeout_duration: Duration,
) -> Result<RawResponse> {
    let uri: Uri = url
        .parse()
        .with_context(|| format!("invalid URL: {}", url))?;

    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let empty: BoxBody<Bytes, hyper::Error> = Empty::<Bytes>::new()
        .map_err(|never: std::convert::Infallible| match never {})
        .boxed();
    let req = builder.body(empty).context("failed to build request")?;

    let response = match timeout(timeout_duration, client.request(req)).await {
        Ok(Ok(resp)) => resp,
        Ok(Err(e)) => {
            return Err(anyhow::anyhow!("request to {} failed: {}", url, e));
        }
        Err(_) => {
            return Err(anyhow::anyhow!(
                "request to {} timed out after {:?}",
                url,
                timeout_duration
            ));
        }
    };

    let status = response.status().as_u16();
    let body = timeout(timeout_duration, response.into_body().collect())
        .await
        .map_err(|_| anyhow::anyhow!("reading body from {} timed out", url))?
        .context("failed to read response body")?
        .to_bytes();

    Ok(RawResponse { status, body })
}
