use hyper::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{RemoteControl, StateMap};
use crate::http::client::{self, HyperClient, RawResponse};
use crate::metrics;
use crate::model::ControlError;

/// Remote control client over the shared hyper client.
pub struct HttpRemoteControl {
    client: HyperClient,
    timeout: Duration,
}

impl HttpRemoteControl {
    pub fn new(client: HyperClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// One request, no retry. Non-2xx is folded into `RemoteUnavailable`.
    async fn call(
        &self,
        operation: &'static str,
        method: Method,
        addr: &str,
        path: &str,
    ) -> Result<RawResponse, ControlError> {
        let url = format!("{}{}", addr, path);
        let result = client::send(
            &self.client,
            method.clone(),
            &url,
            &[("accept", "application/json")],
            self.timeout,
        )
        .await;

        let outcome = match result {
            Ok(resp) if resp.is_success() => Ok(resp),
            Ok(resp) => Err(ControlError::RemoteUnavailable(format!(
                "{} {} answered {}",
                method, url, resp.status
            ))),
            Err(e) => Err(ControlError::RemoteUnavailable(format!("{:#}", e))),
        };

        metrics::record_remote_call(operation, outcome.is_ok());
        if let Err(ref e) = outcome {
            debug!(component = "remote", operation, url = %url, error = %e, "remote call failed");
        }
        outcome
    }

    /// Call expecting a JSON body; an empty body is reported as `Null`.
    async fn call_json(
        &self,
        operation: &'static str,
        method: Method,
        addr: &str,
        path: &str,
    ) -> Result<Value, ControlError> {
        let resp = self.call(operation, method, addr, path).await?;
        decode_body(&resp)
    }
}

fn decode_body(resp: &RawResponse) -> Result<Value, ControlError> {
    if resp.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&resp.body)
        .map_err(|e| ControlError::RemoteMalformedResponse(format!("invalid json: {}", e)))
}

#[async_trait::async_trait]
impl RemoteControl for HttpRemoteControl {
    async fn start(&self, addr: &str, path: &str) -> Result<(), ControlError> {
        self.call("start", Method::POST, addr, path).await.map(|_| ())
    }

    async fn stop(&self, addr: &str, path: &str) -> Result<(), ControlError> {
        self.call("stop", Method::POST, addr, path).await.map(|_| ())
    }

    async fn query_state(&self, addr: &str, path: &str) -> Result<StateMap, ControlError> {
        match self.call_json("state", Method::GET, addr, path).await? {
            Value::Object(map) => Ok(map),
            Value::Null => Err(ControlError::RemoteMalformedResponse(
                "empty state document".to_string(),
            )),
            other => Err(ControlError::RemoteMalformedResponse(format!(
                "state document is not an object: {}",
                kind(&other)
            ))),
        }
    }

    async fn list_files(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.call_json("files", Method::GET, addr, path).await
    }

    async fn list_processed_files(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.call_json("filesProcessed", Method::GET, addr, path).await
    }

    async fn reprocess(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.call_json("reprocess", Method::POST, addr, path).await
    }

    async fn reset_processing(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.call_json("reset", Method::POST, addr, path).await
    }

    async fn clear(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.call_json("clear", Method::POST, addr, path).await
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
