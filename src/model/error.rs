//! Error taxonomy shared by the control path.

use axum::http::StatusCode;
use serde_json::{json, Map, Value};

use crate::directory::Operation;

/// Failures of a control or inspection call against a downstream service.
///
/// None of these ever escape to a client unstructured: the facade and the
/// controllers render them through [`ControlError::to_payload`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("Service not found: {0}")]
    ServiceNotFound(String),
    #[error("{service} does not support the {operation} operation")]
    OperationNotSupported {
        service: String,
        operation: Operation,
        supported: Vec<Operation>,
    },
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("malformed response from remote service: {0}")]
    RemoteMalformedResponse(String),
}

impl ControlError {
    /// HTTP status used at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ControlError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            ControlError::OperationNotSupported { .. } => StatusCode::BAD_REQUEST,
            ControlError::RemoteUnavailable(_) | ControlError::RemoteMalformedResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }

    /// Short machine-friendly title put under the `error` key.
    pub fn title(&self) -> String {
        match self {
            ControlError::ServiceNotFound(name) => format!("Service not found: {}", name),
            ControlError::OperationNotSupported { operation, .. } => {
                format!("{} not supported", capitalize(operation.as_str()))
            }
            ControlError::RemoteUnavailable(_) => "Remote service unavailable".to_string(),
            ControlError::RemoteMalformedResponse(_) => "Malformed remote response".to_string(),
        }
    }

    /// Renders the error as a JSON object: `error`, `message` and, for
    /// capability misses, the list of operations the service does support.
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("error".to_string(), Value::String(self.title()));
        payload.insert("message".to_string(), Value::String(self.to_string()));
        if let ControlError::OperationNotSupported { supported, .. } = self {
            let ops: Vec<&str> = supported.iter().map(|op| op.as_str()).collect();
            payload.insert("supportedOperations".to_string(), json!(ops));
        }
        payload
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
