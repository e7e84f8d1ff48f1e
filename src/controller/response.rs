// JSON response helpers shared by the controllers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::model::ControlError;

/// Error body `{error, message[, supportedOperations]}` with the status
/// code the error maps to.
pub fn control_error(e: &ControlError) -> Response {
    (e.status_code(), Json(Value::Object(e.to_payload()))).into_response()
}

/// Outcome of start/stop/toggle.
pub fn action_result(result: Result<(), ControlError>, done: &str, verb: &str) -> Response {
    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "success",
                "message": format!("Service {} successfully", done),
            })),
        )
            .into_response(),
        Err(e) => {
            let mut body = e.to_payload();
            body.insert("status".to_string(), json!("error"));
            body.insert(
                "message".to_string(),
                json!(format!("Failed to {} service: {}", verb, e)),
            );
            (e.status_code(), Json(Value::Object(body))).into_response()
        }
    }
}

pub fn json_result(result: Result<Value, ControlError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => control_error(&e),
    }
}
