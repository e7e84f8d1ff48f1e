//! Remote control client: typed calls against a downstream sub-API.

mod client;

#[cfg(test)]
mod client_test;

use serde_json::{Map, Value};

use crate::model::ControlError;

pub use client::HttpRemoteControl;

/// JSON object returned by a downstream state query.
pub type StateMap = Map<String, Value>;

/// RemoteControl performs single-attempt calls against a resolved base
/// address. `path` comes from the service descriptor, so per-service path
/// differences never leak into this layer.
///
/// Every method is best-effort: transport failures and non-2xx statuses
/// become `RemoteUnavailable`, undecodable bodies `RemoteMalformedResponse`.
#[async_trait::async_trait]
pub trait RemoteControl: Send + Sync {
    /// POST start; succeeds iff the downstream answers 2xx.
    async fn start(&self, addr: &str, path: &str) -> Result<(), ControlError>;

    /// POST stop; succeeds iff the downstream answers 2xx.
    async fn stop(&self, addr: &str, path: &str) -> Result<(), ControlError>;

    /// GET state; the body must be a JSON object.
    async fn query_state(&self, addr: &str, path: &str) -> Result<StateMap, ControlError>;

    /// GET file listing, returned verbatim.
    async fn list_files(&self, addr: &str, path: &str) -> Result<Value, ControlError>;

    /// GET processed file listing, returned verbatim.
    async fn list_processed_files(&self, addr: &str, path: &str) -> Result<Value, ControlError>;

    /// POST reprocess-all. `Value::Null` stands for an empty body.
    async fn reprocess(&self, addr: &str, path: &str) -> Result<Value, ControlError>;

    /// POST processing reset. `Value::Null` stands for an empty body.
    async fn reset_processing(&self, addr: &str, path: &str) -> Result<Value, ControlError>;

    /// POST clear. `Value::Null` stands for an empty body.
    async fn clear(&self, addr: &str, path: &str) -> Result<Value, ControlError>;
}

/// Interprets a state document: `enabled` or `processing` set to `true`
/// means the service is running.
pub fn is_running(state: &StateMap) -> bool {
    ["enabled", "processing"]
        .iter()
        .any(|key| state.get(*key).and_then(Value::as_bool) == Some(true))
}
