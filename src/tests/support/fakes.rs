// In-memory stand-ins for the network-facing seams.

use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::discovery::StaticResolver;
use crate::model::ControlError;
use crate::remote::{RemoteControl, StateMap};

/// Static resolver seeded with `(name, addr)` pairs.
pub fn resolver_with(entries: &[(&str, &str)]) -> Arc<StaticResolver> {
    let resolver = StaticResolver::default();
    for (name, addr) in entries {
        resolver.set(name, vec![addr.to_string()]);
    }
    Arc::new(resolver)
}

/// Recording RemoteControl keyed by base address.
///
/// Every call is logged as `op addr+path`. State queries answer
/// `{"enabled": false}` unless told otherwise; addresses marked failing
/// answer every call with `RemoteUnavailable`.
#[derive(Default)]
pub struct FakeRemote {
    calls: Mutex<Vec<String>>,
    states: Mutex<HashMap<String, StateMap>>,
    failing: Mutex<HashSet<String>>,
    empty_bodies: Mutex<HashSet<String>>,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_state(&self, addr: &str, state: Value) {
        let map = state.as_object().cloned().unwrap_or_default();
        self.states.lock().unwrap().insert(addr.to_string(), map);
    }

    pub fn fail(&self, addr: &str) {
        self.failing.lock().unwrap().insert(addr.to_string());
    }

    pub fn recover(&self, addr: &str) {
        self.failing.lock().unwrap().remove(addr);
    }

    /// Proxied actions against `addr` answer with an empty body.
    pub fn empty_bodies(&self, addr: &str) {
        self.empty_bodies.lock().unwrap().insert(addr.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose operation is `op`.
    pub fn calls_of(&self, op: &str) -> Vec<String> {
        let prefix = format!("{} ", op);
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(&prefix))
            .collect()
    }

    fn record(&self, op: &str, addr: &str, path: &str) -> Result<(), ControlError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}{}", op, addr, path));
        if self.failing.lock().unwrap().contains(addr) {
            return Err(ControlError::RemoteUnavailable(format!(
                "{}{} answered 500",
                addr, path
            )));
        }
        Ok(())
    }

    fn body(&self, addr: &str, value: Value) -> Value {
        if self.empty_bodies.lock().unwrap().contains(addr) {
            Value::Null
        } else {
            value
        }
    }
}

#[async_trait::async_trait]
impl RemoteControl for FakeRemote {
    async fn start(&self, addr: &str, path: &str) -> Result<(), ControlError> {
        self.record("start", addr, path)?;
        self.set_state(addr, json!({"enabled": true}));
        Ok(())
    }

    async fn stop(&self, addr: &str, path: &str) -> Result<(), ControlError> {
        self.record("stop", addr, path)?;
        self.set_state(addr, json!({"enabled": false}));
        Ok(())
    }

    async fn query_state(&self, addr: &str, path: &str) -> Result<StateMap, ControlError> {
        self.record("state", addr, path)?;
        let states = self.states.lock().unwrap();
        Ok(states.get(addr).cloned().unwrap_or_else(|| {
            let mut map = StateMap::new();
            map.insert("enabled".to_string(), json!(false));
            map
        }))
    }

    async fn list_files(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.record("files", addr, path)?;
        Ok(json!({"files": ["report.pdf"], "count": 1}))
    }

    async fn list_processed_files(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.record("filesProcessed", addr, path)?;
        Ok(json!({"files": ["report.pdf"], "processedCount": 1}))
    }

    async fn reprocess(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.record("reprocess", addr, path)?;
        Ok(self.body(addr, json!({"status": "ok"})))
    }

    async fn reset_processing(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.record("reset", addr, path)?;
        Ok(self.body(addr, json!({"status": "reset"})))
    }

    async fn clear(&self, addr: &str, path: &str) -> Result<Value, ControlError> {
        self.record("clear", addr, path)?;
        Ok(self.body(addr, json!({"status": "cleared", "deleted": 4})))
    }
}
