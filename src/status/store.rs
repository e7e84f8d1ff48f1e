use chrono::Utc;
use dashmap::DashMap;
use tracing::{info, warn};

use crate::metrics;
use crate::model::{ServiceStatus, Status};

/// Concurrent map from service name to [`ServiceStatus`].
///
/// Writes are last-write-wins; the map itself is never handed out.
#[derive(Debug, Default)]
pub struct StatusStore {
    entries: DashMap<String, ServiceStatus>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` means the service has never been observed.
    pub fn get(&self, name: &str) -> Option<ServiceStatus> {
        self.entries.get(name).map(|entry| *entry.value())
    }

    /// Records `status` stamped with the current time and returns the status
    /// it replaced.
    pub fn set(&self, name: &str, status: Status) -> Option<Status> {
        self.entries
            .insert(name.to_string(), ServiceStatus::new(status, Utc::now()))
            .map(|prev| prev.status)
    }

    /// Like [`StatusStore::set`], but logs the change once when the status
    /// actually moves and keeps the `service_up` gauge in step.
    pub fn transition(&self, name: &str, status: Status, source: &'static str) {
        let prev = self.set(name, status);
        metrics::set_service_up(name, status.is_started());

        if prev == Some(status) {
            return;
        }
        let from = prev.map(Status::as_str).unwrap_or("NONE");
        match status {
            Status::Error | Status::Unknown => warn!(
                component = "status",
                event = "transition",
                service = name,
                from,
                to = status.as_str(),
                source,
                "service status changed"
            ),
            _ => info!(
                component = "status",
                event = "transition",
                service = name,
                from,
                to = status.as_str(),
                source,
                "service status changed"
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
