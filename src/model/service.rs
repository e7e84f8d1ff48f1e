use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ServiceStatus, Status};
use crate::directory::{Operation, ServiceDescriptor};

/// Per-request view of one service: directory metadata, the address it
/// currently resolves to, and whatever the status store last recorded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub url: String,
    pub status: Status,
    pub last_check: Option<DateTime<Utc>>,
    pub supported_operations: Vec<Operation>,
}

impl ServiceInfo {
    pub fn new(descriptor: &ServiceDescriptor, url: String, status: Option<ServiceStatus>) -> Self {
        Self {
            name: descriptor.name().to_string(),
            display_name: descriptor.display_name().to_string(),
            description: descriptor.description().to_string(),
            url,
            status: status.map(|s| s.status).unwrap_or(Status::Unknown),
            last_check: status.map(|s| s.last_check),
            supported_operations: descriptor.advertised_operations(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Critical,
}

impl OverallStatus {
    /// All active is healthy, more than half is degraded, anything else
    /// (including an empty pipeline) is critical.
    pub fn classify(active: usize, total: usize) -> Self {
        if total == 0 {
            OverallStatus::Critical
        } else if active == total {
            OverallStatus::Healthy
        } else if active * 2 > total {
            OverallStatus::Degraded
        } else {
            OverallStatus::Critical
        }
    }
}

/// Aggregate over the services `list_services` returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOverview {
    pub total_services: usize,
    pub active_services: usize,
    pub overall_status: OverallStatus,
    pub services: Vec<ServiceInfo>,
}

impl PipelineOverview {
    pub fn from_services(services: Vec<ServiceInfo>) -> Self {
        let total_services = services.len();
        let active_services = services.iter().filter(|s| s.status.is_started()).count();
        Self {
            total_services,
            active_services,
            overall_status: OverallStatus::classify(active_services, total_services),
            services,
        }
    }
}

/// Outcome of a best-effort pipeline restart: one line per step, split by
/// success and failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestartReport {
    pub results: Vec<String>,
    pub errors: Vec<String>,
}

impl RestartReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
