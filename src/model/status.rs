use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Last observed operational state of a downstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Started,
    Stopped,
    Error,
    Unknown,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Started => "STARTED",
            Status::Stopped => "STOPPED",
            Status::Error => "ERROR",
            Status::Unknown => "UNKNOWN",
        }
    }

    pub fn is_started(self) -> bool {
        self == Status::Started
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status together with the moment it was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub status: Status,
    pub last_check: DateTime<Utc>,
}

impl ServiceStatus {
    pub fn new(status: Status, last_check: DateTime<Utc>) -> Self {
        Self { status, last_check }
    }
}
