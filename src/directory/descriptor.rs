use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Everything a downstream service may expose on its sub-API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Start,
    Stop,
    Toggle,
    State,
    Files,
    FilesProcessed,
    Reprocess,
    Reset,
    Clear,
}

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Start,
        Operation::Stop,
        Operation::Toggle,
        Operation::State,
        Operation::Files,
        Operation::FilesProcessed,
        Operation::Reprocess,
        Operation::Reset,
        Operation::Clear,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Start => "start",
            Operation::Stop => "stop",
            Operation::Toggle => "toggle",
            Operation::State => "state",
            Operation::Files => "files",
            Operation::FilesProcessed => "filesProcessed",
            Operation::Reprocess => "reprocess",
            Operation::Reset => "reset",
            Operation::Clear => "clear",
        }
    }

    /// Path on the downstream sub-API, relative to the resolved base address.
    /// Toggle is composed from start/stop and has no endpoint of its own.
    pub fn default_path(self) -> Option<&'static str> {
        match self {
            Operation::Start => Some("/api/processing/start"),
            Operation::Stop => Some("/api/processing/stop"),
            Operation::Toggle => None,
            Operation::State => Some("/api/processing/state"),
            Operation::Files => Some("/api/files"),
            Operation::FilesProcessed => Some("/api/files/processed"),
            Operation::Reprocess => Some("/api/reprocess-all"),
            Operation::Reset => Some("/api/processing/reset"),
            Operation::Clear => Some("/api/clear"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operation: {0}")]
pub struct UnknownOperation(pub String);

impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "files_processed" | "files-processed" => Ok(Operation::FilesProcessed),
            _ => Operation::ALL
                .iter()
                .copied()
                .find(|op| op.as_str() == s)
                .ok_or_else(|| UnknownOperation(s.to_string())),
        }
    }
}

/// Static metadata of one logical service: who it is, which operations it
/// supports and where they live when the path differs from the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    name: String,
    display_name: String,
    description: String,
    operations: Vec<Operation>,
    endpoints: HashMap<Operation, String>,
}

impl ServiceDescriptor {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        operations: &[Operation],
    ) -> Self {
        let mut ops: Vec<Operation> = Vec::with_capacity(operations.len());
        for op in operations {
            if !ops.contains(op) {
                ops.push(*op);
            }
        }
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            operations: ops,
            endpoints: HashMap::new(),
        }
    }

    /// Overrides the sub-API path of one operation.
    pub fn with_endpoint(mut self, op: Operation, path: impl Into<String>) -> Self {
        self.endpoints.insert(op, path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Supported operations in declaration order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Operations offered to API clients. State is read by the poller and
    /// proxied as an inspection call, it is not advertised.
    pub fn advertised_operations(&self) -> Vec<Operation> {
        self.operations
            .iter()
            .copied()
            .filter(|op| *op != Operation::State)
            .collect()
    }

    pub fn supports(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    /// Resolved sub-API path for `op`, or None when the operation has no
    /// endpoint at all.
    pub fn path(&self, op: Operation) -> Option<&str> {
        self.endpoints
            .get(&op)
            .map(String::as_str)
            .or_else(|| op.default_path())
    }
}
