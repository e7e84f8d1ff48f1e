// Domain types: statuses, derived service views and the control error taxonomy.

pub mod error;
pub mod service;
pub mod status;


pub use error::ControlError;
pub use service::{OverallStatus, PipelineOverview, RestartReport, ServiceInfo};
pub use status::{ServiceStatus, Status};
