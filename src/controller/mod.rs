// HTTP API controllers.

pub mod controller;
pub mod health;
pub mod metrics;
pub mod pipeline;
pub mod response;
pub mod services;

pub use health::HealthController;
pub use metrics::PrometheusMetricsController;
pub use pipeline::PipelineController;
pub use services::ServicesController;
