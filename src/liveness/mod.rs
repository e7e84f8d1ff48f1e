// Liveness probe backing GET /api/health.

mod error;
mod prober;
mod service;


pub use error::TimeoutIsTooShortError;
pub use prober::{Probe, Prober};
pub use service::Service;
