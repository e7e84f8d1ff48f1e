/// Rejected probe timeout; the probe falls back to a usable value.
#[derive(Debug, Clone, thiserror::Error)]
#[error("liveness probe timeout is too short")]
pub struct TimeoutIsTooShortError;
