use std::time::Duration;

/// Something the liveness probe can ask "are you alive?".
pub trait Service: Send + Sync {
    fn is_alive(&self, timeout: Duration) -> bool;
}
