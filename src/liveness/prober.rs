use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

use super::{Service, TimeoutIsTooShortError};

const MIN_TIMEOUT: Duration = Duration::from_millis(1);
const FALLBACK_TIMEOUT: Duration = Duration::from_millis(10);

/// Prober aggregates the liveness of a set of watched services.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Replaces the watched set.
    fn watch(&self, services: Vec<Arc<dyn Service>>);

    /// True iff every watched service answers alive within the timeout.
    /// Nothing watched yet means not alive.
    async fn is_alive(&self) -> bool;
}

pub struct Probe {
    services: Arc<RwLock<Vec<Arc<dyn Service>>>>,
    timeout: Duration,
}

impl Probe {
    pub fn new(timeout_duration: Duration) -> Self {
        let timeout = if timeout_duration < MIN_TIMEOUT {
            warn!(
                component = "liveness",
                error = %TimeoutIsTooShortError,
                "min timeout duration is 1ms (timeout set up as 10ms as a more reasonable value)"
            );
            FALLBACK_TIMEOUT
        } else {
            timeout_duration
        };

        Self {
            services: Arc::new(RwLock::new(Vec::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait::async_trait]
impl Prober for Probe {
    fn watch(&self, services: Vec<Arc<dyn Service>>) {
        *self.services.write() = services;
    }

    async fn is_alive(&self) -> bool {
        let services = self.services.read().clone();
        if services.is_empty() {
            return false;
        }

        let probe_timeout = self.timeout;
        let check = tokio::task::spawn_blocking(move || {
            services.iter().all(|s| s.is_alive(probe_timeout))
        });

        match timeout(probe_timeout, check).await {
            Ok(Ok(alive)) => alive,
            Ok(Err(e)) => {
                warn!(component = "liveness", error = %e, "liveness check task failed");
                false
            }
            Err(_) => {
                warn!(
                    component = "liveness",
                    event = "deadline_exceeded",
                    "liveness probe deadline exceeded while checking service"
                );
                false
            }
        }
    }
}
