use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::dedlog;
use crate::directory::{Directory, Operation, ServiceDescriptor};
use crate::discovery::{resolve_first, Resolver};
use crate::liveness;
use crate::metrics;
use crate::model::Status;
use crate::remote::{is_running, RemoteControl};
use crate::status::StatusStore;

const COMPONENT: &str = "poller";

/// A poller that has not finished a cycle for this many intervals is
/// reported as not alive.
const STALE_AFTER_INTERVALS: u32 = 3;

pub struct HealthPoller {
    directory: Arc<Directory>,
    resolver: Arc<dyn Resolver>,
    remote: Arc<dyn RemoteControl>,
    store: Arc<StatusStore>,
    interval: Duration,
    started_at: Instant,
    last_cycle: Mutex<Option<Instant>>,
}

impl HealthPoller {
    pub fn new(
        directory: Arc<Directory>,
        resolver: Arc<dyn Resolver>,
        remote: Arc<dyn RemoteControl>,
        store: Arc<StatusStore>,
        interval: Duration,
    ) -> Self {
        Self {
            directory,
            resolver,
            remote,
            store,
            interval,
            started_at: Instant::now(),
            last_cycle: Mutex::new(None),
        }
    }

    /// Polls immediately, then once per interval until `ctx` is cancelled.
    /// A cycle already in flight is allowed to finish.
    pub async fn run(self: Arc<Self>, ctx: CancellationToken) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            component = COMPONENT,
            event = "started",
            interval = ?self.interval,
            services = self.directory.len(),
            "health poller started"
        );

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    info!(component = COMPONENT, event = "stopped", "health poller stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.poll_cycle().await;
                }
            }
        }
    }

    /// One pass over every directory service, one after another. A failing
    /// service is marked ERROR and never blocks the others.
    pub async fn poll_cycle(&self) {
        for descriptor in self.directory.iter() {
            let status = self.poll_one(descriptor).await;
            self.store.transition(descriptor.name(), status, COMPONENT);
        }

        *self.last_cycle.lock() = Some(Instant::now());
        metrics::inc_poll_cycles();
        debug!(component = COMPONENT, event = "cycle_done", "poll cycle finished");
    }

    async fn poll_one(&self, descriptor: &ServiceDescriptor) -> Status {
        let name = descriptor.name();
        if !descriptor.supports(Operation::State) {
            return Status::Unknown;
        }

        let Some(addr) = resolve_first(self.resolver.as_ref(), name).await else {
            return Status::Unknown;
        };
        let Some(path) = descriptor.path(Operation::State) else {
            return Status::Unknown;
        };

        match self.remote.query_state(&addr, path).await {
            Ok(state) if is_running(&state) => Status::Started,
            Ok(_) => Status::Stopped,
            Err(e) => {
                dedlog::err(Some(&e), Some(name), "health poll failed");
                Status::Error
            }
        }
    }

    /// Time of the last completed cycle, if any.
    pub fn last_cycle(&self) -> Option<Instant> {
        *self.last_cycle.lock()
    }
}

impl liveness::Service for HealthPoller {
    fn is_alive(&self, _timeout: Duration) -> bool {
        let since = self.last_cycle().unwrap_or(self.started_at);
        since.elapsed() <= self.interval * STALE_AFTER_INTERVALS
    }
}
