//! Prometheus metrics.
//!
//! Everything goes through the `metrics` facade; without an installed
//! recorder (unit tests) the calls are no-ops.

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const POLL_CYCLES: &str = "imcmanager_poll_cycles_total";
pub const REMOTE_CALLS: &str = "imcmanager_remote_calls_total";
pub const CONTROL_ACTIONS: &str = "imcmanager_control_actions_total";
pub const SERVICE_UP: &str = "imcmanager_service_up";
pub const PANICS: &str = "imcmanager_panics_total";

const OK: &str = "ok";
const FAILED: &str = "failed";

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder and keeps its handle for
/// rendering. Call once from `main`, before the runtime starts.
pub fn init_prometheus_exporter() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("Prometheus handle already initialized"))?;

    Ok(())
}

/// Text exposition of every recorded metric, `None` when no recorder was
/// installed.
pub fn render() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        OK
    } else {
        FAILED
    }
}

pub fn inc_poll_cycles() {
    metrics::counter!(POLL_CYCLES).increment(1);
}

pub fn record_remote_call(operation: &'static str, ok: bool) {
    metrics::counter!(REMOTE_CALLS, "operation" => operation, "outcome" => outcome(ok)).increment(1);
}

pub fn record_control_action(action: &'static str, ok: bool) {
    metrics::counter!(CONTROL_ACTIONS, "action" => action, "outcome" => outcome(ok)).increment(1);
}

/// 1 while the service is STARTED, 0 otherwise.
pub fn set_service_up(service: &str, up: bool) {
    metrics::gauge!(SERVICE_UP, "service" => service.to_string()).set(if up { 1.0 } else { 0.0 });
}

pub fn inc_panics() {
    metrics::counter!(PANICS).increment(1);
}
