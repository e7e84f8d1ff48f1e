use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use super::{RestartAction, RestartPlan};
use crate::directory::{Directory, Operation, ServiceDescriptor};
use crate::discovery::{resolve_first, Resolver};
use crate::metrics;
use crate::model::{ControlError, PipelineOverview, RestartReport, ServiceInfo, ServiceStatus, Status};
use crate::remote::{RemoteControl, StateMap};
use crate::status::StatusStore;

const COMPONENT: &str = "facade";
const SOURCE: &str = "control";

/// A service that passed lookup, capability check and resolution.
struct Located<'a> {
    addr: String,
    path: &'a str,
}

pub struct ControlFacade {
    directory: Arc<Directory>,
    resolver: Arc<dyn Resolver>,
    remote: Arc<dyn RemoteControl>,
    store: Arc<StatusStore>,
    plan: RestartPlan,
}

impl ControlFacade {
    pub fn new(
        directory: Arc<Directory>,
        resolver: Arc<dyn Resolver>,
        remote: Arc<dyn RemoteControl>,
        store: Arc<StatusStore>,
        plan: RestartPlan,
    ) -> Self {
        Self {
            directory,
            resolver,
            remote,
            store,
            plan,
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Directory services that currently resolve, in directory order.
    /// Unresolved services are left out.
    pub async fn list_services(&self) -> Vec<ServiceInfo> {
        let mut out = Vec::with_capacity(self.directory.len());
        for descriptor in self.directory.iter() {
            if let Some(addr) = resolve_first(self.resolver.as_ref(), descriptor.name()).await {
                out.push(ServiceInfo::new(descriptor, addr, self.store.get(descriptor.name())));
            }
        }
        out
    }

    /// Counts and classification are taken over the same list
    /// [`ControlFacade::list_services`] returns.
    pub async fn overview(&self) -> PipelineOverview {
        PipelineOverview::from_services(self.list_services().await)
    }

    /// Last recorded status. Unknown names and never-observed services are
    /// both `ServiceNotFound`.
    pub fn get_status(&self, name: &str) -> Result<ServiceStatus, ControlError> {
        if !self.directory.contains(name) {
            return Err(ControlError::ServiceNotFound(name.to_string()));
        }
        self.store
            .get(name)
            .ok_or_else(|| ControlError::ServiceNotFound(name.to_string()))
    }

    pub async fn try_get_state(&self, name: &str) -> Result<StateMap, ControlError> {
        let located = self.locate(name, Operation::State).await?;
        self.remote.query_state(&located.addr, located.path).await
    }

    /// Downstream state document, or an error-shaped map when the service
    /// is absent or the call fails.
    pub async fn get_state(&self, name: &str) -> StateMap {
        self.try_get_state(name)
            .await
            .unwrap_or_else(|e| e.to_payload())
    }

    /// On success the store reads STARTED right away, without waiting for
    /// the poller.
    pub async fn try_start(&self, name: &str) -> Result<(), ControlError> {
        let result = self.start_unreported(name).await;
        self.report("start", name, &result);
        result
    }

    pub async fn try_stop(&self, name: &str) -> Result<(), ControlError> {
        let result = self.stop_unreported(name).await;
        self.report("stop", name, &result);
        result
    }

    /// Stops a STARTED service, starts anything else. The read and the call
    /// are not atomic; a concurrent poll may briefly show a stale status.
    pub async fn try_toggle(&self, name: &str) -> Result<(), ControlError> {
        let result = async {
            self.require(name, Operation::Toggle)?;
            let started = self
                .store
                .get(name)
                .map(|s| s.status.is_started())
                .unwrap_or(false);
            if started {
                self.stop_unreported(name).await
            } else {
                self.start_unreported(name).await
            }
        }
        .await;
        self.report("toggle", name, &result);
        result
    }

    pub async fn start(&self, name: &str) -> bool {
        self.try_start(name).await.is_ok()
    }

    pub async fn stop(&self, name: &str) -> bool {
        self.try_stop(name).await.is_ok()
    }

    pub async fn toggle(&self, name: &str) -> bool {
        self.try_toggle(name).await.is_ok()
    }

    async fn start_unreported(&self, name: &str) -> Result<(), ControlError> {
        let located = self.locate(name, Operation::Start).await?;
        self.remote.start(&located.addr, located.path).await?;
        self.store.transition(name, Status::Started, SOURCE);
        Ok(())
    }

    async fn stop_unreported(&self, name: &str) -> Result<(), ControlError> {
        let located = self.locate(name, Operation::Stop).await?;
        self.remote.stop(&located.addr, located.path).await?;
        self.store.transition(name, Status::Stopped, SOURCE);
        Ok(())
    }

    /// File listing; services without one answer an empty listing.
    pub async fn list_files(&self, name: &str) -> Result<Value, ControlError> {
        if let Some(empty) = self.empty_listing(name, Operation::Files) {
            return Ok(empty);
        }
        let located = self.locate(name, Operation::Files).await?;
        let body = self.remote.list_files(&located.addr, located.path).await?;
        non_empty(body, "file listing")
    }

    /// Processed-file listing at the service's own path; services without
    /// one answer an empty listing.
    pub async fn list_processed_files(&self, name: &str) -> Result<Value, ControlError> {
        if let Some(empty) = self.empty_listing(name, Operation::FilesProcessed) {
            return Ok(empty);
        }
        let located = self.locate(name, Operation::FilesProcessed).await?;
        let body = self
            .remote
            .list_processed_files(&located.addr, located.path)
            .await?;
        non_empty(body, "processed file listing")
    }

    pub async fn reprocess(&self, name: &str) -> Result<Value, ControlError> {
        let result = async {
            let located = self.locate(name, Operation::Reprocess).await?;
            let body = self.remote.reprocess(&located.addr, located.path).await?;
            non_empty(body, "reprocess")
        }
        .await;
        self.report("reprocess", name, &result);
        result
    }

    /// Fails with `OperationNotSupported` before any network call when the
    /// service has no processing reset.
    pub async fn reset_processing(&self, name: &str) -> Result<Value, ControlError> {
        let result = async {
            let located = self.locate(name, Operation::Reset).await?;
            let body = self
                .remote
                .reset_processing(&located.addr, located.path)
                .await?;
            non_empty(body, "processing reset")
        }
        .await;
        self.report("reset", name, &result);
        result
    }

    async fn clear(&self, name: &str) -> Result<(), ControlError> {
        let located = self.locate(name, Operation::Clear).await?;
        self.remote.clear(&located.addr, located.path).await.map(|_| ())
    }

    /// Runs every step of the restart plan in order. A failing step is
    /// reported and the sequence carries on.
    pub async fn restart_pipeline(&self) -> RestartReport {
        let mut report = RestartReport::default();

        for step in self.plan.steps() {
            let service = step.service.as_str();
            let outcome = match step.action {
                RestartAction::Stop => self
                    .stop_unreported(service)
                    .await
                    .map(|_| format!("Stopped {}", service)),
                RestartAction::Clear => self
                    .clear(service)
                    .await
                    .map(|_| format!("Cleared {} files", service)),
                RestartAction::Reset => self
                    .remote_reset(service)
                    .await
                    .map(|_| format!("Reset {} processing", service)),
            };
            metrics::record_control_action("restart_step", outcome.is_ok());

            match outcome {
                Ok(line) => report.results.push(line),
                Err(e) => report
                    .errors
                    .push(format!("Failed to {} {}: {}", step.action, service, e)),
            }
        }

        info!(
            component = COMPONENT,
            event = "pipeline_restarted",
            steps = self.plan.steps().len(),
            succeeded = report.results.len(),
            failed = report.errors.len(),
            "pipeline restart completed"
        );
        report
    }

    /// Processing reset without the non-empty body requirement.
    async fn remote_reset(&self, name: &str) -> Result<(), ControlError> {
        let located = self.locate(name, Operation::Reset).await?;
        self.remote
            .reset_processing(&located.addr, located.path)
            .await
            .map(|_| ())
    }

    /// Directory lookup and capability check, no network.
    fn require(&self, name: &str, op: Operation) -> Result<&ServiceDescriptor, ControlError> {
        let descriptor = self
            .directory
            .get(name)
            .ok_or_else(|| ControlError::ServiceNotFound(name.to_string()))?;
        if !descriptor.supports(op) {
            return Err(ControlError::OperationNotSupported {
                service: name.to_string(),
                operation: op,
                supported: descriptor.advertised_operations(),
            });
        }
        Ok(descriptor)
    }

    async fn locate(&self, name: &str, op: Operation) -> Result<Located<'_>, ControlError> {
        let descriptor = self.require(name, op)?;
        let path = descriptor
            .path(op)
            .ok_or_else(|| ControlError::OperationNotSupported {
                service: name.to_string(),
                operation: op,
                supported: descriptor.advertised_operations(),
            })?;
        let addr = resolve_first(self.resolver.as_ref(), name)
            .await
            .ok_or_else(|| ControlError::ServiceNotFound(name.to_string()))?;
        Ok(Located { addr, path })
    }

    /// Empty listing for a known service lacking the listing capability.
    fn empty_listing(&self, name: &str, op: Operation) -> Option<Value> {
        let descriptor = self.directory.get(name)?;
        if descriptor.supports(op) {
            return None;
        }
        Some(json!({
            "files": [],
            "processedCount": 0,
            "message": format!("{} service does not expose the {} endpoint", descriptor.name(), op),
        }))
    }

    fn report<T>(&self, action: &'static str, name: &str, result: &Result<T, ControlError>) {
        metrics::record_control_action(action, result.is_ok());
        if let Err(e) = result {
            warn!(
                component = COMPONENT,
                event = "control_failed",
                action,
                service = name,
                error = %e,
                "control action failed"
            );
        }
    }
}

fn non_empty(body: Value, what: &str) -> Result<Value, ControlError> {
    if body.is_null() {
        return Err(ControlError::RemoteMalformedResponse(format!(
            "empty {} response",
            what
        )));
    }
    Ok(body)
}
