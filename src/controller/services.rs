//! Per-service REST endpoints under /api/services.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

use super::response::{action_result, control_error, json_result};
use crate::facade::ControlFacade;
use crate::http::Controller;

pub struct ServicesController {
    facade: Arc<ControlFacade>,
}

impl ServicesController {
    pub fn new(facade: Arc<ControlFacade>) -> Self {
        Self { facade }
    }

    async fn list(State(facade): State<Arc<ControlFacade>>) -> Response {
        Json(facade.list_services().await).into_response()
    }

    async fn status(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        match facade.get_status(&name) {
            Ok(status) => Json(status).into_response(),
            Err(e) => control_error(&e),
        }
    }

    async fn state(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        json_result(facade.try_get_state(&name).await.map(Value::Object))
    }

    async fn start(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        action_result(facade.try_start(&name).await, "started", "start")
    }

    async fn stop(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        action_result(facade.try_stop(&name).await, "stopped", "stop")
    }

    async fn toggle(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        action_result(facade.try_toggle(&name).await, "toggled", "toggle")
    }

    async fn files(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        json_result(facade.list_files(&name).await)
    }

    async fn processed_files(
        State(facade): State<Arc<ControlFacade>>,
        Path(name): Path<String>,
    ) -> Response {
        json_result(facade.list_processed_files(&name).await)
    }

    async fn reprocess(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        json_result(facade.reprocess(&name).await)
    }

    async fn reset(State(facade): State<Arc<ControlFacade>>, Path(name): Path<String>) -> Response {
        json_result(facade.reset_processing(&name).await)
    }
}

impl Controller for ServicesController {
    fn add_route(&self, router: Router) -> Router {
        let routes = Router::new()
            .route("/api/services", get(Self::list))
            .route("/api/services/:name/status", get(Self::status))
            .route("/api/services/:name/state", get(Self::state))
            .route("/api/services/:name/start", post(Self::start))
            .route("/api/services/:name/stop", post(Self::stop))
            .route("/api/services/:name/toggle", post(Self::toggle))
            .route("/api/services/:name/files", get(Self::files))
            .route("/api/services/:name/files/processed", get(Self::processed_files))
            .route("/api/services/:name/reprocess", post(Self::reprocess))
            .route("/api/services/:name/processing/reset", post(Self::reset))
            .with_state(self.facade.clone());
        router.merge(routes)
    }
}
