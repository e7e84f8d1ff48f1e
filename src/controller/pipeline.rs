//! Pipeline-wide endpoints: overview and best-effort restart.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::facade::ControlFacade;
use crate::http::Controller;

pub struct PipelineController {
    facade: Arc<ControlFacade>,
}

impl PipelineController {
    pub fn new(facade: Arc<ControlFacade>) -> Self {
        Self { facade }
    }

    async fn overview(State(facade): State<Arc<ControlFacade>>) -> Response {
        Json(facade.overview().await).into_response()
    }

    /// Always 200: partial failures are listed under `errors`.
    async fn restart(State(facade): State<Arc<ControlFacade>>) -> Response {
        let report = facade.restart_pipeline().await;
        Json(json!({
            "status": "success",
            "message": "Pipeline restart completed",
            "results": report.results,
            "errors": report.errors,
        }))
        .into_response()
    }
}

impl Controller for PipelineController {
    fn add_route(&self, router: Router) -> Router {
        let routes = Router::new()
            .route("/api/services/rag-pipeline/overview", get(Self::overview))
            .route("/api/restart-pipeline", post(Self::restart))
            .with_state(self.facade.clone());
        router.merge(routes)
    }
}
