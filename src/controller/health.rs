//! Health and build info endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::http::Controller;
use crate::liveness::Prober;

pub const SERVICE_ID: &str = "imc-manager";
const APP_NAME: &str = "IMC Manager";
const APP_DESCRIPTION: &str = "Insurance MegaCorp System Management Dashboard";

pub struct HealthController {
    probe: Arc<dyn Prober>,
}

impl HealthController {
    pub fn new(probe: Arc<dyn Prober>) -> Self {
        Self { probe }
    }

    async fn health(State(probe): State<Arc<dyn Prober>>) -> Response {
        let (code, status) = if probe.is_alive().await {
            (StatusCode::OK, "UP")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "DOWN")
        };
        (
            code,
            Json(json!({
                "status": status,
                "timestamp": Utc::now(),
                "service": SERVICE_ID,
            })),
        )
            .into_response()
    }

    async fn info() -> Response {
        Json(json!({
            "name": APP_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "description": APP_DESCRIPTION,
        }))
        .into_response()
    }
}

impl Controller for HealthController {
    fn add_route(&self, router: Router) -> Router {
        let routes = Router::new()
            .route("/api/health", get(Self::health))
            .route("/api/info", get(Self::info))
            .with_state(self.probe.clone());
        router.merge(routes)
    }
}
