// HTTP server of the manager application.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::controller;
use crate::facade::ControlFacade;
use crate::http::{Controller, Middleware};
use crate::liveness::Prober;
use crate::middleware::{recover_middleware::PanicRecoverMiddleware, trace_middleware::TraceMiddleware};

/// Wraps the routed server and tracks whether it is currently serving.
pub struct HttpServer {
    server: Arc<crate::http::HttpServer>,
    is_server_alive: AtomicBool,
}

impl HttpServer {
    pub fn new(
        ctx: CancellationToken,
        cfg: &Config,
        facade: Arc<ControlFacade>,
        probe: Arc<dyn Prober>,
    ) -> Result<Self> {
        let server = crate::http::HttpServer::new(
            ctx,
            cfg.clone(),
            Self::controllers(facade, probe),
            Self::middlewares(),
        )?;

        Ok(Self {
            server,
            is_server_alive: AtomicBool::new(false),
        })
    }

    pub fn is_alive(&self) -> bool {
        self.is_server_alive.load(Ordering::Relaxed)
    }

    pub fn router(&self) -> axum::Router {
        self.server.router()
    }

    /// Binds the configured port and serves until shutdown.
    pub async fn listen_and_serve(&self) -> Result<()> {
        self.is_server_alive.store(true, Ordering::Relaxed);
        let result = self.server.listen_and_serve().await;
        self.is_server_alive.store(false, Ordering::Relaxed);
        result
    }

    /// Serves on an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        self.is_server_alive.store(true, Ordering::Relaxed);
        let result = self.server.serve(listener).await;
        self.is_server_alive.store(false, Ordering::Relaxed);
        result
    }

    fn controllers(facade: Arc<ControlFacade>, probe: Arc<dyn Prober>) -> Vec<Box<dyn Controller>> {
        vec![
            // Health and build info
            Box::new(controller::HealthController::new(probe)),
            // Prometheus scrape endpoint
            Box::new(controller::PrometheusMetricsController::new()),
            // Per-service control and inspection
            Box::new(controller::ServicesController::new(facade.clone())),
            // Pipeline overview and restart
            Box::new(controller::PipelineController::new(facade)),
        ]
    }

    /// Request middlewares; the first one is the outermost.
    fn middlewares() -> Vec<Box<dyn Middleware>> {
        vec![
            Box::new(PanicRecoverMiddleware::new()),
            Box::new(TraceMiddleware::new()),
        ]
    }
}
