//! HTTP server implementation.

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait};
use crate::controller::controller::Controller;
use crate::middleware::middleware::Middleware;

const DEFAULT_NAME: &str = "imc-manager";
const DEFAULT_PORT: &str = "8080";

/// Upper bound on a whole inbound request, on top of the per-call
/// downstream timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP server implementation.
pub struct HttpServer {
    shutdown_token: CancellationToken,
    config: Config,
    router: Router,
}

impl HttpServer {
    pub fn new(
        shutdown_token: CancellationToken,
        config: Config,
        controllers: Vec<Box<dyn Controller>>,
        middlewares: Vec<Box<dyn Middleware>>,
    ) -> Result<Arc<Self>> {
        let router = Self::build_router(controllers);
        let router = Self::merge_middlewares(router, middlewares);

        Ok(Arc::new(Self {
            shutdown_token,
            config,
            router,
        }))
    }

    /// Fully layered router, for serving on a listener owned by the caller.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn listen_and_serve(&self) -> Result<()> {
        let api_cfg = self.config.api();

        let name = api_cfg
            .and_then(|a| a.name.as_deref())
            .unwrap_or(DEFAULT_NAME);
        let port = api_cfg
            .and_then(|a| a.port.as_deref())
            .unwrap_or(DEFAULT_PORT)
            .trim_start_matches(':');

        let addr: SocketAddr = format!("0.0.0.0:{}", port)
            .parse()
            .context("Failed to parse server address")?;

        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind TCP listener on {}", addr))?;

        info!(
            component = "server",
            event = "started",
            name = name,
            port = port,
            "server started"
        );

        self.serve(listener).await.map_err(|e| {
            error!(
                component = "server",
                event = "listen_and_serve_failed",
                name = name,
                port = port,
                error = %e,
                "server failed to listen and serve"
            );
            e
        })?;

        info!(
            component = "server",
            event = "stopped",
            name = name,
            port = port,
            "server stopped"
        );

        Ok(())
    }

    /// Serves on `listener` until the shutdown token is cancelled.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let shutdown_token = self.shutdown_token.clone();
        axum::serve(listener, self.router.clone())
            .with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            })
            .await?;
        Ok(())
    }

    fn build_router(controllers: Vec<Box<dyn Controller>>) -> Router {
        let mut router = Router::new();
        for controller in controllers {
            router = controller.add_route(router);
        }
        router
    }

    /// Middlewares are applied in reverse order, so the first one listed is
    /// the outermost.
    fn merge_middlewares(router: Router, middlewares: Vec<Box<dyn Middleware>>) -> Router {
        let mut result = router.layer(TimeoutLayer::new(REQUEST_TIMEOUT));
        for middleware in middlewares.iter().rev() {
            result = middleware.apply(result);
        }
        result
    }
}
