// Manager application: wires discovery, remote control, the status store,
// the poller and the HTTP surface together.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::{Config, ConfigTrait};
use crate::directory::Directory;
use crate::discovery::{self, Resolver};
use crate::facade::{ControlFacade, RestartPlan};
use crate::http::client::{create_client, HyperClient};
use crate::liveness;
use crate::poller::HealthPoller;
use crate::remote::HttpRemoteControl;
use crate::status::StatusStore;

use super::server::HttpServer;

#[derive(Clone)]
pub struct App {
    cfg: Config,
    shutdown_token: CancellationToken,
    facade: Arc<ControlFacade>,
    store: Arc<StatusStore>,
    poller: Arc<HealthPoller>,
    probe: Arc<dyn liveness::Prober>,
    server: Arc<HttpServer>,
}

impl App {
    /// Builds the application with the resolver named by the config.
    pub fn new(
        shutdown_token: CancellationToken,
        cfg: Config,
        probe: Arc<dyn liveness::Prober>,
    ) -> Result<Self> {
        let client = create_client(cfg.connect_timeout())?;
        let directory = Arc::new(Directory::from_config(&cfg)?);
        let resolver = discovery::from_config(&cfg, &directory, client.clone(), cfg.remote_timeout())?;
        Self::build(shutdown_token, cfg, probe, client, directory, resolver)
    }

    /// Builds the application around a caller-supplied resolver.
    pub fn with_resolver(
        shutdown_token: CancellationToken,
        cfg: Config,
        probe: Arc<dyn liveness::Prober>,
        resolver: Arc<dyn Resolver>,
    ) -> Result<Self> {
        let client = create_client(cfg.connect_timeout())?;
        let directory = Arc::new(Directory::from_config(&cfg)?);
        Self::build(shutdown_token, cfg, probe, client, directory, resolver)
    }

    fn build(
        shutdown_token: CancellationToken,
        cfg: Config,
        probe: Arc<dyn liveness::Prober>,
        client: HyperClient,
        directory: Arc<Directory>,
        resolver: Arc<dyn Resolver>,
    ) -> Result<Self> {
        let remote = Arc::new(HttpRemoteControl::new(client, cfg.remote_timeout()));
        let store = Arc::new(StatusStore::new());
        let plan = RestartPlan::from_config(&cfg, &directory)?;

        let facade = Arc::new(ControlFacade::new(
            directory.clone(),
            resolver.clone(),
            remote.clone(),
            store.clone(),
            plan,
        ));
        let poller = Arc::new(HealthPoller::new(
            directory.clone(),
            resolver,
            remote,
            store.clone(),
            cfg.poll_interval(),
        ));
        let server = Arc::new(HttpServer::new(
            shutdown_token.clone(),
            &cfg,
            facade.clone(),
            probe.clone(),
        )?);

        info!(
            component = "app",
            event = "built",
            services = ?directory.names(),
            poller_enabled = cfg.is_poller_enabled(),
            "application assembled"
        );

        Ok(Self {
            cfg,
            shutdown_token,
            facade,
            store,
            poller,
            probe,
            server,
        })
    }

    pub fn facade(&self) -> Arc<ControlFacade> {
        self.facade.clone()
    }

    pub fn store(&self) -> Arc<StatusStore> {
        self.store.clone()
    }

    pub fn poller(&self) -> Arc<HealthPoller> {
        self.poller.clone()
    }

    /// Serves on the configured port until shutdown, then closes.
    pub async fn serve(&self) -> Result<()> {
        self.start_background();
        let result = self.server.listen_and_serve().await;
        self.close();
        result
    }

    /// Like [`App::serve`] on a listener bound by the caller.
    pub async fn serve_on(&self, listener: TcpListener) -> Result<()> {
        self.start_background();
        let result = self.server.serve(listener).await;
        self.close();
        result
    }

    /// Registers liveness targets and starts the poller.
    fn start_background(&self) {
        let mut targets: Vec<Arc<dyn liveness::Service>> = vec![Arc::new(self.clone())];

        if self.cfg.is_poller_enabled() {
            targets.push(self.poller.clone());
            tokio::spawn(self.poller.clone().run(self.shutdown_token.child_token()));
        } else {
            warn!(
                component = "app",
                event = "poller_disabled",
                "health poller is disabled, statuses change only through control calls"
            );
        }

        self.probe.watch(targets);

        info!(component = "app", event = "started", "application lifecycle");
    }

    pub fn is_alive(&self) -> bool {
        if !self.server.is_alive() {
            warn!(
                component = "app",
                scope = "http_server",
                event = "gone_away",
                "http server has gone away"
            );
            return false;
        }
        true
    }

    /// Cancels background work. In-flight poll cycles finish on their own.
    pub fn close(&self) {
        self.shutdown_token.cancel();
        info!(component = "app", event = "stopped", "application lifecycle");
    }
}

impl liveness::Service for App {
    fn is_alive(&self, _timeout: Duration) -> bool {
        App::is_alive(self)
    }
}
