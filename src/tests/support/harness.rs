// Integration test harness: the full application served on an ephemeral
// loopback port.

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app::App;
use crate::config::{self, Config};
use crate::discovery::StaticResolver;
use crate::liveness::{Probe, Prober};

pub struct TestApp {
    addr: String,
    app: App,
    resolver: Arc<StaticResolver>,
    shutdown_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl TestApp {
    /// Starts the application on the test config with the poller disabled.
    pub async fn start(resolver: Arc<StaticResolver>) -> Self {
        Self::start_with(config::new_test_config(), resolver).await
    }

    pub async fn start_with(cfg: Config, resolver: Arc<StaticResolver>) -> Self {
        let shutdown_token = CancellationToken::new();
        let probe = Arc::new(Probe::new(Duration::from_secs(1))) as Arc<dyn Prober>;
        let app = App::with_resolver(shutdown_token.clone(), cfg, probe, resolver.clone())
            .expect("build app");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        let serving = app.clone();
        let handle = tokio::spawn(async move {
            serving.serve_on(listener).await.expect("serve app");
        });

        Self {
            addr,
            app,
            resolver,
            shutdown_token,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn resolver(&self) -> &StaticResolver {
        &self.resolver
    }

    pub async fn stop(self) {
        self.shutdown_token.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}
