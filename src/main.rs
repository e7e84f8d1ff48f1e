// Main entrypoint for the IMC Manager control plane.

use anyhow::{Context, Result};
use clap::Parser;
use imcmanager::app::App;
use imcmanager::config::{Config, ConfigTrait};
use imcmanager::shutdown::GracefulShutdown;
use imcmanager::{dedlog, liveness, metrics};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const CONFIG_PATH: &str = "cfg/imcmanager.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/imcmanager.cfg.local.yaml";

/// IMC Manager - control plane for the RAG pipeline services
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE")]
    cfg: Option<PathBuf>,
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then falls back to default config.
fn load_cfg(path: Option<PathBuf>) -> Result<(Config, String)> {
    if let Some(custom_path) = path {
        let cfg = Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path))?;
        return Ok((cfg, custom_path.display().to_string()));
    }

    match Config::load(PathBuf::from(CONFIG_PATH_LOCAL)) {
        Ok(cfg) => Ok((cfg, CONFIG_PATH_LOCAL.to_string())),
        Err(_) => {
            let cfg = Config::load(PathBuf::from(CONFIG_PATH))
                .with_context(|| format!("failed to load config from {}", CONFIG_PATH))?;
            Ok((cfg, CONFIG_PATH.to_string()))
        }
    }
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("debug");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn build_runtime(cfg: &Config) -> Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    let cores = cfg.runtime().num_cpus;
    if cores > 0 {
        builder.worker_threads(cores);
        warn!(
            component = "main",
            event = "num_cpus_configured",
            num_cpus = cores,
            "Available cores value configured"
        );
    } else {
        info!(
            component = "main",
            event = "num_cpus_configured",
            num_cpus = num_cpus::get(),
            "Available cores value configured (using all available cores)"
        );
    }

    builder.build().context("Failed to create tokio runtime")
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (cfg, cfg_path) = load_cfg(args.cfg)?;
    configure_logger(&cfg);
    info!(component = "config", event = "load_success", path = %cfg_path, "config loaded");

    // The recorder must be installed before the runtime starts.
    if let Err(e) = metrics::init_prometheus_exporter() {
        warn!(
            component = "main",
            event = "metrics_disabled",
            error = %e,
            "failed to initialize Prometheus exporter, /metrics will be unavailable"
        );
    }

    build_runtime(&cfg)?.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<()> {
    let shutdown_token = CancellationToken::new();

    let dedup_logger_token = shutdown_token.clone();
    tokio::task::spawn(async move {
        dedlog::start_dedup_logger(dedup_logger_token).await;
    });

    let graceful_shutdown = GracefulShutdown::new(shutdown_token.clone());
    graceful_shutdown
        .set_graceful_timeout(Duration::from_secs(30))
        .await;

    let probe = Arc::new(liveness::Probe::new(cfg.probe_timeout())) as Arc<dyn liveness::Prober>;

    let app = App::new(shutdown_token.clone(), cfg, probe)?;

    graceful_shutdown.add(1);
    let gsh = graceful_shutdown.clone();
    let serve_token = shutdown_token.clone();
    tokio::task::spawn(async move {
        if let Err(e) = app.serve().await {
            error!(
                component = "main",
                scope = "app",
                event = "start_failed",
                error = %e,
                "failed to start app"
            );
            serve_token.cancel();
        }
        gsh.done();
    });

    if let Err(e) = graceful_shutdown.await_shutdown().await {
        error!(
            component = "main",
            scope = "service",
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}
