// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
pub const TEST: &str = "test";

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Manager {
    #[serde(rename = "manager")]
    pub manager: ManagerBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManagerBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub runtime: Option<Runtime>,
    pub api: Option<Api>,
    pub poller: Option<Poller>,
    pub remote: Option<Remote>,
    pub discovery: Option<Discovery>,
    /// Overrides the built-in service directory when present.
    pub services: Option<Vec<ServiceEntry>>,
    pub pipeline: Option<Pipeline>,
    pub k8s: Option<K8S>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Runtime {
    pub num_cpus: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Api {
    pub name: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Poller {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, with = "humantime_serde")]
    pub interval: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Remote {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    #[serde(rename = "connect_timeout", default, with = "humantime_serde")]
    pub connect_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    Static,
    Eureka,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Discovery {
    pub mode: DiscoveryMode,
    /// Logical service name -> candidate base URLs, first one wins.
    #[serde(rename = "static", default)]
    pub static_addrs: HashMap<String, Vec<String>>,
    pub eureka: Option<Eureka>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Eureka {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceEntry {
    pub name: String,
    #[serde(rename = "display_name")]
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub operations: Vec<String>,
    /// Operation name -> path override on the downstream sub-API.
    #[serde(default)]
    pub endpoints: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Pipeline {
    pub restart: Option<Vec<RestartStep>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestartStep {
    pub service: String,
    pub action: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Probe {
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct K8S {
    pub probe: Probe,
}

fn enabled_by_default() -> bool {
    true
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    fn runtime(&self) -> &Runtime;
    fn api(&self) -> Option<&Api>;
    fn is_poller_enabled(&self) -> bool;
    fn poll_interval(&self) -> Duration;
    fn remote_timeout(&self) -> Duration;
    fn connect_timeout(&self) -> Duration;
    fn discovery(&self) -> Option<&Discovery>;
    fn services(&self) -> Option<&[ServiceEntry]>;
    fn restart_plan(&self) -> Option<&[RestartStep]>;
    fn probe_timeout(&self) -> Duration;
}

// Config type alias for convenience
pub type Config = Manager;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.manager.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.manager.env == PROD
    }

    fn runtime(&self) -> &Runtime {
        const AUTO: Runtime = Runtime { num_cpus: 0 };
        self.manager.runtime.as_ref().unwrap_or(&AUTO)
    }

    fn api(&self) -> Option<&Api> {
        self.manager.api.as_ref()
    }

    fn is_poller_enabled(&self) -> bool {
        self.manager.poller.as_ref().map(|p| p.enabled).unwrap_or(true)
    }

    fn poll_interval(&self) -> Duration {
        self.manager
            .poller
            .as_ref()
            .and_then(|p| p.interval)
            .unwrap_or(DEFAULT_POLL_INTERVAL)
    }

    fn remote_timeout(&self) -> Duration {
        self.manager
            .remote
            .as_ref()
            .and_then(|r| r.timeout)
            .unwrap_or(DEFAULT_REMOTE_TIMEOUT)
    }

    fn connect_timeout(&self) -> Duration {
        self.manager
            .remote
            .as_ref()
            .and_then(|r| r.connect_timeout)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT)
    }

    fn discovery(&self) -> Option<&Discovery> {
        self.manager.discovery.as_ref()
    }

    fn services(&self) -> Option<&[ServiceEntry]> {
        self.manager.services.as_deref()
    }

    fn restart_plan(&self) -> Option<&[RestartStep]> {
        self.manager
            .pipeline
            .as_ref()
            .and_then(|p| p.restart.as_deref())
    }

    fn probe_timeout(&self) -> Duration {
        self.manager
            .k8s
            .as_ref()
            .and_then(|k8s| k8s.probe.timeout)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        let cfg = Self::from_yaml(&data)
            .with_context(|| format!("load config from {:?}", abs_path))?;

        Ok(cfg)
    }

    /// Parses and validates configuration from a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Manager = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the invariants which do not depend on the service directory.
    /// Service names referenced by discovery and the restart plan are
    /// checked once the directory is built.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval().is_zero() {
            anyhow::bail!("poller.interval must be greater than zero");
        }

        if let Some(discovery) = self.discovery() {
            match discovery.mode {
                DiscoveryMode::Static => {
                    for (name, addrs) in &discovery.static_addrs {
                        for addr in addrs {
                            url::Url::parse(addr).with_context(|| {
                                format!("discovery.static.{}: invalid address {:?}", name, addr)
                            })?;
                        }
                    }
                }
                DiscoveryMode::Eureka => {
                    let eureka = discovery
                        .eureka
                        .as_ref()
                        .context("discovery.eureka is required when discovery.mode is eureka")?;
                    url::Url::parse(&eureka.url)
                        .with_context(|| format!("discovery.eureka.url: invalid url {:?}", eureka.url))?;
                }
            }
        }

        Ok(())
    }
}

// Test config is always available for integration tests
mod test_config;
pub use test_config::new_test_config;
