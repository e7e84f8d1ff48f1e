//! Service discovery: maps a logical service name to live base addresses.

mod eureka;
mod static_resolver;


use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ConfigTrait, DiscoveryMode};
use crate::directory::Directory;
use crate::http::client::HyperClient;

pub use eureka::{parse_instances, EurekaResolver};
pub use static_resolver::StaticResolver;

/// Resolver wraps the external discovery capability.
///
/// Implementations never fail: absence, registry outages and malformed
/// registry answers all yield an empty list.
#[async_trait::async_trait]
pub trait Resolver: Send + Sync {
    /// Returns candidate base addresses (scheme://host[:port], no trailing
    /// slash) for `name`, in preference order.
    async fn resolve(&self, name: &str) -> Vec<String>;
}

/// Resolves `name` and keeps only the first candidate; only one instance
/// per service is ever used.
pub async fn resolve_first(resolver: &dyn Resolver, name: &str) -> Option<String> {
    resolver.resolve(name).await.into_iter().next()
}

/// Builds the configured resolver. Without a discovery section nothing
/// resolves.
pub fn from_config(
    cfg: &Config,
    directory: &Directory,
    client: HyperClient,
    timeout: Duration,
) -> Result<Arc<dyn Resolver>> {
    let Some(discovery) = cfg.discovery() else {
        return Ok(Arc::new(StaticResolver::default()));
    };

    match discovery.mode {
        DiscoveryMode::Static => {
            for name in discovery.static_addrs.keys() {
                if !directory.contains(name) {
                    anyhow::bail!("discovery.static.{}: service is not in the directory", name);
                }
            }
            Ok(Arc::new(StaticResolver::new(discovery.static_addrs.clone())))
        }
        DiscoveryMode::Eureka => {
            let eureka = discovery
                .eureka
                .as_ref()
                .context("discovery.eureka is required when discovery.mode is eureka")?;
            Ok(Arc::new(EurekaResolver::new(client, &eureka.url, timeout)))
        }
    }
}

/// Normalises a base address: trims whitespace and trailing slashes.
pub(crate) fn normalize_addr(addr: &str) -> String {
    addr.trim().trim_end_matches('/').to_string()
}
