use hyper::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{normalize_addr, Resolver};
use crate::dedlog;
use crate::http::client::{self, HyperClient};

const INSTANCE_UP: &str = "UP";

/// Resolver backed by a Eureka-compatible registry (`GET {url}/apps/{NAME}`).
pub struct EurekaResolver {
    client: HyperClient,
    base_url: String,
    timeout: Duration,
}

impl EurekaResolver {
    pub fn new(client: HyperClient, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: normalize_addr(base_url),
            timeout,
        }
    }

    fn app_url(&self, name: &str) -> String {
        format!(
            "{}/apps/{}",
            self.base_url,
            urlencoding::encode(&name.to_uppercase())
        )
    }
}

#[async_trait::async_trait]
impl Resolver for EurekaResolver {
    async fn resolve(&self, name: &str) -> Vec<String> {
        let url = self.app_url(name);
        let resp = match client::send(
            &self.client,
            Method::GET,
            &url,
            &[("accept", "application/json")],
            self.timeout,
        )
        .await
        {
            Ok(resp) => resp,
            Err(e) => {
                dedlog::err(Some(e.as_ref()), Some(name), "registry lookup failed");
                return Vec::new();
            }
        };

        // 404 is the registry's way of saying "no such application".
        if resp.status == 404 {
            debug!(component = "discovery", service = name, "application not registered");
            return Vec::new();
        }
        if !resp.is_success() {
            let reason = format!("registry answered {} for {}", resp.status, name);
            dedlog::err(None, Some(&reason), "registry lookup failed");
            return Vec::new();
        }

        match serde_json::from_slice::<Value>(&resp.body) {
            Ok(doc) => parse_instances(&doc),
            Err(e) => {
                dedlog::err(Some(&e), Some(name), "registry returned malformed json");
                Vec::new()
            }
        }
    }
}

/// Extracts base addresses of instances reported UP from an
/// `{"application": {"instance": ...}}` document. `instance` may be an
/// array or, for single-instance applications, a bare object.
pub fn parse_instances(doc: &Value) -> Vec<String> {
    let instances = match doc.pointer("/application/instance") {
        Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
        Some(obj @ Value::Object(_)) => vec![obj],
        _ => return Vec::new(),
    };

    instances
        .into_iter()
        .filter(|inst| inst.get("status").and_then(Value::as_str) == Some(INSTANCE_UP))
        .filter_map(instance_addr)
        .collect()
}

fn instance_addr(inst: &Value) -> Option<String> {
    if let Some(home) = inst.get("homePageUrl").and_then(Value::as_str) {
        let home = normalize_addr(home);
        if !home.is_empty() {
            return Some(home);
        }
    }

    let host = inst.get("hostName").and_then(Value::as_str)?;
    let port = inst.get("port").and_then(|p| match p {
        Value::Object(_) => p.get("$").and_then(port_number),
        other => port_number(other),
    })?;
    Some(format!("http://{}:{}", host, port))
}

fn port_number(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
