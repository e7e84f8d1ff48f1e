//! Hyper HTTP client shared by the remote control client and the registry
//! resolver.
//!
//! Traffic is a handful of small control calls per poll interval, so the
//! pool is kept small:
//! - Max idle connections per host: 8
//! - Max idle connection duration: 30s
//! - Connection timeout: configurable (`remote.connect_timeout`)
//! - TCP keep-alive: 30s
//! - TCP_NODELAY: enabled

use anyhow::{Context, Result};
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::dns::GaiResolver;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

/// Connection pool configuration constants.
pub const CONNS_PER_HOST: usize = 8;
pub const MAX_IDLE_CONN_DURATION: Duration = Duration::from_secs(30);

pub type HyperClient =
    Client<HttpsConnector<HttpConnector<GaiResolver>>, BoxBody<Bytes, hyper::Error>>;

/// Creates a Hyper HTTP client speaking plain HTTP or TLS (native roots).
pub fn create_client(connect_timeout: Duration) -> Result<HyperClient> {
    let resolver = GaiResolver::new();

    let mut http_connector = HttpConnector::new_with_resolver(resolver);
    http_connector.set_nodelay(true);
    http_connector.set_keepalive(Some(Duration::from_secs(30)));
    http_connector.set_connect_timeout(Some(connect_timeout));
    http_connector.enforce_http(false);

    let tls = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .context("failed to load native root certificates")?
        .https_or_http()
        .enable_http1()
        .wrap_connector(http_connector);

    Ok(Client::builder(TokioExecutor::new())
        .pool_idle_timeout(MAX_IDLE_CONN_DURATION)
        .pool_max_idle_per_host(CONNS_PER_HOST)
        .build(tls))
}
