#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod app;
pub mod config;
pub mod controller;
pub mod dedlog;
pub mod directory;
pub mod discovery;
pub mod facade;
pub mod http;
pub mod liveness;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod poller;
pub mod remote;
pub mod shutdown;
pub mod status;
