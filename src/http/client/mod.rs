// Outbound HTTP: pooled hyper client and the request helper built on it.

mod hyper_client;
mod request;

pub use hyper_client::{create_client, HyperClient};
pub use request::{send, RawResponse};
