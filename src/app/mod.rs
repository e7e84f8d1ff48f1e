// Application wiring.

#[allow(clippy::module_inception)]
mod app;
mod server;

pub use app::App;
