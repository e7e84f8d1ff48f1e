//! Health poller: the background loop refreshing the status store.

mod poller;


pub use poller::HealthPoller;
