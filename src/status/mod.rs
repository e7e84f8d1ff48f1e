//! Status store: last-known status per service, shared between the health
//! poller and the control path.

mod store;


pub use store::StatusStore;
