//! Deduplicated logging functionality to prevent log spam.
//!
//! A downstream service that is down stays down for many poll cycles; the
//! same failure is aggregated here and flushed once per window with a count.

pub mod log_entry;
pub mod sanitizer;


pub use log_entry::{err, start_dedup_logger};

pub(crate) const COMPONENT: &str = "dedlog";
