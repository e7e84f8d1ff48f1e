//! Control facade: the single entry point of the REST surface.
//!
//! Every operation takes a logical service name and runs directory lookup,
//! capability check, resolution, the remote call and, for start/stop, the
//! status store update.

#[allow(clippy::module_inception)]
mod facade;
mod restart;

#[cfg(test)]
mod restart_test;

pub use facade::ControlFacade;
pub use restart::{PlanStep, RestartAction, RestartPlan, UnknownAction};
