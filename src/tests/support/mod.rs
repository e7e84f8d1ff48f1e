// Shared test support: stub downstream services, in-memory fakes and the
// application harness.

pub mod common;
pub mod downstream;
pub mod fakes;
pub mod harness;

pub use common::*;
pub use downstream::StubService;
pub use fakes::{resolver_with, FakeRemote};
pub use harness::TestApp;
