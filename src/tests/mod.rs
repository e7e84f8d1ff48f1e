//! End-to-end tests: the full application router against stub downstream
//! services on loopback ports.


pub mod support;
