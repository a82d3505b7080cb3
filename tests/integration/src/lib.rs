//! Integration test utilities for the campus chat server
//!
//! Runs the real router against in-memory repositories and drives it over
//! HTTP and WebSocket.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
