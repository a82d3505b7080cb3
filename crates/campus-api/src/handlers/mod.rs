//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod chat;
pub mod health;
