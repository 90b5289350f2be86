//! Integration test utilities for the engagement server
//!
//! This crate provides helpers for running end-to-end tests against the
//! HTTP boundary with a real listener and cookie-carrying clients.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
