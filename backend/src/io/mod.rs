//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain: request parsing,
//! JSON serialization and error-to-status translation. No business logic
//! lives here.

pub mod rest;

pub use rest::*;
