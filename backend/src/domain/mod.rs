//! # Domain Module
//!
//! Business logic for the care log.
//!
//! - **models**: care events as stored and as decoded
//! - **time_window**: which days a read view covers
//! - **daily_aggregator**: per-day counters behind the trend charts
//! - **care_log_service**: orchestrates the store and the pieces above

pub mod care_log_service;
pub mod daily_aggregator;
pub mod models;
pub mod time_window;

pub use care_log_service::*;
pub use daily_aggregator::*;
pub use time_window::*;
