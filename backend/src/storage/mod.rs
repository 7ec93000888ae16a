//! # Storage Module
//!
//! Persistence for care events. The store is a single SQLite table accessed
//! through sqlx; the domain only ever sees it through [`CareEventRepository`]:
//!
//! - insert an event
//! - select every event at or after an instant, newest first
//! - delete an event by id

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::CareEventRepository;
