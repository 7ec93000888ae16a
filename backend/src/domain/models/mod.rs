pub mod care_event;

pub use care_event::*;
