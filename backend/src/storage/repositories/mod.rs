pub mod care_event_repository;

pub use care_event_repository::CareEventRepository;
