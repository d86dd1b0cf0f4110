pub mod digest_service;
pub mod event_service;
pub mod registration_service;
