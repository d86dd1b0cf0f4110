pub mod embed;
pub mod event;
