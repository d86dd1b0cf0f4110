use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// The failure modes of a digest bot run or registration request.
///
/// `Authentication` and `Validation` render directly as the registration
/// endpoint's error bodies; everything else is fatal to the run it occurs
/// in (no retry, no partial delivery).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Authentication Required.")]
    Authentication,

    #[error("`group` is a required field.")]
    Validation,

    #[error("meetup fetch failed: {0}")]
    UpstreamFetch(String),

    #[error("discord delivery failed: {0}")]
    Delivery(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),
}
