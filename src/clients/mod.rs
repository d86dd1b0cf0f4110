pub mod discord_client;
pub mod meetup_client;
