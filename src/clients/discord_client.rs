use reqwest;
use serde::Serialize;
use serde_json::Value;

use crate::error::{BotError, Result};
use crate::models::embed::Embed;

const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

#[derive(Debug, Serialize)]
struct MessagePayload {
    channel_id: String,
    content: String,
    components: Vec<Value>,
    embeds: Vec<Embed>,
}

/// Posts one message with embeds to a Discord channel over the bot REST
/// API. Discord also wants the channel id repeated in the body.
pub async fn post_channel_message(
    token: &str,
    channel: &str,
    content: &str,
    embeds: Vec<Embed>,
) -> Result<()> {
    let url = format!("{}/channels/{}/messages", DISCORD_API_BASE, channel);
    let payload = MessagePayload {
        channel_id: channel.to_string(),
        content: content.to_string(),
        components: Vec::new(),
        embeds,
    };

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .header("Authorization", format!("Bot {}", token))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
        .map_err(|e| BotError::Delivery(format!("channel {}: {}", channel, e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| BotError::Delivery(format!("channel {}: {}", channel, e)))?;

    if !status.is_success() {
        return Err(BotError::Delivery(format!(
            "channel {}: request failed with status {}: {}",
            channel, status, text
        )));
    }

    Ok(())
}
