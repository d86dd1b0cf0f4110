use reqwest;

use crate::error::{BotError, Result};
use crate::models::event::MeetupEvent;

const MEETUP_API_BASE: &str = "https://api.meetup.com";

/// Pulls the next `limit` upcoming events for one group from the public
/// Meetup API. No auth needed; `photo-host=public` keeps the payload free
/// of member-only photo links.
pub async fn fetch_upcoming_events(group: &str, limit: u32) -> Result<Vec<MeetupEvent>> {
    let url = format!(
        "{}/{}/events?photo-host=public&page={}",
        MEETUP_API_BASE, group, limit
    );

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| BotError::UpstreamFetch(format!("group {}: {}", group, e)))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| BotError::UpstreamFetch(format!("group {}: {}", group, e)))?;

    if !status.is_success() {
        return Err(BotError::UpstreamFetch(format!(
            "group {}: request failed with status {}: {}",
            group, status, text
        )));
    }

    serde_json::from_str(&text).map_err(|e| {
        BotError::UpstreamFetch(format!(
            "group {}: failed to parse events JSON: {}\nRaw body: {}",
            group, e, text
        ))
    })
}
