use async_trait::async_trait;

use crate::clients::meetup_client;
use crate::error::Result;
use crate::models::event::Event;

#[async_trait]
pub trait EventSource: Send + Sync {
    async fn upcoming_events(&self, group: &str) -> Result<Vec<Event>>;
}

pub struct MeetupService {
    page_limit: u32,
}

impl MeetupService {
    pub fn new(page_limit: u32) -> Self {
        Self { page_limit }
    }

    async fn upcoming_events_internal(&self, group: &str) -> Result<Vec<Event>> {
        let raw = meetup_client::fetch_upcoming_events(group, self.page_limit).await?;
        raw.into_iter().map(Event::from_meetup).collect()
    }
}

#[async_trait]
impl EventSource for MeetupService {
    async fn upcoming_events(&self, group: &str) -> Result<Vec<Event>> {
        self.upcoming_events_internal(group).await
    }
}
