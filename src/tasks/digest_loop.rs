use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use futures::future;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{error, info};

use async_trait::async_trait;

use crate::clients::discord_client;
use crate::config::BotConfig;
use crate::error::Result;
use crate::models::embed::Embed;
use crate::service::digest_service;
use crate::service::event_service::{EventSource, MeetupService};
use crate::service::registration_service::RegistrationService;
use crate::store::{FileStore, GroupStore};

pub const DIGEST_INTRO: &str =
    "Hey @everyone, we just wanted to let you know about some of the community events coming up this month!";

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, channel: &str, content: &str, embeds: Vec<Embed>) -> Result<()>;
}

pub struct DiscordSender {
    token: String,
}

impl DiscordSender {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[async_trait]
impl MessageSender for DiscordSender {
    async fn send(&self, channel: &str, content: &str, embeds: Vec<Embed>) -> Result<()> {
        discord_client::post_channel_message(&self.token, channel, content, embeds).await
    }
}

/// How a digest run ended when nothing went wrong.
#[derive(Debug, PartialEq, Eq)]
pub enum DigestOutcome {
    NoTrackedGroups,
    NoUpcomingEvents,
    Sent { events: usize },
}

/// One digest run: read the registry, fetch every group's upcoming events
/// in parallel, build the month's embeds and post them as a single
/// message. Any group failing fails the whole run and nothing is sent.
pub async fn digest_tick<S, E, M>(
    store: &S,
    source: &E,
    sender: &M,
    channel: &str,
    now: DateTime<Local>,
) -> Result<DigestOutcome>
where
    S: GroupStore + ?Sized,
    E: EventSource + ?Sized,
    M: MessageSender + ?Sized,
{
    let groups = RegistrationService::tracked_groups(store).await?;
    if groups.is_empty() {
        return Ok(DigestOutcome::NoTrackedGroups);
    }

    let fetches = groups.iter().map(|group| source.upcoming_events(group));
    let results = future::try_join_all(fetches).await?;
    let events: Vec<_> = results.into_iter().flatten().collect();
    info!(
        "fetched {} events across {} groups",
        events.len(),
        groups.len()
    );

    let embeds = digest_service::build_digest(events, now);
    if embeds.is_empty() {
        return Ok(DigestOutcome::NoUpcomingEvents);
    }

    let count = embeds.len();
    sender.send(channel, DIGEST_INTRO, embeds).await?;
    Ok(DigestOutcome::Sent { events: count })
}

pub async fn run_digest_loop(store: Arc<FileStore>, config: BotConfig) {
    let sender = DiscordSender::new(config.discord_api_token.clone());
    let source = MeetupService::new(config.event_page_limit);
    loop {
        let next_run = next_digest_run(Local::now(), config.digest_day, config.digest_hour);
        let sleep_for = (next_run - Local::now())
            .to_std()
            .unwrap_or_else(|_| std::time::Duration::from_secs(60));
        info!("next digest run at {}", next_run);
        sleep(sleep_for).await;

        match digest_tick(
            store.as_ref(),
            &source,
            &sender,
            &config.discord_channel,
            Local::now(),
        )
        .await
        {
            Ok(outcome) => info!("digest run finished: {:?}", outcome),
            Err(e) => error!("digest run failed: {}", e),
        }
    }
}

/// Next `day`-of-month at `hour:00` local, strictly after `now`. The day
/// is clamped into short months, so day 31 fires on February 28th.
fn next_digest_run(now: DateTime<Local>, day: u32, hour: u32) -> DateTime<Local> {
    let this_month = digest_run_at(now.year(), now.month(), day, hour);
    if now < this_month {
        this_month
    } else {
        let (year, month) = if now.month() == 12 {
            (now.year() + 1, 1)
        } else {
            (now.year(), now.month() + 1)
        };
        digest_run_at(year, month, day, hour)
    }
}

fn digest_run_at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Local> {
    let day = day.min(last_day_of_month(year, month));
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap();
    Local
        .from_local_datetime(&naive)
        .single()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    for day in (28..=31).rev() {
        if NaiveDate::from_ymd_opt(year, month, day).is_some() {
            return day;
        }
    }
    28
}
