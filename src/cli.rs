use clap::{Parser, Subcommand};
use chrono::Local;
use std::process;
use std::sync::Arc;

use crate::config::BotConfig;
use crate::service::event_service::MeetupService;
use crate::service::registration_service::RegistrationService;
use crate::store::FileStore;
use crate::tasks::digest_loop::{self, DigestOutcome, DiscordSender};

#[derive(Parser)]
#[command(name = "meetupBot", about = "Meetup community events digest bot for Discord")]
pub struct Cli {
    /// KEY=VALUE config file, otherwise the CONFIG_FILE env var is used.
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the registration endpoint and the monthly digest loop.
    Serve,
    /// Fetch events and post one digest immediately, then exit.
    Digest,
    /// Print the groups currently registered.
    Groups,
}

pub async fn run_digest_once(store: Arc<FileStore>, config: BotConfig) {
    let source = MeetupService::new(config.event_page_limit);
    let sender = DiscordSender::new(config.discord_api_token.clone());
    let outcome = digest_loop::digest_tick(
        store.as_ref(),
        &source,
        &sender,
        &config.discord_channel,
        Local::now(),
    )
    .await;

    match outcome {
        Ok(DigestOutcome::NoTrackedGroups) => println!("No groups registered, nothing to send"),
        Ok(DigestOutcome::NoUpcomingEvents) => println!("No events this month, nothing sent"),
        Ok(DigestOutcome::Sent { events }) => println!("Digest sent with {} events", events),
        Err(e) => {
            eprintln!("Digest failed: {}", e);
            process::exit(1);
        }
    }
}

pub async fn list_groups(store: Arc<FileStore>) {
    match RegistrationService::tracked_groups(store.as_ref()).await {
        Ok(groups) if groups.is_empty() => println!("No groups registered"),
        Ok(groups) => {
            for group in &groups {
                println!("{}", group);
            }
            println!("{} groups stored", groups.len());
        }
        Err(e) => {
            eprintln!("Failed to read store: {}", e);
            process::exit(1);
        }
    }
}
