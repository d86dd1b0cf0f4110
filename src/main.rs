#![allow(non_snake_case)]

mod cli;
mod clients;
mod config;
mod error;
mod models;
mod runtime;
mod server;
mod service;
mod store;
mod tasks;

use std::env;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, BotConfig};
use crate::store::FileStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meetupBot=info")),
        )
        .with_target(false)
        .init();

    let args = cli::Cli::parse();

    let config_path = args.config.clone().or_else(|| env::var("CONFIG_FILE").ok());
    let config = match config_path {
        Some(path) => AppConfig::from_file(&path).unwrap_or_default(),
        None => AppConfig::default(),
    };

    let bot_config = match BotConfig::load(&config) {
        Ok(bot_config) => bot_config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let store = Arc::new(FileStore::new(&bot_config.store_location));

    match args.command {
        cli::Commands::Serve => runtime::run_api(store, bot_config).await,
        cli::Commands::Digest => cli::run_digest_once(store, bot_config).await,
        cli::Commands::Groups => cli::list_groups(store).await,
    }
}
