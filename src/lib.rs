pub mod cli;
pub mod core;
pub mod home;
pub mod providers;
pub mod reactive;
pub mod repository;
pub mod store;

use crate::core::TimeRange;
use crate::core::config::AppConfig;
use crate::repository::Repository;
use anyhow::Result;
use chrono::Local;
use tracing::{debug, info};

pub enum AppCommand {
    Home {
        range: Option<TimeRange>,
        refresh: bool,
    },
}

/// Wires the configured store, remote source and connectivity check into a
/// repository. Seeds the store with placeholder data on first launch.
pub async fn build_repository(config: &AppConfig) -> Result<Repository> {
    let store = store::open_store(config)?;
    if store::seed::seed_if_empty(store.as_ref(), Local::now().date_naive()).await? {
        info!("First launch, local store seeded");
    }
    let remote = providers::remote_source(config)?;
    let connectivity = providers::connectivity_check(config);
    Ok(Repository::new(store, remote, connectivity))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Expense Tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Home { range, refresh } => cli::home::run(&config, range, refresh).await,
    }
}
