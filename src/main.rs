//! Headless autoplay runner (default binary).
//!
//! Loads configuration from the environment, runs one game on the async
//! driver and lets the bot type until game over or the time limit.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use typefall::engine::Session;
use typefall::runtime::bot::DEFAULT_THINK_MS;
use typefall::runtime::{autoplay, open_catalog, open_sink, AutoTyper, Driver, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RuntimeConfig::from_env();
    info!(
        player = %config.player_id,
        seed = config.seed,
        start_stage = config.start_stage,
        "starting typefall"
    );

    let catalog = Arc::new(open_catalog(&config)?);
    let session = Session::new(
        config.engine_config(),
        catalog.clone(),
        catalog,
        open_sink(&config),
    );

    let driver = Driver::spawn(session);
    let mut typer = AutoTyper::new(config.seed.wrapping_add(1), config.bot_miss_percent);
    let sent = autoplay(
        &driver,
        &mut typer,
        Duration::from_millis(DEFAULT_THINK_MS),
        Duration::from_secs(config.time_limit_secs),
    )
    .await;

    let snapshot = driver.snapshot();
    match driver.stop().await? {
        Some(result) => info!(
            score = result.score,
            stage = result.stage,
            play_at = %result.play_at,
            mileage = result.mileage(),
            inputs = sent,
            "game finished"
        ),
        None => info!(
            score = snapshot.score,
            inputs = sent,
            "game ended without a result"
        ),
    }

    Ok(())
}
