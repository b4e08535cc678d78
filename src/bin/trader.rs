//! Headless trading runner.
//!
//! Wires the Alpaca adapter into the tick engine and scheduler and
//! runs until interrupted. No UI, no database; configuration comes
//! from the environment.

use dotenvy::dotenv;
use std::env;
use std::sync::Arc;
use tokio::signal;
use tradewind::config::{get_environment, MarketHours, Settings};
use tradewind::core::{TickEngine, TradingScheduler};
use tradewind::logging;
use tradewind::services::broker::BrokerClient;
use tradewind::services::market_data::PriceHistoryProvider;
use tradewind::services::AlpacaClient;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let environment = get_environment();
    info!("Starting tradewind trader");
    info!(environment = %environment, "Environment");

    let api_key = env::var("ALPACA_API_KEY")
        .map_err(|_| "ALPACA_API_KEY and ALPACA_SECRET_KEY must be set")?;
    let secret_key = env::var("ALPACA_SECRET_KEY")
        .map_err(|_| "ALPACA_API_KEY and ALPACA_SECRET_KEY must be set")?;
    let paper = env::var("ALPACA_PAPER")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true);

    let trading_enabled = env::var("TRADING_ENABLED")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);
    if !trading_enabled {
        warn!("trading is disabled, running dry-run only (set TRADING_ENABLED=true to enable)");
    }

    let watchlist: Vec<String> = env::var("WATCHLIST")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();
    if watchlist.is_empty() {
        warn!("WATCHLIST is empty, nothing will be evaluated");
    } else {
        info!(
            symbols = watchlist.len(),
            "watchlist: {}",
            watchlist.join(", ")
        );
    }

    let mut settings = Settings::default();
    settings.execution.dry_run = !trading_enabled;
    if let Some(minutes) = env::var("CHECK_INTERVAL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        settings.schedule.interval_minutes = minutes;
    }
    if let Ok(v) = env::var("MARKET_HOURS_ONLY") {
        settings.schedule.market_hours_only = v.to_lowercase() != "false";
    }

    // Fail fast: a bad configuration must never reach the first tick.
    settings.validate()?;

    let account_type = if paper { "PAPER" } else { "LIVE" };
    let client = Arc::new(AlpacaClient::new(api_key, secret_key, paper)?);
    info!("connected to Alpaca ({} trading)", account_type);

    let provider: Arc<dyn PriceHistoryProvider> = client.clone();
    let broker: Arc<dyn BrokerClient> = client;

    let interval = settings.schedule.interval_minutes;
    let market_hours_only = settings.schedule.market_hours_only;
    let mut engine = TickEngine::new(settings, watchlist, provider, broker);
    if let Some(concurrency) = env::var("WORKER_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        engine = engine.with_concurrency(concurrency);
    }
    let engine = Arc::new(engine);

    let run_once = env::var("RUN_ONCE")
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(false);
    if run_once {
        info!("RUN_ONCE set, executing a single tick");
        let (_tx, rx) = tokio::sync::watch::channel(false);
        let result = engine.run_tick(&rx).await;
        info!("run complete: {}", result.summary_line());
        return Ok(());
    }

    let scheduler = Arc::new(TradingScheduler::new(
        engine,
        interval,
        market_hours_only,
        MarketHours::default(),
    )?);
    info!(
        interval_minutes = interval,
        "scheduler running, press Ctrl+C to stop"
    );

    let runner = scheduler.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    signal::ctrl_c().await?;
    info!("shutdown requested, stopping scheduler...");
    scheduler.stop();
    handle.await?;

    info!("trader stopped");
    Ok(())
}
