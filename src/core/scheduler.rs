//! Interval-driven scheduler for the tick engine.
//!
//! Intervals that divide an hour or a day evenly run on a cron
//! schedule; anything else sleeps the exact interval between ticks.
//! A single periodic driver, not a worker pool; concurrency lives
//! inside the tick.

use crate::config::MarketHours;
use crate::core::engine::TickEngine;
use crate::error::EngineError;
use crate::models::run::RunResult;
use chrono::Utc;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

/// Observable lifecycle: Idle until started, then alternating
/// Waiting/Running until Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Waiting,
    Running,
    Stopped,
}

/// How the next tick time is derived.
///
/// Cron's `*/N` fields reset at the hour (or day) boundary, so only
/// intervals that divide it evenly tick on a uniform cadence there;
/// every other interval is a plain sleep of that length.
enum Cadence {
    Cron(Schedule),
    Fixed(Duration),
}

pub struct TradingScheduler {
    engine: Arc<TickEngine>,
    cadence: Cadence,
    market_hours_only: bool,
    market_hours: MarketHours,
    state: Arc<RwLock<SchedulerState>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl TradingScheduler {
    pub fn new(
        engine: Arc<TickEngine>,
        interval_minutes: u64,
        market_hours_only: bool,
        market_hours: MarketHours,
    ) -> Result<Self, EngineError> {
        let cadence = match interval_cron(interval_minutes) {
            Some(expr) => {
                let schedule =
                    Schedule::from_str(&expr).map_err(|source| EngineError::Schedule {
                        expr: expr.clone(),
                        source,
                    })?;
                info!(
                    interval_minutes = interval_minutes,
                    cron = %expr,
                    "scheduler configured: every {} minutes (cron: {})",
                    interval_minutes,
                    expr
                );
                Cadence::Cron(schedule)
            }
            None => {
                let minutes = interval_minutes.max(1);
                info!(
                    interval_minutes = minutes,
                    "scheduler configured: fixed {}-minute interval",
                    minutes
                );
                Cadence::Fixed(Duration::from_secs(minutes * 60))
            }
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            engine,
            cadence,
            market_hours_only,
            market_hours,
            state: Arc::new(RwLock::new(SchedulerState::Idle)),
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub async fn state(&self) -> SchedulerState {
        *self.state.read().await
    }

    /// Handle for requesting a stop from another task.
    pub fn shutdown_handle(&self) -> watch::Sender<bool> {
        self.shutdown_tx.clone()
    }

    /// Request a graceful stop: checked at tick boundaries and between
    /// symbols; an in-flight order submission completes first.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Drive the loop until stopped. Runs one tick immediately on
    /// startup, then follows the cadence.
    pub async fn run(&self) {
        let mut shutdown = self.shutdown_rx.clone();

        self.tick().await;

        loop {
            if *shutdown.borrow() {
                break;
            }
            *self.state.write().await = SchedulerState::Waiting;

            let Some(wait) = self.next_wait() else {
                warn!("schedule produced no upcoming tick, stopping");
                break;
            };

            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        break;
                    }
                }
            }
            if *shutdown.borrow() {
                break;
            }

            self.tick().await;
        }

        *self.state.write().await = SchedulerState::Stopped;
        info!("scheduler stopped");
    }

    fn next_wait(&self) -> Option<Duration> {
        match &self.cadence {
            Cadence::Cron(schedule) => {
                let next = schedule.upcoming(Utc).next()?;
                Some((next - Utc::now()).to_std().unwrap_or_default())
            }
            Cadence::Fixed(interval) => Some(*interval),
        }
    }

    fn session_open(&self, now: chrono::NaiveTime) -> bool {
        !self.market_hours_only || self.market_hours.contains(now)
    }

    /// One scheduled occurrence: skip outside market hours (the next
    /// occurrence is still honored), otherwise run the pipeline.
    async fn tick(&self) -> Option<RunResult> {
        let now = Utc::now().time();
        if !self.session_open(now) {
            info!(
                now_utc = %now.format("%H:%M"),
                "outside market hours, skipping tick"
            );
            return None;
        }

        *self.state.write().await = SchedulerState::Running;
        let result = self.engine.run_tick(&self.shutdown_rx).await;
        Some(result)
    }
}

/// Interval -> 6-field cron expression, minute cadence when the
/// interval divides an hour evenly, hour cadence when it is a whole
/// number of hours dividing a day evenly. Returns None for every other
/// interval; those tick on a fixed sleep instead.
fn interval_cron(interval_minutes: u64) -> Option<String> {
    let minutes = interval_minutes.max(1);
    if minutes < 60 && 60 % minutes == 0 {
        Some(format!("0 */{} * * * *", minutes))
    } else if minutes % 60 == 0 && minutes / 60 <= 24 && 24 % (minutes / 60) == 0 {
        Some(format!("0 0 */{} * * *", minutes / 60))
    } else {
        None
    }
}
