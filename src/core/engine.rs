//! Per-tick pipeline: fetch account state once, then evaluate every
//! watchlist symbol through indicators, aggregation, risk and
//! execution, isolating per-symbol failures.

use crate::config::Settings;
use crate::error::{BrokerError, DataError};
use crate::execution::OrderExecutor;
use crate::models::account::AccountSnapshot;
use crate::models::run::{RunResult, SymbolOutcome};
use crate::risk::{PositionReservations, RiskGate, RiskVerdict};
use crate::services::broker::BrokerClient;
use crate::services::market_data::PriceHistoryProvider;
use crate::signals::engine::SignalEngine;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};
use tokio::time::{timeout, Duration};
use tracing::{error, info, warn};

const FETCH_TIMEOUT_SECS: u64 = 30;

pub struct TickEngine {
    settings: Arc<Settings>,
    watchlist: Vec<String>,
    provider: Arc<dyn PriceHistoryProvider>,
    broker: Arc<dyn BrokerClient>,
    concurrency: usize,
}

impl TickEngine {
    pub fn new(
        settings: Settings,
        watchlist: Vec<String>,
        provider: Arc<dyn PriceHistoryProvider>,
        broker: Arc<dyn BrokerClient>,
    ) -> Self {
        let concurrency = watchlist.len().max(1);
        Self {
            settings: Arc::new(settings),
            watchlist,
            provider,
            broker,
            concurrency,
        }
    }

    /// Cap the number of symbols evaluated in parallel (default is one
    /// worker per watchlist symbol).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run one full tick across the watchlist.
    ///
    /// Per-symbol failures are recorded and do not stop the others; an
    /// auth failure stops symbols that have not started yet, since it
    /// would invalidate every later broker call in this tick. The
    /// result finalizes only after every started symbol completes.
    pub async fn run_tick(&self, shutdown: &watch::Receiver<bool>) -> RunResult {
        let mut result = RunResult::default();

        info!(
            symbols = self.watchlist.len(),
            "tick started: checking {} symbols",
            self.watchlist.len()
        );

        if self.watchlist.is_empty() {
            warn!("watchlist is empty, nothing to check");
            return result;
        }

        // One snapshot per tick, never cached across ticks.
        let snapshot = match timeout(
            Duration::from_secs(FETCH_TIMEOUT_SECS),
            self.broker.get_account(),
        )
        .await
        {
            Ok(Ok(snapshot)) => Arc::new(snapshot),
            Ok(Err(e)) => {
                error!(error = %e, "account snapshot failed, aborting tick: {}", e);
                result.aborted = Some(e.to_string());
                return result;
            }
            Err(_) => {
                let reason = format!("account snapshot timed out after {FETCH_TIMEOUT_SECS}s");
                error!("{}", reason);
                result.aborted = Some(reason);
                return result;
            }
        };

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let reservations = Arc::new(PositionReservations::new());
        let executor = Arc::new(OrderExecutor::new(
            self.broker.clone(),
            self.settings.execution.dry_run,
        ));
        let auth_failed = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::with_capacity(self.watchlist.len());
        for symbol in &self.watchlist {
            // Cooperative cancellation between symbols; in-flight
            // submissions are left to complete.
            if *shutdown.borrow() {
                result.aborted = Some("shutdown requested".to_string());
                break;
            }
            if auth_failed.load(Ordering::SeqCst) {
                break;
            }

            let symbol = symbol.clone();
            let settings = self.settings.clone();
            let provider = self.provider.clone();
            let snapshot = snapshot.clone();
            let reservations = reservations.clone();
            let executor = executor.clone();
            let semaphore = semaphore.clone();
            let auth_failed = auth_failed.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return None,
                };
                if auth_failed.load(Ordering::SeqCst) {
                    return None;
                }
                let outcome = process_symbol(
                    &symbol,
                    &settings,
                    provider.as_ref(),
                    &snapshot,
                    &reservations,
                    &executor,
                    &auth_failed,
                )
                .await;
                Some((symbol, outcome))
            }));
        }

        for handle in handles {
            match handle.await {
                Ok(Some((symbol, outcome))) => result.record(&symbol, outcome),
                Ok(None) => {}
                Err(e) => error!(error = %e, "symbol task panicked: {}", e),
            }
        }

        if auth_failed.load(Ordering::SeqCst) && result.aborted.is_none() {
            result.aborted = Some("broker authentication failed".to_string());
        }

        info!(
            evaluated = result.summary.symbols_evaluated,
            buys = result.summary.buy_signals,
            sells = result.summary.sell_signals,
            trades = result.summary.trades_executed,
            errors = result.summary.errors,
            "tick summary: {}",
            result.summary_line()
        );

        result
    }
}

/// One symbol's trip through the pipeline. Errors are turned into a
/// recorded outcome here; only the auth flag escapes sideways.
async fn process_symbol(
    symbol: &str,
    settings: &Settings,
    provider: &dyn PriceHistoryProvider,
    snapshot: &AccountSnapshot,
    reservations: &PositionReservations,
    executor: &OrderExecutor,
    auth_failed: &AtomicBool,
) -> SymbolOutcome {
    let bars = match timeout(
        Duration::from_secs(FETCH_TIMEOUT_SECS),
        provider.fetch_bars(symbol, settings.data.timeframe, settings.data.lookback_days),
    )
    .await
    {
        Ok(Ok(bars)) => bars,
        Ok(Err(e)) => {
            warn!(symbol = symbol, error = %e, "data fetch failed for {}: {}", symbol, e);
            return SymbolOutcome::failed(e.to_string());
        }
        Err(_) => {
            let e = DataError::Timeout(FETCH_TIMEOUT_SECS);
            warn!(symbol = symbol, error = %e, "data fetch failed for {}: {}", symbol, e);
            return SymbolOutcome::failed(e.to_string());
        }
    };

    let decision = SignalEngine::evaluate(symbol, &bars, settings);
    info!(
        symbol = symbol,
        action = %decision.action,
        strength = decision.strength,
        "{}: {} (strength {:.1}%)",
        symbol,
        decision.action,
        decision.strength * 100.0
    );

    let price = bars.last().map(|c| c.close).unwrap_or(0.0);
    let verdict = RiskGate::evaluate(
        &decision,
        snapshot,
        price,
        &settings.execution,
        reservations,
    )
    .await;

    match verdict {
        RiskVerdict::Hold => {
            SymbolOutcome::succeeded(decision, crate::models::order::ExecutionOutcome::Held)
        }
        RiskVerdict::Suppressed { reason } => SymbolOutcome::succeeded(
            decision,
            crate::models::order::ExecutionOutcome::Suppressed { reason },
        ),
        RiskVerdict::Approved(intent) => match executor.execute(&intent).await {
            Ok(outcome) => SymbolOutcome::succeeded(decision, outcome),
            Err(e) => {
                if matches!(e, BrokerError::AuthFailure(_)) {
                    auth_failed.store(true, Ordering::SeqCst);
                }
                error!(symbol = symbol, error = %e, "execution failed for {}: {}", symbol, e);
                SymbolOutcome::failed_after_decision(decision, e.to_string())
            }
        },
    }
}
