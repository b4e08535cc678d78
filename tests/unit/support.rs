//! Shared test fixtures: canned candle windows and in-memory
//! provider/broker fakes.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tradewind::config::Timeframe;
use tradewind::error::{BrokerError, DataError};
use tradewind::models::account::AccountSnapshot;
use tradewind::models::candle::Candle;
use tradewind::models::order::{OrderResult, PositionIntent};
use tradewind::services::broker::BrokerClient;
use tradewind::services::market_data::PriceHistoryProvider;

/// Daily candles from a close series, high/low hugging the close.
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 21, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: start + Duration::days(i as i64),
            open: close,
            high: close + 0.5,
            low: close - 0.5,
            close,
            volume: 1_000_000.0,
        })
        .collect()
}

/// A window whose last close sits well below the lower Bollinger band
/// (and deep oversold for RSI): flat, then a crash on the final bar.
pub fn crash_window(len: usize) -> Vec<Candle> {
    let mut closes = vec![100.0; len - 1];
    closes.push(60.0);
    candles_from_closes(&closes)
}

/// Flat window: every indicator stays silent.
pub fn flat_window(len: usize) -> Vec<Candle> {
    candles_from_closes(&vec![100.0; len])
}

pub fn snapshot(equity: f64, positions: &[(&str, f64)]) -> AccountSnapshot {
    AccountSnapshot {
        equity,
        cash: equity,
        buying_power: equity * 2.0,
        open_positions: positions
            .iter()
            .map(|(s, q)| (s.to_string(), *q))
            .collect(),
    }
}

/// Provider serving preset windows (or errors) per symbol.
#[derive(Default)]
pub struct StaticProvider {
    bars: HashMap<String, Vec<Candle>>,
    failures: HashMap<String, String>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Candle>) -> Self {
        self.bars.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_failure(mut self, symbol: &str, message: &str) -> Self {
        self.failures.insert(symbol.to_string(), message.to_string());
        self
    }
}

#[async_trait]
impl PriceHistoryProvider for StaticProvider {
    async fn fetch_bars(
        &self,
        symbol: &str,
        _timeframe: Timeframe,
        _lookback_days: u32,
    ) -> Result<Vec<Candle>, DataError> {
        if let Some(message) = self.failures.get(symbol) {
            return Err(DataError::Provider(message.clone()));
        }
        self.bars
            .get(symbol)
            .cloned()
            .ok_or_else(|| DataError::UnknownSymbol(symbol.to_string()))
    }
}

/// Failure kinds a [`MockBroker`] can be scripted with.
#[derive(Debug, Clone, Copy)]
pub enum FailKind {
    Transient,
    RateLimited,
    Rejected,
    Auth,
}

impl FailKind {
    fn to_error(self) -> BrokerError {
        match self {
            FailKind::Transient => BrokerError::Transient("connection reset".into()),
            FailKind::RateLimited => BrokerError::RateLimited("429".into()),
            FailKind::Rejected => BrokerError::Rejected("insufficient funds".into()),
            FailKind::Auth => BrokerError::AuthFailure("invalid keys".into()),
        }
    }
}

/// Scripted in-memory broker recording every submission.
pub struct MockBroker {
    snapshot: Mutex<AccountSnapshot>,
    pub submissions: Mutex<Vec<PositionIntent>>,
    submit_failures: Mutex<VecDeque<FailKind>>,
    account_failure: Mutex<Option<FailKind>>,
    order_seq: AtomicUsize,
    attempts: AtomicUsize,
}

impl MockBroker {
    pub fn new(snapshot: AccountSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            submissions: Mutex::new(Vec::new()),
            submit_failures: Mutex::new(VecDeque::new()),
            account_failure: Mutex::new(None),
            order_seq: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Queue failures consumed by successive submit calls; once the
    /// queue drains, submissions succeed.
    pub fn fail_submissions(&self, kinds: &[FailKind]) {
        self.submit_failures.lock().unwrap().extend(kinds.iter().copied());
    }

    pub fn fail_account(&self, kind: FailKind) {
        *self.account_failure.lock().unwrap() = Some(kind);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    /// Submit attempts, including scripted failures.
    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerClient for MockBroker {
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError> {
        if let Some(kind) = *self.account_failure.lock().unwrap() {
            return Err(kind.to_error());
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn list_positions(&self) -> Result<BTreeMap<String, f64>, BrokerError> {
        Ok(self.snapshot.lock().unwrap().open_positions.clone())
    }

    async fn submit_order(&self, intent: &PositionIntent) -> Result<OrderResult, BrokerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(kind) = self.submit_failures.lock().unwrap().pop_front() {
            return Err(kind.to_error());
        }
        self.submissions.lock().unwrap().push(intent.clone());
        let n = self.order_seq.fetch_add(1, Ordering::SeqCst);
        Ok(OrderResult {
            order_id: format!("ord-{n}"),
            status: "accepted".to_string(),
        })
    }
}
