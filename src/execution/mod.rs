//! Order executor: dry-run recording, live submission with bounded
//! retries, and per-run idempotency.

use crate::error::BrokerError;
use crate::models::order::{ExecutionOutcome, PositionIntent};
use crate::services::broker::BrokerClient;
use backon::{ExponentialBuilder, Retryable};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

const RETRY_MIN_DELAY_MS: u64 = 500;
/// Retries after the first attempt; 3 attempts total.
const RETRY_MAX_TIMES: usize = 2;

/// Submits intents for one run. Construct a fresh executor per tick so
/// the idempotency record stays scoped to the run.
pub struct OrderExecutor {
    broker: Arc<dyn BrokerClient>,
    dry_run: bool,
    submitted: Mutex<HashSet<String>>,
}

impl OrderExecutor {
    pub fn new(broker: Arc<dyn BrokerClient>, dry_run: bool) -> Self {
        Self {
            broker,
            dry_run,
            submitted: Mutex::new(HashSet::new()),
        }
    }

    /// Submit one intent.
    ///
    /// Transient and rate-limit failures are retried with exponential
    /// backoff up to the attempt ceiling; whatever error survives is
    /// returned for the caller to classify (per-symbol vs. run-fatal).
    pub async fn execute(&self, intent: &PositionIntent) -> Result<ExecutionOutcome, BrokerError> {
        // Idempotency guard: the same decision submitted twice within
        // one run must reach the broker at most once.
        {
            let mut submitted = self.submitted.lock().await;
            if !submitted.insert(intent.idempotency_key.clone()) {
                warn!(
                    symbol = %intent.symbol,
                    idempotency_key = %intent.idempotency_key,
                    "duplicate intent for {} suppressed",
                    intent.symbol
                );
                return Ok(ExecutionOutcome::Duplicate);
            }
        }

        let description = intent.describe();

        if self.dry_run {
            info!(symbol = %intent.symbol, "[DRY RUN] would submit: {}", description);
            return Ok(ExecutionOutcome::DryRun { description });
        }

        let broker = self.broker.clone();
        let result = match (|| async { broker.submit_order(intent).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(RETRY_MIN_DELAY_MS))
                    .with_max_times(RETRY_MAX_TIMES),
            )
            .when(BrokerError::is_retryable)
            .notify(|err: &BrokerError, dur: Duration| {
                warn!(
                    error = %err,
                    retry_in_ms = dur.as_millis() as u64,
                    "broker call failed, retrying: {}",
                    err
                );
            })
            .await
        {
            Ok(result) => result,
            Err(e) => {
                // The key marks orders the broker accepted; a failed
                // submission gives it back so the decision stays
                // submittable within this run.
                self.submitted.lock().await.remove(&intent.idempotency_key);
                return Err(e);
            }
        };

        info!(
            symbol = %intent.symbol,
            order_id = %result.order_id,
            status = %result.status,
            "order submitted: {} | id={} status={}",
            description,
            result.order_id,
            result.status
        );
        Ok(ExecutionOutcome::Submitted {
            report: result.into(),
        })
    }
}
