//! Scheduler tests that drive full ticks through in-memory fakes

use crate::support::{crash_window, snapshot, FailKind, MockBroker, StaticProvider};
use std::sync::Arc;
use std::time::Duration;
use tradewind::config::{MarketHours, Settings};
use tradewind::core::{SchedulerState, TickEngine, TradingScheduler};

fn live_buy_settings() -> Settings {
    let mut cfg = Settings::default();
    cfg.indicators.sma.enabled = false;
    cfg.indicators.macd.enabled = false;
    cfg.signal.min_agree = 2;
    cfg.execution.dry_run = false;
    cfg
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn an_auth_aborted_tick_does_not_stop_the_next_one() {
    let provider = Arc::new(StaticProvider::new().with_bars("AAPL", crash_window(60)));
    let broker = Arc::new(MockBroker::new(snapshot(10_000.0, &[])));
    // The first tick's submission fails auth and aborts that tick.
    broker.fail_submissions(&[FailKind::Auth]);

    let engine = Arc::new(TickEngine::new(
        live_buy_settings(),
        vec!["AAPL".into()],
        provider,
        broker.clone(),
    ));
    let scheduler =
        Arc::new(TradingScheduler::new(engine, 1, false, MarketHours::default()).unwrap());

    let runner = scheduler.clone();
    let handle = tokio::spawn(async move { runner.run().await });

    // The schedule must still drive a later tick whose submission
    // goes through.
    for _ in 0..50 {
        if broker.submission_count() >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_secs(60)).await;
    }

    scheduler.stop();
    handle.await.unwrap();

    assert!(
        broker.attempt_count() >= 2,
        "expected a retry tick after the auth abort, saw {} attempts",
        broker.attempt_count()
    );
    assert!(broker.submission_count() >= 1);
    assert_eq!(broker.submissions.lock().unwrap()[0].symbol, "AAPL");
    assert_eq!(scheduler.state().await, SchedulerState::Stopped);
}
