//! Full tick pipeline against a mock Alpaca server

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::watch;
use tradewind::config::Settings;
use tradewind::core::TickEngine;
use tradewind::models::order::ExecutionOutcome;
use tradewind::models::signal::Action;
use tradewind::services::alpaca::AlpacaClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Daily bars ending in a crash, as the data API would serve them.
fn crash_bars_json(len: usize) -> Value {
    let bars: Vec<Value> = (0..len)
        .map(|i| {
            let close = if i == len - 1 { 60.0 } else { 100.0 };
            json!({
                "t": format!("2025-01-{:02}T21:00:00Z", (i % 28) + 1),
                "o": close, "h": close + 0.5, "l": close - 0.5,
                "c": close, "v": 1_000_000.0
            })
        })
        .collect();
    json!({ "bars": bars, "next_page_token": null })
}

async fn mount_trading_api(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "equity": "10000.00",
            "cash": "10000.00",
            "buying_power": "20000.00"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ord-1",
            "status": "accepted"
        })))
        .mount(server)
        .await;
}

fn buy_settings(dry_run: bool) -> Settings {
    let mut cfg = Settings::default();
    cfg.indicators.sma.enabled = false;
    cfg.indicators.macd.enabled = false;
    cfg.signal.min_agree = 2;
    cfg.execution.dry_run = dry_run;
    cfg
}

fn engine_against(server: &MockServer, settings: Settings) -> TickEngine {
    let client = Arc::new(
        AlpacaClient::with_base_urls("test-key", "test-secret", &server.uri(), &server.uri())
            .expect("client builds against mock server"),
    );
    TickEngine::new(settings, vec!["AAPL".into()], client.clone(), client)
}

#[tokio::test]
async fn a_live_tick_turns_a_crash_into_a_submitted_order() {
    let server = MockServer::start().await;
    mount_trading_api(&server).await;
    Mock::given(method("GET"))
        .and(path("/v2/stocks/AAPL/bars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crash_bars_json(25)))
        .mount(&server)
        .await;

    let (_tx, rx) = watch::channel(false);
    let result = engine_against(&server, buy_settings(false)).run_tick(&rx).await;

    assert!(result.aborted.is_none());
    assert_eq!(result.summary.buy_signals, 1);
    assert_eq!(result.summary.trades_executed, 1);

    let outcome = &result.per_symbol["AAPL"];
    assert_eq!(outcome.decision.as_ref().unwrap().action, Action::Buy);
    match &outcome.execution {
        Some(ExecutionOutcome::Submitted { report }) => {
            assert_eq!(report.order_id, "ord-1");
            assert_eq!(report.status, "accepted");
        }
        other => panic!("expected a submitted order, got {:?}", other),
    }

    let orders = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/v2/orders")
        .count();
    assert_eq!(orders, 1);
}

#[tokio::test]
async fn a_dry_run_tick_never_posts_an_order() {
    let server = MockServer::start().await;
    mount_trading_api(&server).await;
    Mock::given(method("GET"))
        .and(path("/v2/stocks/AAPL/bars"))
        .respond_with(ResponseTemplate::new(200).set_body_json(crash_bars_json(25)))
        .mount(&server)
        .await;

    let (_tx, rx) = watch::channel(false);
    let result = engine_against(&server, buy_settings(true)).run_tick(&rx).await;

    assert_eq!(result.summary.trades_executed, 1);
    assert!(matches!(
        result.per_symbol["AAPL"].execution,
        Some(ExecutionOutcome::DryRun { .. })
    ));
    let orders = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/v2/orders")
        .count();
    assert_eq!(orders, 0);
}

#[tokio::test]
async fn an_invalid_key_aborts_the_tick_at_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/account"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let (_tx, rx) = watch::channel(false);
    let result = engine_against(&server, buy_settings(false)).run_tick(&rx).await;

    assert!(result.aborted.is_some());
    assert!(result.per_symbol.is_empty());
}
