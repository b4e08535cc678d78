//! Alpaca REST adapter for the price-history and broker capabilities.
//!
//! Thin wrapper over the v2 trading and market-data APIs. HTTP status
//! codes are classified into the engine's error taxonomy here so the
//! executor only ever sees `BrokerError` variants.

use crate::config::Timeframe;
use crate::error::{BrokerError, DataError};
use crate::models::account::AccountSnapshot;
use crate::models::candle::Candle;
use crate::models::order::{OrderResult, OrderSide, OrderType, PositionIntent, TimeInForce};
use crate::services::broker::BrokerClient;
use crate::services::market_data::PriceHistoryProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use url::Url;

const PAPER_TRADING_URL: &str = "https://paper-api.alpaca.markets";
const LIVE_TRADING_URL: &str = "https://api.alpaca.markets";
const MARKET_DATA_URL: &str = "https://data.alpaca.markets";

const HEADER_KEY_ID: &str = "APCA-API-KEY-ID";
const HEADER_SECRET: &str = "APCA-API-SECRET-KEY";

const CALL_TIMEOUT_SECS: u64 = 30;

pub struct AlpacaClient {
    http: reqwest::Client,
    api_key: String,
    secret_key: String,
    trading_url: Url,
    data_url: Url,
}

impl AlpacaClient {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        paper: bool,
    ) -> Result<Self, BrokerError> {
        let trading = if paper { PAPER_TRADING_URL } else { LIVE_TRADING_URL };
        let client = Self::with_base_urls(api_key, secret_key, trading, MARKET_DATA_URL)?;
        info!(paper = paper, "Alpaca client initialized (paper={})", paper);
        Ok(client)
    }

    /// Construct against explicit base URLs (tests point this at a
    /// local mock server).
    pub fn with_base_urls(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        trading_url: &str,
        data_url: &str,
    ) -> Result<Self, BrokerError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(CALL_TIMEOUT_SECS))
            .build()
            .map_err(|e| BrokerError::Transient(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            trading_url: Url::parse(trading_url)
                .map_err(|e| BrokerError::Rejected(format!("invalid trading url: {e}")))?,
            data_url: Url::parse(data_url)
                .map_err(|e| BrokerError::Rejected(format!("invalid data url: {e}")))?,
        })
    }

    fn trading_endpoint(&self, path: &str) -> Result<Url, BrokerError> {
        self.trading_url
            .join(path)
            .map_err(|e| BrokerError::Rejected(format!("invalid endpoint {path}: {e}")))
    }

    async fn check_trading_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BrokerError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }
}

/// Map an HTTP status to the retry taxonomy.
///
/// 401 invalidates every later call in the tick; 429 backs off; other
/// 4xx are permanent for this order; 5xx are worth retrying.
fn classify_status(status: StatusCode, body: &str) -> BrokerError {
    match status {
        StatusCode::UNAUTHORIZED => BrokerError::AuthFailure(format!("{status}: {body}")),
        StatusCode::TOO_MANY_REQUESTS => BrokerError::RateLimited(format!("{status}: {body}")),
        s if s.is_client_error() => BrokerError::Rejected(format!("{status}: {body}")),
        _ => BrokerError::Transient(format!("{status}: {body}")),
    }
}

fn transport_error(e: reqwest::Error) -> BrokerError {
    if e.is_timeout() {
        BrokerError::Transient(format!("request timed out: {e}"))
    } else {
        BrokerError::Transient(e.to_string())
    }
}

fn parse_money(raw: &str, field: &str) -> Result<f64, BrokerError> {
    raw.parse()
        .map_err(|_| BrokerError::Transient(format!("unparseable {field} in response: '{raw}'")))
}

// Alpaca wire formats. Money and quantity fields arrive as strings.

#[derive(Debug, Deserialize)]
struct AccountResponse {
    equity: String,
    cash: String,
    buying_power: String,
}

#[derive(Debug, Deserialize)]
struct PositionResponse {
    symbol: String,
    qty: String,
}

#[derive(Debug, Serialize)]
struct OrderRequest<'a> {
    symbol: &'a str,
    qty: String,
    side: &'a str,
    #[serde(rename = "type")]
    order_type: &'a str,
    time_in_force: &'a str,
    client_order_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct BarsResponse {
    bars: Option<Vec<BarResponse>>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BarResponse {
    t: DateTime<Utc>,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[async_trait]
impl BrokerClient for AlpacaClient {
    async fn get_account(&self) -> Result<AccountSnapshot, BrokerError> {
        let url = self.trading_endpoint("/v2/account")?;
        let response = self
            .http
            .get(url)
            .header(HEADER_KEY_ID, &self.api_key)
            .header(HEADER_SECRET, &self.secret_key)
            .send()
            .await
            .map_err(transport_error)?;
        let response = self.check_trading_response(response).await?;
        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| BrokerError::Transient(format!("malformed account response: {e}")))?;

        Ok(AccountSnapshot {
            equity: parse_money(&account.equity, "equity")?,
            cash: parse_money(&account.cash, "cash")?,
            buying_power: parse_money(&account.buying_power, "buying_power")?,
            open_positions: self.list_positions().await?,
        })
    }

    async fn list_positions(&self) -> Result<BTreeMap<String, f64>, BrokerError> {
        let url = self.trading_endpoint("/v2/positions")?;
        let response = self
            .http
            .get(url)
            .header(HEADER_KEY_ID, &self.api_key)
            .header(HEADER_SECRET, &self.secret_key)
            .send()
            .await
            .map_err(transport_error)?;
        let response = self.check_trading_response(response).await?;
        let positions: Vec<PositionResponse> = response
            .json()
            .await
            .map_err(|e| BrokerError::Transient(format!("malformed positions response: {e}")))?;

        let mut held = BTreeMap::new();
        for p in positions {
            held.insert(p.symbol.clone(), parse_money(&p.qty, "qty")?);
        }
        Ok(held)
    }

    async fn submit_order(&self, intent: &PositionIntent) -> Result<OrderResult, BrokerError> {
        let url = self.trading_endpoint("/v2/orders")?;
        let request = OrderRequest {
            symbol: &intent.symbol,
            qty: intent.quantity.to_string(),
            side: match intent.side {
                OrderSide::Buy => "buy",
                OrderSide::Sell => "sell",
            },
            order_type: match intent.order_type {
                OrderType::Market => "market",
                OrderType::Limit => "limit",
            },
            time_in_force: match intent.time_in_force {
                TimeInForce::Day => "day",
                TimeInForce::Gtc => "gtc",
                TimeInForce::Ioc => "ioc",
            },
            client_order_id: &intent.idempotency_key,
        };

        let response = self
            .http
            .post(url)
            .header(HEADER_KEY_ID, &self.api_key)
            .header(HEADER_SECRET, &self.secret_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let response = self.check_trading_response(response).await?;
        let order: OrderResponse = response
            .json()
            .await
            .map_err(|e| BrokerError::Transient(format!("malformed order response: {e}")))?;

        debug!(
            symbol = %intent.symbol,
            order_id = %order.id,
            status = %order.status,
            "order accepted: {} ({})",
            order.id,
            order.status
        );
        Ok(OrderResult {
            order_id: order.id,
            status: order.status,
        })
    }
}

#[async_trait]
impl PriceHistoryProvider for AlpacaClient {
    async fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        lookback_days: u32,
    ) -> Result<Vec<Candle>, DataError> {
        let start = Utc::now() - Duration::days(lookback_days as i64);
        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self
                .data_url
                .join(&format!("/v2/stocks/{symbol}/bars"))
                .map_err(|e| DataError::Provider(e.to_string()))?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("timeframe", timeframe.as_str());
                query.append_pair("start", &start.to_rfc3339());
                query.append_pair("limit", "10000");
                if let Some(token) = &page_token {
                    query.append_pair("page_token", token);
                }
            }

            let response = self
                .http
                .get(url)
                .header(HEADER_KEY_ID, &self.api_key)
                .header(HEADER_SECRET, &self.secret_key)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        DataError::Timeout(CALL_TIMEOUT_SECS)
                    } else {
                        DataError::Provider(e.to_string())
                    }
                })?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(DataError::UnknownSymbol(symbol.to_string()));
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(DataError::Provider(format!("{status}: {body}")));
            }

            let page: BarsResponse = response
                .json()
                .await
                .map_err(|e| DataError::Provider(format!("malformed bars response: {e}")))?;

            bars.extend(page.bars.unwrap_or_default().into_iter().map(|b| Candle {
                timestamp: b.t,
                open: b.o,
                high: b.h,
                low: b.l,
                close: b.c,
                volume: b.v,
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        bars.sort_by_key(|c| c.timestamp);
        debug!(
            symbol = symbol,
            count = bars.len(),
            timeframe = timeframe.as_str(),
            "fetched {} {} bars for {}",
            bars.len(),
            timeframe.as_str(),
            symbol
        );
        Ok(bars)
    }
}
