//! Binance market data adapter.
//!
//! Fetches OHLCV klines from the public `/api/v3/klines` endpoint. No API key
//! is needed for market data. Each kline arrives as a heterogeneous JSON array
//! (millisecond open time, then stringified prices); only the first six
//! columns are kept.

use chrono::Utc;
use serde_json::Value;
use std::time::Duration;

use crate::domain::candle::Candle;
use crate::domain::error::CryptraderError;
use crate::ports::data_port::{DataPort, LiveDataPort};

const BASE_URL: &str = "https://api.binance.com";

/// Maximum klines Binance returns per request.
const MAX_LIMIT: usize = 1000;

const MS_PER_DAY: i64 = 86_400_000;

pub struct BinanceDataAdapter {
    client: reqwest::blocking::Client,
    days: u32,
}

impl BinanceDataAdapter {
    /// `days` bounds how far back [`DataPort::fetch_candles`] paginates.
    pub fn new(days: u32) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self { client, days }
    }

    /// One klines request. `start_ms` of `None` asks for the most recent
    /// candles up to `limit`.
    fn request_klines(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: Option<i64>,
        limit: usize,
    ) -> Result<Vec<Candle>, CryptraderError> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(start) = start_ms {
            params.push(("startTime", start.to_string()));
        }

        let response = self
            .client
            .get(format!("{BASE_URL}/api/v3/klines"))
            .query(&params)
            .send()
            .map_err(|e| CryptraderError::DataSource {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CryptraderError::DataSource {
                symbol: symbol.to_string(),
                reason: format!("HTTP {status}"),
            });
        }

        let payload: Vec<Vec<Value>> =
            response.json().map_err(|e| CryptraderError::DataSource {
                symbol: symbol.to_string(),
                reason: format!("unreadable klines response: {e}"),
            })?;

        parse_klines(&payload)
    }
}

impl DataPort for BinanceDataAdapter {
    fn fetch_candles(&self, symbol: &str, interval: &str) -> Result<Vec<Candle>, CryptraderError> {
        let mut start = Utc::now().timestamp_millis() - i64::from(self.days) * MS_PER_DAY;
        let mut candles = Vec::new();

        loop {
            let batch = self.request_klines(symbol, interval, Some(start), MAX_LIMIT)?;
            if batch.is_empty() {
                break;
            }
            let batch_len = batch.len();
            start = batch
                .last()
                .map(|c| c.timestamp.and_utc().timestamp_millis() + 1)
                .unwrap_or(start);
            candles.extend(batch);
            if batch_len < MAX_LIMIT {
                break;
            }
        }

        Ok(candles)
    }
}

impl LiveDataPort for BinanceDataAdapter {
    fn fetch_latest(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CryptraderError> {
        self.request_klines(symbol, interval, None, limit.min(MAX_LIMIT))
    }
}

fn malformed(reason: String) -> CryptraderError {
    CryptraderError::MalformedData {
        source_name: "binance klines".to_string(),
        reason,
    }
}

/// Kline columns: 0 open time (ms), 1 open, 2 high, 3 low, 4 close, 5 volume.
/// Prices and volume are JSON strings.
fn parse_klines(payload: &[Vec<Value>]) -> Result<Vec<Candle>, CryptraderError> {
    payload.iter().map(|kline| parse_kline(kline)).collect()
}

fn parse_kline(kline: &[Value]) -> Result<Candle, CryptraderError> {
    let open_time = kline
        .first()
        .and_then(Value::as_i64)
        .ok_or_else(|| malformed("missing open time".to_string()))?;
    let timestamp = chrono::DateTime::from_timestamp_millis(open_time)
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| malformed(format!("invalid open time: {open_time}")))?;

    Ok(Candle {
        timestamp,
        open: kline_price(kline, 1, "open")?,
        high: kline_price(kline, 2, "high")?,
        low: kline_price(kline, 3, "low")?,
        close: kline_price(kline, 4, "close")?,
        volume: kline_price(kline, 5, "volume")?,
    })
}

fn kline_price(kline: &[Value], index: usize, column: &str) -> Result<f64, CryptraderError> {
    let value = kline
        .get(index)
        .ok_or_else(|| malformed(format!("missing {column} column")))?;

    match value {
        Value::String(s) => s
            .parse()
            .map_err(|_| malformed(format!("bad {column} value '{s}'"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| malformed(format!("bad {column} value '{n}'"))),
        other => Err(malformed(format!("bad {column} value '{other}'"))),
    }
}
