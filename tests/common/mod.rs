#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::path::PathBuf;
use tempfile::TempDir;

use cryptrader::adapters::csv_adapter;
use cryptrader::domain::backtest::BacktestResult;
use cryptrader::domain::candle::Candle;
use cryptrader::domain::config::PaperConfig;
use cryptrader::domain::engine::EngineSnapshot;
use cryptrader::domain::error::CryptraderError;
use cryptrader::domain::performance::PerformanceSummary;
use cryptrader::domain::position::{Position, Trade};
use cryptrader::ports::data_port::LiveDataPort;
use cryptrader::ports::report_port::{ReportPort, StatusUpdate};
use cryptrader::ports::state_port::StatePort;

/// Candle timestamps at 15-minute spacing from a fixed session start.
pub fn stamp(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + chrono::Duration::minutes(15 * i as i64)
}

pub fn candle(i: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        timestamp: stamp(i),
        open,
        high,
        low,
        close,
        volume: 1000.0,
    }
}

/// A market going nowhere. Fires no signals at default parameters.
pub fn flat_candles(count: usize) -> Vec<Candle> {
    (0..count)
        .map(|i| candle(i, 99.95, 100.05, 99.9, 100.0))
        .collect()
}

/// A slow grind up, a two-candle washout ending in a hammer at the lower
/// band, then a recovery through the profit target. Fires exactly one
/// band-bounce long at default parameters, closed at take-profit.
pub fn bounce_candles() -> Vec<Candle> {
    let mut candles = Vec::new();
    for i in 0..55 {
        let close = 100.0 + 0.02 * i as f64;
        candles.push(candle(i, close - 0.02, close + 0.03, close - 0.05, close));
    }
    // Washout candle, nearly all body so no bounce fires yet.
    candles.push(candle(55, 101.08, 101.1, 98.9, 99.0));
    // Hammer: small body, long lower wick, oversold and under the band.
    candles.push(candle(56, 99.0, 99.05, 96.5, 98.7));
    // Dip below entry, then the recovery to the target.
    candles.push(candle(57, 98.7, 98.75, 98.45, 98.5));
    candles.push(candle(58, 98.5, 99.95, 98.45, 99.9));
    candles.push(candle(59, 99.9, 100.35, 99.85, 100.3));
    candles
}

/// Writes candles to `name` under `dir` in the CSV layout the backtester
/// reads, returning the file path.
pub fn write_candle_csv(dir: &TempDir, name: &str, candles: &[Candle]) -> PathBuf {
    let path = dir.path().join(name);
    csv_adapter::write_candles(&path, candles).unwrap();
    path
}

/// Paper settings with no sleeping, for bounded test runs.
pub fn fast_paper(state_file: &str) -> PaperConfig {
    PaperConfig {
        poll_interval_secs: 0,
        retry_delay_secs: 0,
        lookback: 200,
        state_file: state_file.to_string(),
    }
}

/// Live feed serving the tail of a fixed series, or a canned failure.
pub struct MockLiveData {
    candles: Vec<Candle>,
    error: Option<String>,
}

impl MockLiveData {
    pub fn new() -> Self {
        Self {
            candles: Vec::new(),
            error: None,
        }
    }

    pub fn with_candles(mut self, candles: Vec<Candle>) -> Self {
        self.candles = candles;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl LiveDataPort for MockLiveData {
    fn fetch_latest(
        &self,
        symbol: &str,
        _interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CryptraderError> {
        if let Some(reason) = &self.error {
            return Err(CryptraderError::DataSource {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let start = self.candles.len().saturating_sub(limit);
        Ok(self.candles[start..].to_vec())
    }
}

/// In-memory state store with a save counter.
pub struct MemoryState {
    slot: RefCell<Option<EngineSnapshot>>,
    saves: RefCell<usize>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self {
            slot: RefCell::new(None),
            saves: RefCell::new(0),
        }
    }

    pub fn with_snapshot(snapshot: EngineSnapshot) -> Self {
        Self {
            slot: RefCell::new(Some(snapshot)),
            saves: RefCell::new(0),
        }
    }

    pub fn saves(&self) -> usize {
        *self.saves.borrow()
    }

    pub fn stored(&self) -> Option<EngineSnapshot> {
        self.slot.borrow().clone()
    }
}

impl StatePort for MemoryState {
    fn save(&self, snapshot: &EngineSnapshot) -> Result<(), CryptraderError> {
        *self.slot.borrow_mut() = Some(snapshot.clone());
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn load(&self) -> Result<Option<EngineSnapshot>, CryptraderError> {
        Ok(self.slot.borrow().clone())
    }
}

/// Report sink that keeps what it was told, for inspection.
pub struct RecordingReport {
    pub opened: RefCell<Vec<Position>>,
    pub closed: RefCell<Vec<Trade>>,
    pub statuses: RefCell<usize>,
}

impl RecordingReport {
    pub fn new() -> Self {
        Self {
            opened: RefCell::new(Vec::new()),
            closed: RefCell::new(Vec::new()),
            statuses: RefCell::new(0),
        }
    }
}

impl ReportPort for RecordingReport {
    fn trade_opened(&self, position: &Position) {
        self.opened.borrow_mut().push(position.clone());
    }

    fn trade_closed(&self, trade: &Trade, _capital: f64) {
        self.closed.borrow_mut().push(trade.clone());
    }

    fn status(&self, _update: &StatusUpdate) {
        *self.statuses.borrow_mut() += 1;
    }

    fn backtest_summary(&self, _result: &BacktestResult) {}

    fn session_summary(
        &self,
        _summary: Option<&PerformanceSummary>,
        _capital: f64,
        _initial_capital: f64,
    ) {
    }
}

/// Report sink that discards everything.
pub struct NullReport;

impl ReportPort for NullReport {
    fn trade_opened(&self, _position: &Position) {}
    fn trade_closed(&self, _trade: &Trade, _capital: f64) {}
    fn status(&self, _update: &StatusUpdate) {}
    fn backtest_summary(&self, _result: &BacktestResult) {}
    fn session_summary(
        &self,
        _summary: Option<&PerformanceSummary>,
        _capital: f64,
        _initial_capital: f64,
    ) {
    }
}
