//! Live paper-trading polling driver.
//!
//! Owns cadence, retry, and persistence around an I/O-free
//! [`StrategyEngine`]: each cycle fetches the trailing candle window,
//! recomputes indicators, evaluates the newest row, and saves state after
//! any open or close. Trade timestamps come from candle time, not the wall
//! clock, so a replayed window is evaluated identically offline.

use chrono::NaiveDateTime;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::domain::config::{PaperConfig, StrategyConfig};
use crate::domain::engine::StrategyEngine;
use crate::domain::error::CryptraderError;
use crate::domain::indicator::compute_features;
use crate::domain::performance::PerformanceSummary;
use crate::domain::position::CloseReason;
use crate::ports::data_port::LiveDataPort;
use crate::ports::report_port::{ReportPort, StatusUpdate};
use crate::ports::state_port::StatePort;

/// Cycles are skipped until at least this many candles come back.
const MIN_LIVE_CANDLES: usize = 100;

pub struct PaperTrader<'a> {
    engine: StrategyEngine,
    paper: PaperConfig,
    data: &'a dyn LiveDataPort,
    state: &'a dyn StatePort,
    report: &'a dyn ReportPort,
    stop: Arc<AtomicBool>,
    /// Close and timestamp of the newest candle from the last good cycle.
    last_seen: Option<(f64, NaiveDateTime)>,
}

impl<'a> PaperTrader<'a> {
    /// Builds the driver, resuming from persisted state when a snapshot
    /// exists. Configuration always comes from `config`, never the snapshot.
    pub fn new(
        config: StrategyConfig,
        paper: PaperConfig,
        data: &'a dyn LiveDataPort,
        state: &'a dyn StatePort,
        report: &'a dyn ReportPort,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, CryptraderError> {
        let engine = match state.load()? {
            Some(snapshot) => StrategyEngine::from_snapshot(config, snapshot),
            None => StrategyEngine::new(config),
        };

        Ok(Self {
            engine,
            paper,
            data,
            state,
            report,
            stop,
            last_seen: None,
        })
    }

    pub fn engine(&self) -> &StrategyEngine {
        &self.engine
    }

    /// Polls until the stop flag is raised or `iterations` cycles have run
    /// (None polls forever). Failed cycles count against the budget. On the
    /// way out any open position is closed as MANUAL_STOP and state is
    /// persisted.
    pub fn run(&mut self, iterations: Option<u64>) -> Result<(), CryptraderError> {
        let mut cycle: u64 = 0;

        while !self.stop.load(Ordering::Relaxed) {
            if let Some(budget) = iterations {
                if cycle >= budget {
                    break;
                }
            }
            cycle += 1;

            match self.poll_once() {
                Ok(true) => self.wait(self.paper.poll_interval_secs, iterations, cycle),
                Ok(false) => self.wait(self.paper.retry_delay_secs, iterations, cycle),
                Err(e) => {
                    eprintln!(
                        "warning: poll failed ({e}), retrying in {}s",
                        self.paper.retry_delay_secs
                    );
                    self.wait(self.paper.retry_delay_secs, iterations, cycle);
                }
            }
        }

        self.shutdown()
    }

    /// One polling cycle. Ok(false) means the window was too thin to act on.
    fn poll_once(&mut self) -> Result<bool, CryptraderError> {
        let config = self.engine.config().clone();
        let candles = self
            .data
            .fetch_latest(&config.symbol, &config.interval, self.paper.lookback)?;

        if candles.len() < MIN_LIVE_CANDLES {
            eprintln!(
                "warning: only {} candles returned, need {MIN_LIVE_CANDLES}",
                candles.len()
            );
            return Ok(false);
        }

        let rows = compute_features(&candles, &config);
        let Some(row) = rows.last() else {
            eprintln!("warning: no usable rows after indicator warmup");
            return Ok(false);
        };

        let price = row.candle.close;
        let time = row.candle.timestamp;
        self.last_seen = Some((price, time));

        if self.engine.position().is_some() {
            if let Some(reason) = self.engine.evaluate_exit(price, row.atr) {
                if let Some(trade) = self.engine.close_position(price, time, reason) {
                    self.report.trade_closed(&trade, self.engine.capital());
                    self.state.save(&self.engine.snapshot())?;
                }
            }
        }

        if self.engine.position().is_none() {
            if let Some(signal) = self.engine.check_signal(&rows, rows.len() - 1) {
                if self.engine.open_position(&signal, time) {
                    if let Some(position) = self.engine.position() {
                        self.report.trade_opened(position);
                    }
                    self.state.save(&self.engine.snapshot())?;
                }
            }
        }

        let performance = PerformanceSummary::compute(
            self.engine.trades(),
            self.engine.capital(),
            self.engine.initial_capital(),
        );
        self.report.status(&StatusUpdate {
            timestamp: time,
            symbol: &config.symbol,
            interval: &config.interval,
            leverage: config.leverage,
            price,
            rsi: row.rsi,
            macd: row.macd,
            macd_signal: row.macd_signal,
            atr: row.atr,
            atr_pct: row.atr_pct,
            volume_ratio: row.volume_ratio,
            momentum_3: row.momentum_3,
            capital: self.engine.capital(),
            daily_trades: self.engine.daily_trade_count(),
            max_daily_trades: self.engine.config().max_trades_per_day,
            position: self.engine.position(),
            performance: performance.as_ref(),
        });

        Ok(true)
    }

    /// Sleeps unless stopping or out of budget, so bounded runs and tests
    /// finish promptly.
    fn wait(&self, secs: u64, iterations: Option<u64>, cycle: u64) {
        if self.stop.load(Ordering::Relaxed) {
            return;
        }
        if let Some(budget) = iterations {
            if cycle >= budget {
                return;
            }
        }
        std::thread::sleep(Duration::from_secs(secs));
    }

    fn shutdown(&mut self) -> Result<(), CryptraderError> {
        if self.engine.position().is_some() {
            match self.last_seen {
                Some((price, time)) => {
                    if let Some(trade) =
                        self.engine
                            .close_position(price, time, CloseReason::ManualStop)
                    {
                        self.report.trade_closed(&trade, self.engine.capital());
                    }
                }
                None => {
                    // Never saw a price this session. The position stays in
                    // the state file and the next session resumes it.
                    eprintln!("warning: no price seen, leaving open position persisted");
                }
            }
        }

        self.state.save(&self.engine.snapshot())?;

        let performance = PerformanceSummary::compute(
            self.engine.trades(),
            self.engine.capital(),
            self.engine.initial_capital(),
        );
        self.report.session_summary(
            performance.as_ref(),
            self.engine.capital(),
            self.engine.initial_capital(),
        );
        Ok(())
    }
}
