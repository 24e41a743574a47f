//! Historical simulation loop.
//!
//! Replays a candle sequence through the strategy engine: each usable row
//! records an equity point, then exits are evaluated before new entries. A
//! position still open after the last candle is closed at the final close.

use chrono::NaiveDateTime;

use crate::domain::candle::Candle;
use crate::domain::config::StrategyConfig;
use crate::domain::engine::StrategyEngine;
use crate::domain::error::CryptraderError;
use crate::domain::indicator::compute_features;
use crate::domain::performance::PerformanceSummary;
use crate::domain::position::{CloseReason, Trade};
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub timestamp: NaiveDateTime,
    pub equity: f64,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub equity_curve: Vec<EquityPoint>,
    /// Worst peak-to-trough equity move, in percent (zero or negative).
    pub max_drawdown: f64,
    /// Close-reason tallies, most frequent first.
    pub exit_reasons: Vec<(CloseReason, usize)>,
    pub trades: Vec<Trade>,
    pub summary: Option<PerformanceSummary>,
}

/// Run the strategy over `candles`, reporting trades as they happen.
pub fn run_backtest(
    candles: &[Candle],
    config: &StrategyConfig,
    report: &dyn ReportPort,
) -> Result<BacktestResult, CryptraderError> {
    if candles.is_empty() {
        return Err(CryptraderError::NoData {
            symbol: config.symbol.clone(),
        });
    }

    let rows = compute_features(candles, config);
    if rows.is_empty() {
        return Err(CryptraderError::InsufficientData {
            symbol: config.symbol.clone(),
            candles: candles.len(),
            minimum: config.warmup() + 1,
        });
    }

    let mut engine = StrategyEngine::new(config.clone());
    let mut equity_curve = Vec::with_capacity(rows.len());

    for index in 0..rows.len() {
        let row = &rows[index];
        let price = row.candle.close;
        let time = row.candle.timestamp;

        equity_curve.push(EquityPoint {
            timestamp: time,
            equity: engine.equity(price),
        });

        if engine.position().is_some() {
            if let Some(reason) = engine.evaluate_exit(price, row.atr) {
                if let Some(trade) = engine.close_position(price, time, reason) {
                    report.trade_closed(&trade, engine.capital());
                }
            }
        }

        if engine.position().is_none() {
            if let Some(signal) = engine.check_signal(&rows, index) {
                if engine.open_position(&signal, time) {
                    if let Some(position) = engine.position() {
                        report.trade_opened(position);
                    }
                }
            }
        }
    }

    if engine.position().is_some() {
        let last = &rows[rows.len() - 1];
        if let Some(trade) = engine.close_position(
            last.candle.close,
            last.candle.timestamp,
            CloseReason::EndOfData,
        ) {
            report.trade_closed(&trade, engine.capital());
        }
    }

    let max_drawdown = max_drawdown_pct(&equity_curve);
    let exit_reasons = tally_exit_reasons(engine.trades());
    let summary =
        PerformanceSummary::compute(engine.trades(), engine.capital(), engine.initial_capital());

    Ok(BacktestResult {
        initial_capital: engine.initial_capital(),
        final_capital: engine.capital(),
        equity_curve,
        max_drawdown,
        exit_reasons,
        trades: engine.trades().to_vec(),
        summary,
    })
}

/// Largest percentage drop from a running equity peak.
fn max_drawdown_pct(curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0f64;
    for point in curve {
        peak = peak.max(point.equity);
        let drawdown = (point.equity - peak) / peak * 100.0;
        worst = worst.min(drawdown);
    }
    worst
}

fn tally_exit_reasons(trades: &[Trade]) -> Vec<(CloseReason, usize)> {
    let mut counts: Vec<(CloseReason, usize)> = Vec::new();
    for trade in trades {
        match counts.iter_mut().find(|(reason, _)| *reason == trade.reason) {
            Some((_, count)) => *count += 1,
            None => counts.push((trade.reason, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
