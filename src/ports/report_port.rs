//! Reporting port trait: trade events, live status, and end-of-run
//! summaries.

use chrono::NaiveDateTime;

use crate::domain::backtest::BacktestResult;
use crate::domain::performance::PerformanceSummary;
use crate::domain::position::{Position, Trade};

/// One polling cycle's market and account snapshot for the live agent.
#[derive(Debug, Clone)]
pub struct StatusUpdate<'a> {
    pub timestamp: NaiveDateTime,
    pub symbol: &'a str,
    pub interval: &'a str,
    pub leverage: f64,
    pub price: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub atr: f64,
    pub atr_pct: f64,
    pub volume_ratio: f64,
    pub momentum_3: f64,
    pub capital: f64,
    pub daily_trades: u32,
    pub max_daily_trades: u32,
    pub position: Option<&'a Position>,
    /// Session performance so far; None until a trade has closed.
    pub performance: Option<&'a PerformanceSummary>,
}

/// Sink for everything the drivers want a human to see. Both the backtest
/// loop and the live poller report through this.
pub trait ReportPort {
    fn trade_opened(&self, position: &Position);

    /// `capital` is the account balance after the close settled.
    fn trade_closed(&self, trade: &Trade, capital: f64);

    fn status(&self, update: &StatusUpdate);

    fn backtest_summary(&self, result: &BacktestResult);

    /// Printed when a live session ends; `summary` is None when no trades
    /// closed during the session.
    fn session_summary(
        &self,
        summary: Option<&PerformanceSummary>,
        capital: f64,
        initial_capital: f64,
    );
}
