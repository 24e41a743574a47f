//! Open-position and closed-trade records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::signal::{Direction, Pattern};

/// The single open position. At most one exists at a time; the engine owns
/// the slot and only trailing-stop updates mutate it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub direction: Direction,
    pub entry_price: f64,
    pub size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub liquidation_price: f64,
    pub entry_time: NaiveDateTime,
    /// Account capital at the moment of entry. Liquidation losses are
    /// computed against this, not against the live capital.
    pub entry_capital: f64,
    pub confidence: f64,
    pub pattern: Pattern,
    pub trailing_stop: Option<f64>,
}

impl Position {
    /// Unrealized return as a percentage of the entry price.
    pub fn unrealized_pnl_pct(&self, current_price: f64) -> f64 {
        match self.direction {
            Direction::Long => (current_price - self.entry_price) / self.entry_price * 100.0,
            Direction::Short => (self.entry_price - current_price) / self.entry_price * 100.0,
        }
    }

    /// Price-based P&L in account currency for an exit at `exit_price`.
    pub fn price_pnl(&self, exit_price: f64) -> f64 {
        match self.direction {
            Direction::Long => (exit_price - self.entry_price) * self.size,
            Direction::Short => (self.entry_price - exit_price) * self.size,
        }
    }
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    StopLoss,
    TakeProfit,
    TrailingStop,
    Liquidation,
    EndOfData,
    ManualStop,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CloseReason::StopLoss => "STOP_LOSS",
            CloseReason::TakeProfit => "TAKE_PROFIT",
            CloseReason::TrailingStop => "TRAILING_STOP",
            CloseReason::Liquidation => "LIQUIDATION",
            CloseReason::EndOfData => "END_OF_DATA",
            CloseReason::ManualStop => "MANUAL_STOP",
        };
        write!(f, "{label}")
    }
}

/// Immutable record of a closed position, appended to the trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub direction: Direction,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub pnl: f64,
    /// Realized P&L as a percentage of capital at entry.
    pub pnl_percent: f64,
    pub reason: CloseReason,
    pub pattern: Pattern,
}
