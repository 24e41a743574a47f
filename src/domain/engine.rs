//! Strategy engine: signal gating, the single-position lifecycle, and the
//! capital ledger.
//!
//! The engine owns the one open-position slot and the append-only trade log.
//! Capital changes only in [`StrategyEngine::close_position`]; daily counters
//! reset exactly once when the observed date advances past the last recorded
//! trade date. The backtest loop and the live poller drive the same engine.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::config::StrategyConfig;
use crate::domain::detector;
use crate::domain::indicator::FeatureRow;
use crate::domain::position::{CloseReason, Position, Trade};
use crate::domain::risk::{self, LIQUIDATION_BUFFER};
use crate::domain::signal::{Direction, Signal};

/// Persistable engine state, everything except configuration. Initial
/// capital is taken from configuration on restore, not from the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub capital: f64,
    pub position: Option<Position>,
    pub trades: Vec<Trade>,
    pub daily_pnl: f64,
    pub daily_trade_count: u32,
    pub last_trade_date: Option<NaiveDate>,
}

pub struct StrategyEngine {
    config: StrategyConfig,
    capital: f64,
    initial_capital: f64,
    position: Option<Position>,
    trades: Vec<Trade>,
    daily_pnl: f64,
    daily_trade_count: u32,
    last_trade_date: Option<NaiveDate>,
}

impl StrategyEngine {
    pub fn new(config: StrategyConfig) -> Self {
        let capital = config.initial_capital;
        StrategyEngine {
            config,
            capital,
            initial_capital: capital,
            position: None,
            trades: Vec::new(),
            daily_pnl: 0.0,
            daily_trade_count: 0,
            last_trade_date: None,
        }
    }

    /// Rebuild an engine from persisted state. Configuration is supplied
    /// fresh so parameter changes between sessions take effect.
    pub fn from_snapshot(config: StrategyConfig, snapshot: EngineSnapshot) -> Self {
        let initial_capital = config.initial_capital;
        StrategyEngine {
            config,
            capital: snapshot.capital,
            initial_capital,
            position: snapshot.position,
            trades: snapshot.trades,
            daily_pnl: snapshot.daily_pnl,
            daily_trade_count: snapshot.daily_trade_count,
            last_trade_date: snapshot.last_trade_date,
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            capital: self.capital,
            position: self.position.clone(),
            trades: self.trades.clone(),
            daily_pnl: self.daily_pnl,
            daily_trade_count: self.daily_trade_count,
            last_trade_date: self.last_trade_date,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn daily_pnl(&self) -> f64 {
        self.daily_pnl
    }

    pub fn daily_trade_count(&self) -> u32 {
        self.daily_trade_count
    }

    /// Account value marking any open position to `current_price`.
    pub fn equity(&self, current_price: f64) -> f64 {
        match &self.position {
            Some(position) => self.capital + position.price_pnl(current_price),
            None => self.capital,
        }
    }

    /// Daily-limit gate. Rolls the daily counters over when `date` has
    /// advanced past the last trade date, then refuses once the trade count
    /// or loss limit for the day is spent.
    pub fn can_trade(&mut self, date: NaiveDate) -> bool {
        if let Some(last) = self.last_trade_date {
            if last != date {
                self.daily_trade_count = 0;
                self.daily_pnl = 0.0;
                self.last_trade_date = Some(date);
            }
        }

        if self.daily_trade_count >= self.config.max_trades_per_day {
            return false;
        }
        if self.daily_pnl < -(self.config.daily_loss_limit * self.capital) {
            return false;
        }
        true
    }

    /// Gate the daily limits, then run pattern detection at `index`.
    pub fn check_signal(&mut self, rows: &[FeatureRow], index: usize) -> Option<Signal> {
        if index < detector::MIN_HISTORY || index >= rows.len() {
            return None;
        }
        if !self.can_trade(rows[index].date()) {
            return None;
        }
        detector::detect(rows, index)
    }

    /// Open a position from a signal. Fails (state unchanged) when a
    /// position is already held or the computed size is not positive.
    pub fn open_position(&mut self, signal: &Signal, timestamp: NaiveDateTime) -> bool {
        if self.position.is_some() {
            return false;
        }

        let (stop_loss, take_profit) = risk::stop_levels(
            signal.price,
            signal.direction,
            signal.atr,
            self.config.stop_atr_multiplier,
            self.config.target_atr_multiplier,
        );
        let size = risk::position_size(
            self.capital,
            self.config.risk_per_trade,
            signal.confidence,
            signal.price,
            stop_loss,
            self.config.leverage,
        );
        if size <= 0.0 {
            return false;
        }

        let liquidation_price =
            risk::liquidation_price(signal.price, signal.direction, self.config.leverage);

        self.position = Some(Position {
            direction: signal.direction,
            entry_price: signal.price,
            size,
            stop_loss,
            take_profit,
            liquidation_price,
            entry_time: timestamp,
            entry_capital: self.capital,
            confidence: signal.confidence,
            pattern: signal.pattern,
            trailing_stop: None,
        });
        self.daily_trade_count += 1;
        self.last_trade_date = Some(timestamp.date());
        true
    }

    /// Exit decision for the open position, in priority order: liquidation,
    /// trailing stop, static stop/target. Tightens the trailing stop as a
    /// side effect once the activation threshold is reached.
    pub fn evaluate_exit(&mut self, current_price: f64, current_atr: f64) -> Option<CloseReason> {
        let position = self.position.as_mut()?;

        let liquidated = match position.direction {
            Direction::Long => current_price <= position.liquidation_price,
            Direction::Short => current_price >= position.liquidation_price,
        };
        if liquidated {
            return Some(CloseReason::Liquidation);
        }

        let pnl_pct = position.unrealized_pnl_pct(current_price);
        if current_atr > 0.0 && pnl_pct > self.config.trailing_activation_pct {
            let offset = current_atr * self.config.stop_atr_multiplier * 0.75;
            match position.direction {
                Direction::Long => {
                    let candidate = current_price - offset;
                    if position.trailing_stop.is_none_or(|stored| candidate > stored) {
                        position.trailing_stop = Some(candidate);
                    }
                    if let Some(stored) = position.trailing_stop {
                        if current_price <= stored {
                            return Some(CloseReason::TrailingStop);
                        }
                    }
                }
                Direction::Short => {
                    let candidate = current_price + offset;
                    if position.trailing_stop.is_none_or(|stored| candidate < stored) {
                        position.trailing_stop = Some(candidate);
                    }
                    if let Some(stored) = position.trailing_stop {
                        if current_price >= stored {
                            return Some(CloseReason::TrailingStop);
                        }
                    }
                }
            }
        }

        match position.direction {
            Direction::Long => {
                if current_price <= position.stop_loss {
                    return Some(CloseReason::StopLoss);
                }
                if current_price >= position.take_profit {
                    return Some(CloseReason::TakeProfit);
                }
            }
            Direction::Short => {
                if current_price >= position.stop_loss {
                    return Some(CloseReason::StopLoss);
                }
                if current_price <= position.take_profit {
                    return Some(CloseReason::TakeProfit);
                }
            }
        }

        None
    }

    /// Close the open position and settle P&L into capital. A liquidation
    /// forfeits the full margin buffer regardless of the exit price. No-op
    /// when flat.
    pub fn close_position(
        &mut self,
        exit_price: f64,
        timestamp: NaiveDateTime,
        reason: CloseReason,
    ) -> Option<Trade> {
        let position = self.position.take()?;

        let pnl = if reason == CloseReason::Liquidation {
            -position.entry_capital * LIQUIDATION_BUFFER
        } else {
            position.price_pnl(exit_price)
        };

        self.capital += pnl;
        self.daily_pnl += pnl;

        let trade = Trade {
            entry_time: position.entry_time,
            exit_time: timestamp,
            direction: position.direction,
            entry_price: position.entry_price,
            exit_price,
            size: position.size,
            pnl,
            pnl_percent: pnl / position.entry_capital * 100.0,
            reason,
            pattern: position.pattern,
        };
        self.trades.push(trade.clone());
        Some(trade)
    }
}
