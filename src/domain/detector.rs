//! Four-pattern entry detection.
//!
//! Evaluates prioritized patterns against the feature sequence at one index
//! and returns at most one signal. First match wins; within each pattern the
//! long side is checked before the short side.
//!
//! Order: trend pullback, mean reversion at a band extreme, consolidation
//! breakout, plain momentum. Daily trade limits are the engine's concern;
//! this module is a pure read of the rows.

use crate::domain::indicator::FeatureRow;
use crate::domain::signal::{Direction, Pattern, Signal};

/// Rows of history required before any pattern is evaluated.
pub const MIN_HISTORY: usize = 5;

/// Evaluate all patterns at `index`. Returns None when there is not enough
/// preceding history or nothing sets up.
pub fn detect(rows: &[FeatureRow], index: usize) -> Option<Signal> {
    if index < MIN_HISTORY || index >= rows.len() {
        return None;
    }

    trend_pullback(rows, index)
        .or_else(|| mean_reversion(rows, index))
        .or_else(|| breakout(rows, index))
        .or_else(|| momentum(rows, index))
}

fn make_signal(row: &FeatureRow, direction: Direction, pattern: Pattern, confidence: f64) -> Signal {
    Signal {
        direction,
        price: row.candle.close,
        atr: row.atr,
        pattern,
        confidence,
    }
}

/// Context: established trend. Setup: price dipped against it. Trigger:
/// momentum turning back in trend direction.
fn trend_pullback(rows: &[FeatureRow], index: usize) -> Option<Signal> {
    let current = &rows[index];
    let prev = &rows[index - 1];
    let prev2 = &rows[index - 2];

    let uptrend_context = current.alignment_bull || current.ema_short > current.ema_long;
    let pullback_complete = prev2.candle.close < prev2.ema_short
        && prev.candle.close < prev.ema_short
        && current.candle.close > current.ema_short;
    let rsi_recovery = prev.rsi < 45.0 && current.rsi > 45.0;
    let macd_turning = current.macd_hist > prev.macd_hist;
    let bullish_momentum =
        current.price_change > 0.0 && current.candle.body() > current.candle.range() * 0.5;

    if uptrend_context && (pullback_complete || rsi_recovery) && (macd_turning || bullish_momentum) {
        return Some(make_signal(current, Direction::Long, Pattern::TrendPullback, 0.7));
    }

    let downtrend_context = current.alignment_bear || current.ema_short < current.ema_long;
    let rally_complete = prev2.candle.close > prev2.ema_short
        && prev.candle.close > prev.ema_short
        && current.candle.close < current.ema_short;
    let rsi_rejection = prev.rsi > 55.0 && current.rsi < 55.0;
    let macd_weakening = current.macd_hist < prev.macd_hist;
    let bearish_momentum =
        current.price_change < 0.0 && current.candle.body() > current.candle.range() * 0.5;

    if downtrend_context && (rally_complete || rsi_rejection) && (macd_weakening || bearish_momentum)
    {
        return Some(make_signal(current, Direction::Short, Pattern::TrendPullback, 0.7));
    }

    None
}

/// Band-extreme fade, taken only in a ranging market (neither alignment
/// flag set).
fn mean_reversion(rows: &[FeatureRow], index: usize) -> Option<Signal> {
    let current = &rows[index];

    let ranging = !current.alignment_bull && !current.alignment_bear;
    if !ranging {
        return None;
    }

    let at_lower_band = current.bb_percent_b < 0.15;
    let rsi_oversold = current.rsi < 35.0;
    let hammer = current.candle.lower_wick() > current.candle.body() * 1.5;

    if at_lower_band && rsi_oversold && (hammer || current.price_change > 0.0) {
        return Some(make_signal(current, Direction::Long, Pattern::BandBounce, 0.6));
    }

    let at_upper_band = current.bb_percent_b > 0.85;
    let rsi_overbought = current.rsi > 65.0;
    let shooting_star = current.candle.upper_wick() > current.candle.body() * 1.5;

    if at_upper_band && rsi_overbought && (shooting_star || current.price_change < 0.0) {
        return Some(make_signal(current, Direction::Short, Pattern::BandRejection, 0.6));
    }

    None
}

/// Range contraction resolved by a volume-backed close beyond the prior
/// extreme, with the MACD lines agreeing on direction.
fn breakout(rows: &[FeatureRow], index: usize) -> Option<Signal> {
    let current = &rows[index];

    // Trailing five rows, excluding the current one.
    let window = &rows[index - 5..index];
    let window_high = window.iter().map(|r| r.candle.high).fold(f64::MIN, f64::max);
    let window_low = window.iter().map(|r| r.candle.low).fold(f64::MAX, f64::min);
    let consolidating = window_high - window_low < current.atr * 3.0;
    if !consolidating {
        return None;
    }

    let volume_surge = current.volume_ratio > 1.5;
    if !volume_surge {
        return None;
    }

    // Prior extreme excludes the immediately preceding row as well.
    let prior = &rows[index - 5..index - 1];
    let prior_high = prior.iter().map(|r| r.candle.high).fold(f64::MIN, f64::max);
    let prior_low = prior.iter().map(|r| r.candle.low).fold(f64::MAX, f64::min);

    if current.candle.close > prior_high && current.macd > current.macd_signal {
        return Some(make_signal(current, Direction::Long, Pattern::Breakout, 0.8));
    }

    if current.candle.close < prior_low && current.macd < current.macd_signal {
        return Some(make_signal(current, Direction::Short, Pattern::Breakdown, 0.8));
    }

    None
}

/// Fallback: ride a single strong candle with volume and room in the RSI.
fn momentum(rows: &[FeatureRow], index: usize) -> Option<Signal> {
    let current = &rows[index];

    if current.volume_ratio <= 1.2 {
        return None;
    }

    let strong_green = current.candle.is_bullish()
        && current.candle.body() > current.candle.range() * 0.7
        && current.price_change > 0.5;
    let rsi_bullish = current.rsi > 40.0 && current.rsi < 70.0;
    let above_mid = current.candle.close > current.ema_mid;

    if strong_green && rsi_bullish && above_mid {
        return Some(make_signal(current, Direction::Long, Pattern::Momentum, 0.5));
    }

    let strong_red = current.candle.is_bearish()
        && current.candle.body() > current.candle.range() * 0.7
        && current.price_change < -0.5;
    let rsi_bearish = current.rsi > 30.0 && current.rsi < 60.0;
    let below_mid = current.candle.close < current.ema_mid;

    if strong_red && rsi_bearish && below_mid {
        return Some(make_signal(current, Direction::Short, Pattern::Momentum, 0.5));
    }

    None
}
