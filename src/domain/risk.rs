//! Risk-based sizing and protective levels.
//!
//! Stops are placed at ATR multiples from the entry, position size is derived
//! from the capital fraction at risk, and the liquidation price models the
//! exchange wiping 90% of margin before full consumption.

use crate::domain::signal::Direction;

/// Fraction of margin lost at liquidation.
pub const LIQUIDATION_BUFFER: f64 = 0.9;

/// Position size may not exceed this fraction of leveraged capital.
const MAX_POSITION_FRACTION: f64 = 0.5;

/// Stop-loss and take-profit prices for an entry. The target multiplier is
/// deliberately wider than the stop multiplier so winners pay for losers.
pub fn stop_levels(
    entry_price: f64,
    direction: Direction,
    atr: f64,
    stop_multiplier: f64,
    target_multiplier: f64,
) -> (f64, f64) {
    match direction {
        Direction::Long => (
            entry_price - atr * stop_multiplier,
            entry_price + atr * target_multiplier,
        ),
        Direction::Short => (
            entry_price + atr * stop_multiplier,
            entry_price - atr * target_multiplier,
        ),
    }
}

/// Size from the risked capital fraction, scaled by signal confidence and
/// leverage. A zero stop distance sizes to zero, which callers treat as
/// "do not open".
pub fn position_size(
    capital: f64,
    risk_per_trade: f64,
    confidence: f64,
    entry_price: f64,
    stop_loss: f64,
    leverage: f64,
) -> f64 {
    let risk_amount = capital * risk_per_trade * confidence;
    let stop_distance = (entry_price - stop_loss).abs();

    if stop_distance == 0.0 {
        return 0.0;
    }

    let size = (risk_amount / stop_distance) * leverage;
    let max_position = capital * leverage * MAX_POSITION_FRACTION;
    size.min(max_position)
}

/// Price at which the exchange force-closes the position.
pub fn liquidation_price(entry_price: f64, direction: Direction, leverage: f64) -> f64 {
    match direction {
        Direction::Long => entry_price * (1.0 - LIQUIDATION_BUFFER / leverage),
        Direction::Short => entry_price * (1.0 + LIQUIDATION_BUFFER / leverage),
    }
}
