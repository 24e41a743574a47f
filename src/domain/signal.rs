//! Entry signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// Which pattern produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    TrendPullback,
    BandBounce,
    BandRejection,
    Breakout,
    Breakdown,
    Momentum,
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Pattern::TrendPullback => "trend_pullback",
            Pattern::BandBounce => "bb_bounce",
            Pattern::BandRejection => "bb_rejection",
            Pattern::Breakout => "breakout",
            Pattern::Breakdown => "breakdown",
            Pattern::Momentum => "momentum",
        };
        write!(f, "{}", tag)
    }
}

/// A detected entry opportunity. Ephemeral: consumed by the engine's open
/// path or discarded at the end of the evaluation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub direction: Direction,
    pub price: f64,
    /// ATR at signal time, carried for stop and size computation.
    pub atr: f64,
    pub pattern: Pattern,
    /// In (0, 1]; scales the risk budget for the trade.
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Long.to_string(), "LONG");
        assert_eq!(Direction::Short.to_string(), "SHORT");
    }

    #[test]
    fn pattern_tags() {
        assert_eq!(Pattern::TrendPullback.to_string(), "trend_pullback");
        assert_eq!(Pattern::BandBounce.to_string(), "bb_bounce");
        assert_eq!(Pattern::BandRejection.to_string(), "bb_rejection");
        assert_eq!(Pattern::Breakout.to_string(), "breakout");
        assert_eq!(Pattern::Breakdown.to_string(), "breakdown");
        assert_eq!(Pattern::Momentum.to_string(), "momentum");
    }
}
