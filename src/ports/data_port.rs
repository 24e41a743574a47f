//! Market data access port traits.

use crate::domain::candle::Candle;
use crate::domain::error::CryptraderError;

/// Bulk historical access for simulation. How much history is available is
/// adapter configuration; candles come back oldest first.
pub trait DataPort {
    fn fetch_candles(&self, symbol: &str, interval: &str) -> Result<Vec<Candle>, CryptraderError>;
}

/// Rolling-window access for the live poller.
pub trait LiveDataPort {
    /// The most recent `limit` candles, oldest first. The last candle may
    /// still be forming.
    fn fetch_latest(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, CryptraderError>;
}
