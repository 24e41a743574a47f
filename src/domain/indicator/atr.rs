//! Average True Range with Wilder smoothing.
//!
//! TR[0] = high - low (no previous close); later TRs use
//! max(high - low, |high - prev_close|, |low - prev_close|).
//! Seed: SMA of the first n TRs, then ATR = (prev * (n-1) + TR) / n.
//!
//! Warmup: first (n - 1) values are None.

use crate::domain::candle::Candle;

/// ATR over a candle series. Output is aligned with the input.
pub fn atr(candles: &[Candle], period: usize) -> Vec<Option<f64>> {
    if period == 0 || candles.len() < period {
        return vec![None; candles.len()];
    }

    let mut true_ranges = Vec::with_capacity(candles.len());
    for (i, candle) in candles.iter().enumerate() {
        let tr = if i == 0 {
            candle.high - candle.low
        } else {
            candle.true_range(candles[i - 1].close)
        };
        true_ranges.push(tr);
    }

    let mut out = Vec::with_capacity(candles.len());
    let mut current = 0.0;

    for i in 0..candles.len() {
        if i < period - 1 {
            out.push(None);
        } else if i == period - 1 {
            current = true_ranges[..period].iter().sum::<f64>() / period as f64;
            out.push(Some(current));
        } else {
            current = (current * (period - 1) as f64 + true_ranges[i]) / period as f64;
            out.push(Some(current));
        }
    }

    out
}
