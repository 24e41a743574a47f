//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line, seeded with the SMA of the first
//! signal-period line values
//! Histogram = MACD Line - Signal Line
//!
//! Warmup: (slow - 1) + (signal - 1) values are None.

use super::ema::ema;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdPoint {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// MACD over a close series. Output is aligned with the input. Requires
/// fast < slow to be meaningful; enforced upstream by config validation.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> Vec<Option<MacdPoint>> {
    if fast == 0 || slow == 0 || signal_period == 0 {
        return vec![None; closes.len()];
    }

    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line_warmup = slow.saturating_sub(1);
    let mut line: Vec<f64> = vec![0.0; closes.len()];
    for i in line_warmup..closes.len() {
        // Both EMAs are defined once the slow warm-up has passed.
        if let (Some(f), Some(s)) = (ema_fast[i], ema_slow[i]) {
            line[i] = f - s;
        }
    }

    let k = 2.0 / (signal_period as f64 + 1.0);
    let mut signal: Vec<f64> = vec![0.0; closes.len()];

    if line_warmup + signal_period <= closes.len() {
        let seed_end = line_warmup + signal_period;
        let mut signal_ema =
            line[line_warmup..seed_end].iter().sum::<f64>() / signal_period as f64;
        signal[seed_end - 1] = signal_ema;

        for i in seed_end..closes.len() {
            signal_ema = line[i] * k + signal_ema * (1.0 - k);
            signal[i] = signal_ema;
        }
    }

    let warmup = line_warmup + signal_period.saturating_sub(1);
    (0..closes.len())
        .map(|i| {
            if i >= warmup {
                Some(MacdPoint {
                    line: line[i],
                    signal: signal[i],
                    histogram: line[i] - signal[i],
                })
            } else {
                None
            }
        })
        .collect()
}
