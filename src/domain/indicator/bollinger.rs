//! Bollinger Bands with band-position percentage.
//!
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//! - %B: (close - lower) / (upper - lower), 0.5 when the band has zero width
//!
//! StdDev is the population standard deviation (divides by N, not N-1).
//! %B normally sits in [0, 1] but exceeds those bounds on extreme moves.
//!
//! Warmup: first (period - 1) values are None.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub percent_b: f64,
}

/// Bollinger bands over a close series. Output is aligned with the input.
pub fn bollinger(closes: &[f64], period: usize, std_dev: f64) -> Vec<Option<BollingerPoint>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let warmup = period - 1;
    let mut out = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        if i < warmup {
            out.push(None);
            continue;
        }

        let window = &closes[i + 1 - period..=i];
        let middle = window.iter().sum::<f64>() / period as f64;
        let variance = window
            .iter()
            .map(|c| {
                let diff = c - middle;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let deviation = variance.sqrt();

        let upper = middle + std_dev * deviation;
        let lower = middle - std_dev * deviation;
        let width = upper - lower;
        let percent_b = if width > 0.0 {
            (closes[i] - lower) / width
        } else {
            0.5
        };

        out.push(Some(BollingerPoint {
            upper,
            middle,
            lower,
            percent_b,
        }));
    }

    out
}
