//! Indicator derivation over a candle sequence.
//!
//! [`compute_features`] turns raw candles into [`FeatureRow`]s: each row
//! carries its candle plus every derived value the signal detector reads.
//! Rows where any indicator is still warming up are dropped, so the output
//! starts at the first fully-defined row and the detector can index it
//! without checking validity.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use atr::atr;
pub use bollinger::{bollinger, BollingerPoint};
pub use ema::ema;
pub use macd::{macd, MacdPoint};
pub use rsi::rsi;

use crate::domain::candle::Candle;
use crate::domain::config::StrategyConfig;
use chrono::NaiveDate;

/// One candle augmented with every derived indicator value.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub candle: Candle,
    pub ema_short: f64,
    pub ema_mid: f64,
    pub ema_long: f64,
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub bb_percent_b: f64,
    pub atr: f64,
    pub atr_pct: f64,
    pub volume_ratio: f64,
    pub swing_high: f64,
    pub swing_low: f64,
    pub price_change: f64,
    pub momentum_3: f64,
    pub alignment_bull: bool,
    pub alignment_bear: bool,
}

impl FeatureRow {
    pub fn date(&self) -> NaiveDate {
        self.candle.timestamp.date()
    }
}

/// Derive the full feature sequence from raw candles, dropping the leading
/// warm-up rows. Returns an empty vector when the input is shorter than the
/// warm-up window. Pure function of its inputs.
pub fn compute_features(candles: &[Candle], config: &StrategyConfig) -> Vec<FeatureRow> {
    if candles.is_empty() {
        return Vec::new();
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let volumes: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let ema_short = ema(&closes, config.ema_short);
    let ema_mid = ema(&closes, config.ema_mid);
    let ema_long = ema(&closes, config.ema_long);
    let rsi_values = rsi(&closes, config.rsi_period);
    let macd_values = macd(&closes, config.ema_short, config.ema_mid, config.macd_signal);
    let bollinger_values = bollinger(&closes, config.bb_period, config.bb_std_dev);
    let atr_values = atr(candles, config.atr_period);
    let volume_sma = sma(&volumes, config.volume_window);
    let (swing_highs, swing_lows) = swing_extremes(candles, config.swing_window);

    let defined = |i: usize| {
        ema_short[i].is_some()
            && ema_mid[i].is_some()
            && ema_long[i].is_some()
            && rsi_values[i].is_some()
            && macd_values[i].is_some()
            && bollinger_values[i].is_some()
            && atr_values[i].is_some()
            && volume_sma[i].is_some()
            && swing_highs[i].is_some()
            && i >= 3
    };

    let Some(first) = (0..candles.len()).find(|&i| defined(i)) else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(candles.len() - first);
    for i in first..candles.len() {
        let candle = &candles[i];
        let macd_point = macd_values[i].unwrap_or(MacdPoint {
            line: 0.0,
            signal: 0.0,
            histogram: 0.0,
        });
        let bb = bollinger_values[i].unwrap_or(BollingerPoint {
            upper: 0.0,
            middle: 0.0,
            lower: 0.0,
            percent_b: 0.5,
        });
        let atr_value = atr_values[i].unwrap_or(0.0);
        let sma_value = volume_sma[i].unwrap_or(0.0);
        // Zero average volume reads as "no volume information": the ratio
        // is 0 so no volume-gated pattern can fire.
        let volume_ratio = if sma_value > 0.0 {
            candle.volume / sma_value
        } else {
            0.0
        };

        let short = ema_short[i].unwrap_or(0.0);
        let mid = ema_mid[i].unwrap_or(0.0);
        let long = ema_long[i].unwrap_or(0.0);

        rows.push(FeatureRow {
            candle: candle.clone(),
            ema_short: short,
            ema_mid: mid,
            ema_long: long,
            rsi: rsi_values[i].unwrap_or(0.0),
            macd: macd_point.line,
            macd_signal: macd_point.signal,
            macd_hist: macd_point.histogram,
            bb_upper: bb.upper,
            bb_middle: bb.middle,
            bb_lower: bb.lower,
            bb_percent_b: bb.percent_b,
            atr: atr_value,
            atr_pct: if candle.close != 0.0 {
                atr_value / candle.close * 100.0
            } else {
                0.0
            },
            volume_ratio,
            swing_high: swing_highs[i].unwrap_or(candle.high),
            swing_low: swing_lows[i].unwrap_or(candle.low),
            price_change: pct_change(&closes, i, 1),
            momentum_3: pct_change(&closes, i, 3),
            alignment_bull: short > mid && mid > long,
            alignment_bear: short < mid && mid < long,
        });
    }

    rows
}

/// Percentage change of closes over `span` steps, 0 when out of range.
fn pct_change(closes: &[f64], i: usize, span: usize) -> f64 {
    if i < span || closes[i - span] == 0.0 {
        return 0.0;
    }
    (closes[i] - closes[i - span]) / closes[i - span] * 100.0
}

/// Simple moving average, None during warm-up.
fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= period {
            sum -= values[i - period];
        }
        if i >= period - 1 {
            out.push(Some(sum / period as f64));
        } else {
            out.push(None);
        }
    }
    out
}

/// Rolling swing extremes over a window centered on each row: `half` rows
/// before through `half - 1` rows after. The forward side clamps at the end
/// of the sequence so the newest rows stay usable.
fn swing_extremes(candles: &[Candle], window: usize) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let half = window / 2;
    let mut highs = Vec::with_capacity(candles.len());
    let mut lows = Vec::with_capacity(candles.len());

    for i in 0..candles.len() {
        if i < half {
            highs.push(None);
            lows.push(None);
            continue;
        }
        let start = i - half;
        let end = (i + half.saturating_sub(1)).min(candles.len() - 1);
        let window = &candles[start..=end];
        let high = window.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let low = window.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        highs.push(Some(high));
        lows.push(Some(low));
    }

    (highs, lows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_candle(i: usize, close: f64) -> Candle {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::minutes(15 * i as i64);
        Candle {
            timestamp,
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.5,
            close,
            volume: 1_000.0 + (i % 7) as f64 * 100.0,
        }
    }

    fn wavy_candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| make_candle(i, 100.0 + (i as f64 % 9.0 - 4.0) * 1.5))
            .collect()
    }

    #[test]
    fn warmup_rows_are_dropped() {
        let config = StrategyConfig::default();
        let candles = wavy_candles(80);
        let rows = compute_features(&candles, &config);
        // ema_long 50 dominates: first defined row is index 49.
        assert_eq!(rows.len(), 80 - 49);
        assert_eq!(rows[0].candle.timestamp, candles[49].timestamp);
    }

    #[test]
    fn too_short_input_yields_no_rows() {
        let config = StrategyConfig::default();
        let candles = wavy_candles(30);
        assert!(compute_features(&candles, &config).is_empty());
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let config = StrategyConfig::default();
        assert!(compute_features(&[], &config).is_empty());
    }

    #[test]
    fn alignment_flags_follow_ema_ordering() {
        let config = StrategyConfig::default();
        // Steady uptrend: short EMA above mid above long once warmed up.
        let candles: Vec<Candle> = (0..90).map(|i| make_candle(i, 100.0 + i as f64)).collect();
        let rows = compute_features(&candles, &config);
        let last = rows.last().unwrap();
        assert!(last.alignment_bull);
        assert!(!last.alignment_bear);
        assert!(last.ema_short > last.ema_mid);
        assert!(last.ema_mid > last.ema_long);
    }

    #[test]
    fn atr_pct_relates_atr_to_close() {
        let config = StrategyConfig::default();
        let candles = wavy_candles(80);
        let rows = compute_features(&candles, &config);
        for row in &rows {
            let expected = row.atr / row.candle.close * 100.0;
            assert_relative_eq!(row.atr_pct, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn volume_ratio_against_trailing_average() {
        let mut volumes = vec![1000.0; 30];
        volumes.push(2000.0);
        let out = sma(&volumes, 20);
        let last_sma = out.last().unwrap().unwrap();
        // 19 * 1000 + 2000 over 20
        assert_relative_eq!(last_sma, (19.0 * 1000.0 + 2000.0) / 20.0, epsilon = 1e-9);
    }

    #[test]
    fn swing_window_clamps_at_tail() {
        let candles = wavy_candles(20);
        let (highs, lows) = swing_extremes(&candles, 10);
        for i in 0..5 {
            assert!(highs[i].is_none());
            assert!(lows[i].is_none());
        }
        // Last row: window is rows 14..=19, forward side truncated.
        let expected_high = candles[14..=19]
            .iter()
            .map(|c| c.high)
            .fold(f64::MIN, f64::max);
        assert!((highs[19].unwrap() - expected_high).abs() < f64::EPSILON);
    }

    #[test]
    fn swing_covers_centered_window_mid_sequence() {
        let mut candles = wavy_candles(20);
        candles[12].high = 500.0;
        let (highs, _) = swing_extremes(&candles, 10);
        // Row 8's window spans rows 3..=12 and sees the spike.
        assert!((highs[8].unwrap() - 500.0).abs() < f64::EPSILON);
        // Row 7's window spans rows 2..=11 and does not.
        assert!(highs[7].unwrap() < 500.0);
    }

    #[test]
    fn price_change_and_momentum() {
        let closes = [100.0, 102.0, 101.0, 103.0];
        assert_relative_eq!(pct_change(&closes, 1, 1), 2.0, epsilon = 1e-12);
        assert_relative_eq!(pct_change(&closes, 3, 3), 3.0, epsilon = 1e-12);
        assert!((pct_change(&closes, 0, 1) - 0.0).abs() < f64::EPSILON);
    }
}
