//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are None.

/// EMA over a value series. Output is aligned with the input; warm-up
/// entries are `None`.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut current = 0.0;
    let mut sum = 0.0;

    for (i, &value) in values.iter().enumerate() {
        if i < period - 1 {
            sum += value;
            out.push(None);
        } else if i == period - 1 {
            sum += value;
            current = sum / period as f64;
            out.push(Some(current));
        } else {
            current = value * k + current * (1.0 - k);
            out.push(Some(current));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_warmup() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert!(out[0].is_none());
        assert!(out[1].is_none());
        assert!(out[2].is_some());
        assert!(out[3].is_some());
        assert!(out[4].is_some());
    }

    #[test]
    fn ema_seed_is_sma() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        // seed = (10+20+30)/3 = 20
        assert!((out[2].unwrap() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_step() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        // k = 0.5; ema[3] = 40*0.5 + 20*0.5 = 30; ema[4] = 50*0.5 + 30*0.5 = 40
        assert!((out[3].unwrap() - 30.0).abs() < f64::EPSILON);
        assert!((out[4].unwrap() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_constant_series() {
        let out = ema(&[100.0; 10], 4);
        for value in out.iter().skip(3) {
            assert!((value.unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_period_one_tracks_input() {
        let values = [10.0, 20.0, 15.0];
        let out = ema(&values, 1);
        for (i, &value) in values.iter().enumerate() {
            assert!((out[i].unwrap() - value).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_zero_period() {
        let out = ema(&[10.0, 20.0], 0);
        assert_eq!(out, vec![None, None]);
    }

    #[test]
    fn ema_empty_input() {
        let out = ema(&[], 3);
        assert!(out.is_empty());
    }
}
