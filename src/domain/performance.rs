//! Trade-log statistics, recomputed on demand.

use crate::domain::position::Trade;

/// Summary statistics over the closed-trade log. Zero-P&L trades count as
/// losses throughout.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage of trades with positive P&L.
    pub win_rate: f64,
    /// Gross profit over gross loss; infinite when nothing was lost.
    pub profit_factor: f64,
    pub net_profit: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    /// Expected P&L per trade from the observed win rate and averages.
    pub expectancy: f64,
    /// Annualized mean-over-deviation of per-trade returns; zero when the
    /// deviation is undefined or zero.
    pub sharpe_ratio: f64,
    pub max_consecutive_losses: usize,
    /// Total return on initial capital, in percent.
    pub roi: f64,
}

impl PerformanceSummary {
    /// Compute statistics from the trade log. Returns None when no trades
    /// have closed yet.
    pub fn compute(trades: &[Trade], capital: f64, initial_capital: f64) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }

        let total_trades = trades.len();
        let winning_trades = trades.iter().filter(|t| t.pnl > 0.0).count();
        let losing_trades = total_trades - winning_trades;
        let win_rate = winning_trades as f64 / total_trades as f64 * 100.0;

        let total_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
        let total_loss: f64 = trades
            .iter()
            .filter(|t| t.pnl <= 0.0)
            .map(|t| t.pnl)
            .sum::<f64>()
            .abs();
        let net_profit: f64 = trades.iter().map(|t| t.pnl).sum();
        let profit_factor = if total_loss > 0.0 {
            total_profit / total_loss
        } else {
            f64::INFINITY
        };

        let avg_win = if winning_trades > 0 {
            total_profit / winning_trades as f64
        } else {
            0.0
        };
        let avg_loss = if losing_trades > 0 {
            total_loss / losing_trades as f64
        } else {
            0.0
        };

        let p_win = win_rate / 100.0;
        let expectancy = p_win * avg_win - (1.0 - p_win) * avg_loss;

        let returns: Vec<f64> = trades.iter().map(|t| t.pnl_percent / 100.0).collect();
        let sharpe_ratio = annualized_sharpe(&returns);

        let mut max_consecutive_losses = 0usize;
        let mut streak = 0usize;
        for trade in trades {
            if trade.pnl <= 0.0 {
                streak += 1;
                max_consecutive_losses = max_consecutive_losses.max(streak);
            } else {
                streak = 0;
            }
        }

        let roi = (capital - initial_capital) / initial_capital * 100.0;

        Some(PerformanceSummary {
            total_trades,
            winning_trades,
            losing_trades,
            win_rate,
            profit_factor,
            net_profit,
            avg_win,
            avg_loss,
            expectancy,
            sharpe_ratio,
            max_consecutive_losses,
            roi,
        })
    }
}

/// Mean over sample standard deviation, annualized over 252 trading days.
/// Zero when fewer than two returns or when the deviation is zero.
fn annualized_sharpe(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();

    if std_dev > 0.0 {
        mean / std_dev * (252.0f64).sqrt()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::CloseReason;
    use crate::domain::signal::{Direction, Pattern};
    use chrono::NaiveDate;

    fn make_trade(pnl: f64, pnl_percent: f64) -> Trade {
        let time = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Trade {
            entry_time: time,
            exit_time: time,
            direction: Direction::Long,
            entry_price: 100.0,
            exit_price: 100.0,
            size: 1.0,
            pnl,
            pnl_percent,
            reason: CloseReason::TakeProfit,
            pattern: Pattern::Momentum,
        }
    }

    #[test]
    fn empty_log_has_no_summary() {
        assert!(PerformanceSummary::compute(&[], 10000.0, 10000.0).is_none());
    }

    #[test]
    fn single_winner() {
        let trades = vec![make_trade(100.0, 1.0)];
        let summary = PerformanceSummary::compute(&trades, 10100.0, 10000.0).unwrap();

        assert_eq!(summary.total_trades, 1);
        assert_eq!(summary.winning_trades, 1);
        assert_eq!(summary.losing_trades, 0);
        assert!((summary.win_rate - 100.0).abs() < f64::EPSILON);
        assert!(summary.profit_factor.is_infinite());
        assert!((summary.avg_win - 100.0).abs() < f64::EPSILON);
        assert!(summary.avg_loss.abs() < f64::EPSILON);
        assert!((summary.expectancy - 100.0).abs() < f64::EPSILON);
        // A single return has no deviation to annualize.
        assert!(summary.sharpe_ratio.abs() < f64::EPSILON);
        assert_eq!(summary.max_consecutive_losses, 0);
        assert!((summary.roi - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mixed_outcomes() {
        let trades = vec![
            make_trade(100.0, 1.0),
            make_trade(-50.0, -0.5),
            make_trade(200.0, 2.0),
            make_trade(-50.0, -0.5),
        ];
        let summary = PerformanceSummary::compute(&trades, 10200.0, 10000.0).unwrap();

        assert_eq!(summary.winning_trades, 2);
        assert_eq!(summary.losing_trades, 2);
        assert!((summary.win_rate - 50.0).abs() < f64::EPSILON);
        assert!((summary.profit_factor - 3.0).abs() < f64::EPSILON);
        assert!((summary.net_profit - 200.0).abs() < f64::EPSILON);
        assert!((summary.avg_win - 150.0).abs() < f64::EPSILON);
        assert!((summary.avg_loss - 50.0).abs() < f64::EPSILON);
        assert!((summary.expectancy - 50.0).abs() < f64::EPSILON);
        assert!((summary.roi - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_pnl_counts_as_loss() {
        let trades = vec![make_trade(0.0, 0.0)];
        let summary = PerformanceSummary::compute(&trades, 10000.0, 10000.0).unwrap();

        assert_eq!(summary.winning_trades, 0);
        assert_eq!(summary.losing_trades, 1);
        // Nothing was actually lost, so the factor is still infinite.
        assert!(summary.profit_factor.is_infinite());
        assert_eq!(summary.max_consecutive_losses, 1);
    }

    #[test]
    fn all_losses_zero_profit_factor() {
        let trades = vec![make_trade(-50.0, -0.5), make_trade(-25.0, -0.25)];
        let summary = PerformanceSummary::compute(&trades, 9925.0, 10000.0).unwrap();

        assert!(summary.profit_factor.abs() < f64::EPSILON);
        assert!((summary.avg_loss - 37.5).abs() < f64::EPSILON);
        assert!((summary.expectancy + 37.5).abs() < f64::EPSILON);
    }

    #[test]
    fn loss_streaks_tracked_across_wins() {
        let trades = vec![
            make_trade(-1.0, -0.01),
            make_trade(-1.0, -0.01),
            make_trade(100.0, 1.0),
            make_trade(-1.0, -0.01),
            make_trade(-1.0, -0.01),
            make_trade(-1.0, -0.01),
            make_trade(50.0, 0.5),
        ];
        let summary = PerformanceSummary::compute(&trades, 10146.0, 10000.0).unwrap();
        assert_eq!(summary.max_consecutive_losses, 3);
    }

    #[test]
    fn identical_returns_have_zero_sharpe() {
        let trades = vec![make_trade(100.0, 1.0), make_trade(100.0, 1.0)];
        let summary = PerformanceSummary::compute(&trades, 10200.0, 10000.0).unwrap();
        assert!(summary.sharpe_ratio.abs() < f64::EPSILON);
    }

    #[test]
    fn sharpe_annualizes_return_over_deviation() {
        let trades = vec![make_trade(1000.0, 10.0), make_trade(2000.0, 20.0)];
        let summary = PerformanceSummary::compute(&trades, 13000.0, 10000.0).unwrap();

        let expected = 0.15 / (0.005f64).sqrt() * (252.0f64).sqrt();
        assert!((summary.sharpe_ratio - expected).abs() < 1e-9);
    }
}
