//! Plain-text console reporting adapter.
//!
//! Prints trade notifications, live status blocks, and end-of-run summaries
//! to stdout. This is the default report sink for both drivers.

use crate::domain::backtest::BacktestResult;
use crate::domain::performance::PerformanceSummary;
use crate::domain::position::{Position, Trade};
use crate::ports::report_port::{ReportPort, StatusUpdate};

pub struct ConsoleReportAdapter;

impl ReportPort for ConsoleReportAdapter {
    fn trade_opened(&self, position: &Position) {
        println!("\n=== Opened {} Position ===", position.direction);
        println!("Entry Price:      ${:.2}", position.entry_price);
        println!("Position Size:    {:.4}", position.size);
        println!("Stop Loss:        ${:.2}", position.stop_loss);
        println!("Take Profit:      ${:.2}", position.take_profit);
        println!("Liquidation:      ${:.2}", position.liquidation_price);
        println!("Confidence:       {:.2}", position.confidence);
        println!("Pattern:          {}", position.pattern);
    }

    fn trade_closed(&self, trade: &Trade, capital: f64) {
        println!("\n=== Closed {} Position ===", trade.direction);
        println!("Entry Price:      ${:.2}", trade.entry_price);
        println!("Exit Price:       ${:.2}", trade.exit_price);
        println!(
            "P&L:              ${:.2} ({:+.2}%)",
            trade.pnl, trade.pnl_percent
        );
        println!("Reason:           {}", trade.reason);
        println!("New Capital:      ${:.2}", capital);
    }

    fn status(&self, update: &StatusUpdate) {
        println!(
            "\n=== Status {} ===",
            update.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
        println!(
            "Symbol: {} | Interval: {} | Leverage: {}x",
            update.symbol, update.interval, update.leverage
        );
        println!(
            "Price: ${:.2} | Capital: ${:.2} | Daily Trades: {}/{}",
            update.price, update.capital, update.daily_trades, update.max_daily_trades
        );
        println!(
            "RSI: {:.1} | MACD: {:.2} (signal {:.2})",
            update.rsi, update.macd, update.macd_signal
        );
        println!(
            "ATR: ${:.2} ({:.2}%) | Volume Ratio: {:.2}x | Momentum(3): {:.2}%",
            update.atr, update.atr_pct, update.volume_ratio, update.momentum_3
        );

        match update.position {
            Some(position) => self.print_open_position(position, update.price),
            None => println!("No open position, scanning for signals"),
        }

        if let Some(perf) = update.performance {
            println!(
                "Session: {} trades | Win Rate: {:.1}% | Profit Factor: {:.2} | Net P&L: ${:.2} ({:+.2}%)",
                perf.total_trades, perf.win_rate, perf.profit_factor, perf.net_profit, perf.roi
            );
        }
    }

    fn backtest_summary(&self, result: &BacktestResult) {
        let Some(perf) = &result.summary else {
            println!("\nNo trades executed");
            return;
        };

        println!("\n=== Backtest Results ===");
        println!("Initial Capital:        ${:.2}", result.initial_capital);
        println!("Final Capital:          ${:.2}", result.final_capital);
        println!(
            "Net Profit:             ${:.2} ({:+.2}%)",
            perf.net_profit, perf.roi
        );
        println!("Total Trades:           {}", perf.total_trades);
        println!(
            "Winning Trades:         {} ({:.1}%)",
            perf.winning_trades, perf.win_rate
        );
        println!("Losing Trades:          {}", perf.losing_trades);
        println!("Profit Factor:          {:.2}", perf.profit_factor);
        println!("Average Win:            ${:.2}", perf.avg_win);
        println!("Average Loss:           ${:.2}", perf.avg_loss);
        println!("Expectancy:             ${:.2}", perf.expectancy);
        println!("Max Drawdown:           {:.2}%", result.max_drawdown);
        println!("Sharpe Ratio:           {:.2}", perf.sharpe_ratio);
        println!("Max Consecutive Losses: {}", perf.max_consecutive_losses);

        println!("\nExit Reasons:");
        for (reason, count) in &result.exit_reasons {
            println!("  {}: {}", reason, count);
        }
    }

    fn session_summary(
        &self,
        summary: Option<&PerformanceSummary>,
        capital: f64,
        initial_capital: f64,
    ) {
        let Some(perf) = summary else {
            println!("\nNo trades were executed during this session");
            return;
        };

        println!("\n=== Final Statistics ===");
        println!("Initial Capital:        ${:.2}", initial_capital);
        println!("Final Capital:          ${:.2}", capital);
        println!(
            "Net P&L:                ${:.2} ({:+.2}%)",
            perf.net_profit, perf.roi
        );
        println!("Total Trades:           {}", perf.total_trades);
        println!(
            "Winning Trades:         {} ({:.1}%)",
            perf.winning_trades, perf.win_rate
        );
        println!("Losing Trades:          {}", perf.losing_trades);
        println!("Profit Factor:          {:.2}", perf.profit_factor);
        println!("Expectancy:             ${:.2}", perf.expectancy);
        println!("Sharpe Ratio:           {:.2}", perf.sharpe_ratio);
    }
}

impl ConsoleReportAdapter {
    fn print_open_position(&self, position: &Position, price: f64) {
        let pnl = position.price_pnl(price);
        let pnl_pct = pnl / position.entry_capital * 100.0;
        let risk_reward = ((position.take_profit - position.entry_price)
            / (position.entry_price - position.stop_loss))
            .abs();

        println!("Open {} position:", position.direction);
        println!(
            "  Entry: ${:.2} | P&L: ${:.2} ({:+.2}%)",
            position.entry_price, pnl, pnl_pct
        );
        println!(
            "  Stop: ${:.2} | Target: ${:.2} | Risk/Reward: {:.2} | Confidence: {:.2}",
            position.stop_loss, position.take_profit, risk_reward, position.confidence
        );
        if let Some(trailing) = position.trailing_stop {
            println!("  Trailing Stop: ${:.2}", trailing);
        }
    }
}
