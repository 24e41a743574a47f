//! Strategy and paper-trading configuration.
//!
//! All values are fixed at construction; there is no runtime reconfiguration.
//! `from_config` builders read the recognized INI keys through a [`ConfigPort`],
//! falling back to the defaults below for anything absent.

use crate::ports::config_port::ConfigPort;

/// Full parameter set for the strategy engine.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub symbol: String,
    pub interval: String,
    pub initial_capital: f64,
    pub leverage: f64,
    pub risk_per_trade: f64,

    pub ema_short: usize,
    pub ema_mid: usize,
    pub ema_long: usize,
    pub rsi_period: usize,
    pub bb_period: usize,
    pub bb_std_dev: f64,
    pub atr_period: usize,
    pub macd_signal: usize,
    pub volume_window: usize,
    pub swing_window: usize,

    pub stop_atr_multiplier: f64,
    pub target_atr_multiplier: f64,
    pub trailing_activation_pct: f64,
    pub max_trades_per_day: u32,
    pub daily_loss_limit: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            symbol: "BTCUSDT".to_string(),
            interval: "15m".to_string(),
            initial_capital: 10_000.0,
            leverage: 3.0,
            risk_per_trade: 0.02,

            ema_short: 12,
            ema_mid: 26,
            ema_long: 50,
            rsi_period: 14,
            bb_period: 20,
            bb_std_dev: 2.0,
            atr_period: 14,
            macd_signal: 9,
            volume_window: 20,
            swing_window: 10,

            stop_atr_multiplier: 2.0,
            target_atr_multiplier: 3.5,
            trailing_activation_pct: 1.5,
            max_trades_per_day: 8,
            daily_loss_limit: 0.08,
        }
    }
}

impl StrategyConfig {
    /// Build from an INI-backed config port; missing keys take defaults.
    /// The MACD signal, volume-average, and swing windows are not file
    /// options and stay at their defaults here.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = StrategyConfig::default();
        StrategyConfig {
            symbol: config
                .get_string("trading", "symbol")
                .unwrap_or(defaults.symbol),
            interval: config
                .get_string("trading", "interval")
                .unwrap_or(defaults.interval),
            initial_capital: config.get_double(
                "trading",
                "initial_capital",
                defaults.initial_capital,
            ),
            leverage: config.get_double("trading", "leverage", defaults.leverage),
            risk_per_trade: config.get_double("trading", "risk_per_trade", defaults.risk_per_trade),

            ema_short: config.get_int("indicators", "ema_short", defaults.ema_short as i64)
                as usize,
            ema_mid: config.get_int("indicators", "ema_mid", defaults.ema_mid as i64) as usize,
            ema_long: config.get_int("indicators", "ema_long", defaults.ema_long as i64) as usize,
            rsi_period: config.get_int("indicators", "rsi_period", defaults.rsi_period as i64)
                as usize,
            bb_period: config.get_int("indicators", "bb_period", defaults.bb_period as i64)
                as usize,
            bb_std_dev: config.get_double("indicators", "bb_std_dev", defaults.bb_std_dev),
            atr_period: config.get_int("indicators", "atr_period", defaults.atr_period as i64)
                as usize,
            macd_signal: defaults.macd_signal,
            volume_window: defaults.volume_window,
            swing_window: defaults.swing_window,

            stop_atr_multiplier: config.get_double(
                "risk",
                "stop_atr_multiplier",
                defaults.stop_atr_multiplier,
            ),
            target_atr_multiplier: config.get_double(
                "risk",
                "target_atr_multiplier",
                defaults.target_atr_multiplier,
            ),
            trailing_activation_pct: config.get_double(
                "risk",
                "trailing_activation_pct",
                defaults.trailing_activation_pct,
            ),
            max_trades_per_day: config.get_int(
                "risk",
                "max_trades_per_day",
                defaults.max_trades_per_day as i64,
            ) as u32,
            daily_loss_limit: config.get_double(
                "risk",
                "daily_loss_limit",
                defaults.daily_loss_limit,
            ),
        }
    }

    /// Index of the first row where every indicator is defined. Rows before
    /// this are warm-up and are dropped from the usable sequence.
    pub fn warmup(&self) -> usize {
        let ema = self.ema_long.saturating_sub(1);
        let macd = self.ema_mid.saturating_sub(1) + self.macd_signal.saturating_sub(1);
        let bollinger = self.bb_period.saturating_sub(1);
        let volume = self.volume_window.saturating_sub(1);
        let swing_head = self.swing_window / 2;
        ema.max(macd)
            .max(bollinger)
            .max(self.rsi_period)
            .max(self.atr_period)
            .max(volume)
            .max(swing_head)
            .max(3)
    }
}

/// Parameters owned by the live polling driver, not the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperConfig {
    pub poll_interval_secs: u64,
    pub retry_delay_secs: u64,
    pub lookback: usize,
    pub state_file: String,
}

impl Default for PaperConfig {
    fn default() -> Self {
        PaperConfig {
            poll_interval_secs: 60,
            retry_delay_secs: 30,
            lookback: 200,
            state_file: "trading_state.json".to_string(),
        }
    }
}

impl PaperConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = PaperConfig::default();
        PaperConfig {
            poll_interval_secs: config.get_int(
                "paper",
                "poll_interval_secs",
                defaults.poll_interval_secs as i64,
            ) as u64,
            retry_delay_secs: config.get_int(
                "paper",
                "retry_delay_secs",
                defaults.retry_delay_secs as i64,
            ) as u64,
            lookback: config.get_int("paper", "lookback", defaults.lookback as i64) as usize,
            state_file: config
                .get_string("paper", "state_file")
                .unwrap_or(defaults.state_file),
        }
    }
}
