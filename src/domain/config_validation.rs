//! Configuration validation.
//!
//! Validates a fully-built [`StrategyConfig`]/[`PaperConfig`] before any run.
//! Each check maps to a `ConfigInvalid` error naming the offending key.

use crate::domain::config::{PaperConfig, StrategyConfig};
use crate::domain::error::CryptraderError;

pub fn validate_strategy_config(config: &StrategyConfig) -> Result<(), CryptraderError> {
    validate_symbol(config)?;
    validate_capital(config)?;
    validate_leverage(config)?;
    validate_risk_per_trade(config)?;
    validate_windows(config)?;
    validate_multipliers(config)?;
    validate_daily_limits(config)?;
    Ok(())
}

pub fn validate_paper_config(config: &PaperConfig) -> Result<(), CryptraderError> {
    if config.lookback < 100 {
        return Err(invalid("paper", "lookback", "lookback must be at least 100"));
    }
    if config.state_file.trim().is_empty() {
        return Err(invalid("paper", "state_file", "state_file must not be empty"));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> CryptraderError {
    CryptraderError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_symbol(config: &StrategyConfig) -> Result<(), CryptraderError> {
    if config.symbol.trim().is_empty() {
        return Err(invalid("trading", "symbol", "symbol must not be empty"));
    }
    if config.interval.trim().is_empty() {
        return Err(invalid("trading", "interval", "interval must not be empty"));
    }
    Ok(())
}

fn validate_capital(config: &StrategyConfig) -> Result<(), CryptraderError> {
    if config.initial_capital <= 0.0 {
        return Err(invalid(
            "trading",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_leverage(config: &StrategyConfig) -> Result<(), CryptraderError> {
    if config.leverage < 1.0 {
        return Err(invalid("trading", "leverage", "leverage must be at least 1"));
    }
    Ok(())
}

fn validate_risk_per_trade(config: &StrategyConfig) -> Result<(), CryptraderError> {
    if config.risk_per_trade <= 0.0 || config.risk_per_trade > 1.0 {
        return Err(invalid(
            "trading",
            "risk_per_trade",
            "risk_per_trade must be between 0 and 1",
        ));
    }
    Ok(())
}

fn validate_windows(config: &StrategyConfig) -> Result<(), CryptraderError> {
    if config.ema_short < 1 {
        return Err(invalid("indicators", "ema_short", "ema_short must be at least 1"));
    }
    if config.ema_short >= config.ema_mid {
        return Err(invalid(
            "indicators",
            "ema_short",
            "ema_short must be less than ema_mid",
        ));
    }
    if config.ema_mid >= config.ema_long {
        return Err(invalid(
            "indicators",
            "ema_mid",
            "ema_mid must be less than ema_long",
        ));
    }
    if config.rsi_period < 1 {
        return Err(invalid(
            "indicators",
            "rsi_period",
            "rsi_period must be at least 1",
        ));
    }
    if config.bb_period < 2 {
        return Err(invalid(
            "indicators",
            "bb_period",
            "bb_period must be at least 2",
        ));
    }
    if config.bb_std_dev <= 0.0 {
        return Err(invalid(
            "indicators",
            "bb_std_dev",
            "bb_std_dev must be positive",
        ));
    }
    if config.atr_period < 1 {
        return Err(invalid(
            "indicators",
            "atr_period",
            "atr_period must be at least 1",
        ));
    }
    Ok(())
}

fn validate_multipliers(config: &StrategyConfig) -> Result<(), CryptraderError> {
    if config.stop_atr_multiplier <= 0.0 {
        return Err(invalid(
            "risk",
            "stop_atr_multiplier",
            "stop_atr_multiplier must be positive",
        ));
    }
    if config.target_atr_multiplier <= 0.0 {
        return Err(invalid(
            "risk",
            "target_atr_multiplier",
            "target_atr_multiplier must be positive",
        ));
    }
    if config.trailing_activation_pct <= 0.0 {
        return Err(invalid(
            "risk",
            "trailing_activation_pct",
            "trailing_activation_pct must be positive",
        ));
    }
    Ok(())
}

fn validate_daily_limits(config: &StrategyConfig) -> Result<(), CryptraderError> {
    if config.max_trades_per_day < 1 {
        return Err(invalid(
            "risk",
            "max_trades_per_day",
            "max_trades_per_day must be at least 1",
        ));
    }
    if config.daily_loss_limit <= 0.0 || config.daily_loss_limit > 1.0 {
        return Err(invalid(
            "risk",
            "daily_loss_limit",
            "daily_loss_limit must be between 0 and 1",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_passes() {
        assert!(validate_strategy_config(&StrategyConfig::default()).is_ok());
        assert!(validate_paper_config(&PaperConfig::default()).is_ok());
    }

    #[test]
    fn empty_symbol_fails() {
        let config = StrategyConfig {
            symbol: "  ".into(),
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "symbol"));
    }

    #[test]
    fn capital_zero_fails() {
        let config = StrategyConfig {
            initial_capital: 0.0,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(
            matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn capital_negative_fails() {
        let config = StrategyConfig {
            initial_capital: -500.0,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(
            matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "initial_capital")
        );
    }

    #[test]
    fn leverage_below_one_fails() {
        let config = StrategyConfig {
            leverage: 0.5,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "leverage"));
    }

    #[test]
    fn risk_per_trade_out_of_range_fails() {
        for bad in [0.0, -0.02, 1.5] {
            let config = StrategyConfig {
                risk_per_trade: bad,
                ..StrategyConfig::default()
            };
            let err = validate_strategy_config(&config).unwrap_err();
            assert!(
                matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "risk_per_trade")
            );
        }
    }

    #[test]
    fn ema_windows_must_ascend() {
        let config = StrategyConfig {
            ema_short: 26,
            ema_mid: 26,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "ema_short"));

        let config = StrategyConfig {
            ema_mid: 50,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "ema_mid"));
    }

    #[test]
    fn bb_std_dev_zero_fails() {
        let config = StrategyConfig {
            bb_std_dev: 0.0,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "bb_std_dev"));
    }

    #[test]
    fn stop_multiplier_zero_fails() {
        let config = StrategyConfig {
            stop_atr_multiplier: 0.0,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(
            matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "stop_atr_multiplier")
        );
    }

    #[test]
    fn max_trades_zero_fails() {
        let config = StrategyConfig {
            max_trades_per_day: 0,
            ..StrategyConfig::default()
        };
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(
            matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "max_trades_per_day")
        );
    }

    #[test]
    fn daily_loss_limit_out_of_range_fails() {
        for bad in [0.0, -0.08, 1.2] {
            let config = StrategyConfig {
                daily_loss_limit: bad,
                ..StrategyConfig::default()
            };
            let err = validate_strategy_config(&config).unwrap_err();
            assert!(
                matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "daily_loss_limit")
            );
        }
    }

    #[test]
    fn paper_lookback_too_small_fails() {
        let config = PaperConfig {
            lookback: 50,
            ..PaperConfig::default()
        };
        let err = validate_paper_config(&config).unwrap_err();
        assert!(matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "lookback"));
    }

    #[test]
    fn paper_empty_state_file_fails() {
        let config = PaperConfig {
            state_file: "".into(),
            ..PaperConfig::default()
        };
        let err = validate_paper_config(&config).unwrap_err();
        assert!(matches!(err, CryptraderError::ConfigInvalid { key, .. } if key == "state_file"));
    }
}
