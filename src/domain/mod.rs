//! Core domain types and logic.

pub mod backtest;
pub mod candle;
pub mod config;
pub mod config_validation;
pub mod detector;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod performance;
pub mod position;
pub mod risk;
pub mod signal;
