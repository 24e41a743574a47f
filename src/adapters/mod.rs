//! Concrete adapter implementations for the port traits.

pub mod binance_adapter;
pub mod console_report_adapter;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_state_adapter;
