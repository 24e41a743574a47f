//! Port traits at the boundary between the strategy core and the outside
//! world: market data, configuration, state persistence, and reporting.

pub mod config_port;
pub mod data_port;
pub mod report_port;
pub mod state_port;
