//! cryptrader — leveraged crypto strategy backtester and paper trader.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. The same strategy engine drives
//! the historical simulator and the live polling loop in [`live`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod live;
pub mod ports;
