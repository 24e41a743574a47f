//! Session state persistence port trait.

use crate::domain::engine::EngineSnapshot;
use crate::domain::error::CryptraderError;

/// Persists engine state between live sessions. Backtests never touch this.
pub trait StatePort {
    fn save(&self, snapshot: &EngineSnapshot) -> Result<(), CryptraderError>;

    /// Previously saved state, or None when no session has been persisted.
    fn load(&self) -> Result<Option<EngineSnapshot>, CryptraderError>;
}
