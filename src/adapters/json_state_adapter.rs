//! JSON file session state adapter.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::engine::EngineSnapshot;
use crate::domain::error::CryptraderError;
use crate::ports::state_port::StatePort;

/// Persists the engine snapshot as pretty-printed JSON. Each save is stamped
/// with a wall-clock `last_update`; the stamp is for inspecting the file and
/// is ignored on load.
pub struct JsonStateAdapter {
    path: PathBuf,
}

#[derive(Serialize)]
struct StateFile<'a> {
    #[serde(flatten)]
    snapshot: &'a EngineSnapshot,
    last_update: NaiveDateTime,
}

impl JsonStateAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn persistence_error(&self, reason: String) -> CryptraderError {
        CryptraderError::StatePersistence {
            path: self.path.display().to_string(),
            reason,
        }
    }
}

impl StatePort for JsonStateAdapter {
    fn save(&self, snapshot: &EngineSnapshot) -> Result<(), CryptraderError> {
        let file = StateFile {
            snapshot,
            last_update: Utc::now().naive_utc(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| self.persistence_error(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| self.persistence_error(e.to_string()))
    }

    fn load(&self) -> Result<Option<EngineSnapshot>, CryptraderError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| self.persistence_error(e.to_string()))?;
        let snapshot = serde_json::from_str(&content)
            .map_err(|e| self.persistence_error(e.to_string()))?;
        Ok(Some(snapshot))
    }
}
