use chrono::{DateTime, Utc};
use pairup_core::{Mode, PuzzleEngine, Snapshot};
use serde::{Deserialize, Serialize};

/// A game in progress, as written by Save and read back by Continue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SavedGame {
    pub logic: Snapshot,
    /// Play time in milliseconds.
    pub elapsed_time: u64,
    pub eraser_mode: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SavedGame {
    pub fn new(
        engine: &PuzzleEngine,
        elapsed_time: u64,
        eraser_mode: bool,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            logic: engine.to_snapshot(),
            elapsed_time,
            eraser_mode,
            timestamp: Some(timestamp),
        }
    }

    /// A save without any grid cannot be continued.
    pub fn is_resumable(&self) -> bool {
        !self.logic.grid.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.logic.mode
    }

    /// Rebuilds the engine; `seed` drives future shuffles and refills.
    pub fn restore(self, seed: u64) -> PuzzleEngine {
        let mode = self.logic.mode;
        PuzzleEngine::from_snapshot(mode, self.logic, seed)
    }
}
