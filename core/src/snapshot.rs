use alloc::string::String;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Plain, serializable capture of a game used for save and resume.
///
/// Every field is optional when decoding: missing or `null` values fall back
/// to an empty grid, zero score, no selection, no last move and zeroed
/// assist counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub grid: Grid,
    #[serde(deserialize_with = "null_as_default")]
    pub score: Score,
    #[serde(deserialize_with = "null_as_default")]
    pub selected_cells: Vec<CellIndex>,
    #[serde(deserialize_with = "null_as_default")]
    pub mode: Mode,
    pub last_move: Option<MoveSnapshot>,
    #[serde(deserialize_with = "null_as_default")]
    pub revert_available: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub assist_uses: AssistUses,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl PuzzleEngine {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid().clone(),
            score: self.score(),
            selected_cells: self.selected().to_vec(),
            mode: self.mode(),
            last_move: self.last_move().cloned(),
            revert_available: self.revert_available(),
            assist_uses: self.assist_uses(),
        }
    }

    /// Rebuilds a game from `snapshot`. Never fails: anything that cannot be
    /// honoured is dropped with a warning.
    ///
    /// `mode` overrides the mode recorded in the snapshot. `seed` only drives
    /// future shuffles and chaotic refills.
    pub fn from_snapshot(mode: Mode, snapshot: Snapshot, seed: u64) -> Self {
        let Snapshot {
            mut grid,
            score,
            selected_cells,
            mode: saved_mode,
            last_move,
            revert_available,
            assist_uses,
        } = snapshot;

        if saved_mode != mode {
            log::debug!("Snapshot mode {saved_mode} overridden by {mode}");
        }

        if grid.row_count() > MAX_ROWS {
            log::warn!(
                "Snapshot grid has {} rows, truncating to {MAX_ROWS}",
                grid.row_count()
            );
            grid.truncate_rows(MAX_ROWS);
        }

        let mut selected = Selection::new();
        for index in selected_cells {
            if selected.len() == 2 || selected.contains(&index) || !grid.is_occupied(index) {
                log::warn!("Dropping saved selection of cell {index}");
                continue;
            }
            selected.push(index);
        }

        let last_move = match (revert_available, last_move) {
            (true, Some(last_move)) => Some(last_move),
            (true, None) => {
                log::warn!("Snapshot marks revert available without a last move");
                None
            }
            (false, _) => None,
        };

        let mut engine = Self::from_parts(mode, grid, SmallRng::seed_from_u64(seed));
        engine.restore(score, selected, last_move, assist_uses);
        engine
    }
}
