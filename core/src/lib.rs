#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use assist::*;
pub use connectivity::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod assist;
mod connectivity;
mod engine;
mod error;
mod generator;
mod snapshot;
mod tile;
mod types;

/// Score at which a game counts as won.
pub const WINNING_SCORE: Score = 100;

/// How a game fills its starting grid and what Add Numbers appends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Classic,
    Random,
    Chaotic,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Classic, Mode::Random, Mode::Chaotic];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Random => "random",
            Self::Chaotic => "chaotic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownMode)
    }
}

/// Row-major cells of width [`GRID_COLUMNS`], each holding a tile or nothing.
///
/// The grid only ever grows by appending; removing a tile leaves an empty cell
/// behind so the positions of the remaining tiles never shift.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: Vec<Option<Tile>>,
}

impl Grid {
    pub fn from_cells(cells: Vec<Option<Tile>>) -> Self {
        Self { cells }
    }

    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self::from_cells(tiles.into_iter().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_count(&self) -> usize {
        rows_for(self.cells.len())
    }

    /// Cells that can still be appended before the grid hits [`MAX_ROWS`].
    pub fn remaining_capacity(&self) -> usize {
        MAX_CELLS.saturating_sub(self.cells.len())
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        index < self.cells.len()
    }

    /// Tile at `index`, `None` for empty cells and for positions past the end.
    pub fn get(&self, index: CellIndex) -> Option<Tile> {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_occupied(&self, index: CellIndex) -> bool {
        self.get(index).is_some()
    }

    pub fn cells(&self) -> &[Option<Tile>] {
        &self.cells
    }

    /// Non-empty cells with their positions, in grid order.
    pub fn occupied(&self) -> impl Iterator<Item = (CellIndex, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.map(|tile| (index, tile)))
    }

    /// Values of the non-empty cells, in grid order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.cells.iter().flatten().copied()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Leftmost non-empty cell of `row`, if the row holds any tile.
    pub fn leftmost_in_row(&self, row: usize) -> Option<CellIndex> {
        let start = row * GRID_COLUMNS;
        self.row_cells(row)
            .iter()
            .position(Option::is_some)
            .map(|col| start + col)
    }

    /// Rightmost non-empty cell of `row`, if the row holds any tile.
    pub fn rightmost_in_row(&self, row: usize) -> Option<CellIndex> {
        let start = row * GRID_COLUMNS;
        self.row_cells(row)
            .iter()
            .rposition(Option::is_some)
            .map(|col| start + col)
    }

    pub(crate) fn clear(&mut self, index: CellIndex) -> Option<Tile> {
        self.cells.get_mut(index).and_then(Option::take)
    }

    pub(crate) fn append(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.cells.extend(tiles.into_iter().map(Some));
    }

    /// Writes `tiles` into the non-empty cells in grid order, leaving empty
    /// cells where they are.
    pub(crate) fn refill_occupied(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        let mut tiles = tiles.into_iter();
        for cell in self.cells.iter_mut().filter(|cell| cell.is_some()) {
            *cell = tiles.next();
        }
    }

    pub(crate) fn truncate_rows(&mut self, rows: usize) {
        self.cells.truncate(rows * GRID_COLUMNS);
    }

    fn row_cells(&self, row: usize) -> &[Option<Tile>] {
        let start = (row * GRID_COLUMNS).min(self.cells.len());
        let end = (start + GRID_COLUMNS).min(self.cells.len());
        &self.cells[start..end]
    }
}

impl Index<CellIndex> for Grid {
    type Output = Option<Tile>;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.cells[index]
    }
}

/// Tagged result of [`PuzzleEngine::select_cell`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Select {
        index: CellIndex,
    },
    Deselect {
        index: CellIndex,
    },
    Reset {
        index: CellIndex,
    },
    Valid {
        indices: [CellIndex; 2],
        points: Score,
        total_score: Score,
    },
    Invalid {
        indices: [CellIndex; 2],
    },
}

impl SelectOutcome {
    /// Whether the grid or score changed.
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Whether a pair was evaluated, successfully or not.
    pub const fn is_pair_attempt(self) -> bool {
        matches!(self, Self::Valid { .. } | Self::Invalid { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LossReason {
    GridLimit,
    OutOfMoves,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridLimit => write!(f, "Grid limit ({MAX_ROWS} lines) reached."),
            Self::OutOfMoves => f.write_str("No valid moves available and all assists used."),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    Won,
    Lost(LossReason),
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::Playing)
    }
}
