use alloc::vec::Vec;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Cells picked by the player, in the order they were picked.
pub type Selection = SmallVec<[CellIndex; 2]>;

/// Grid and score captured right before a pair was evaluated.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveSnapshot {
    pub grid: Grid,
    pub score: Score,
}

/// State of one game: the grid, the score, the current selection, the
/// single-level undo snapshot and the assist counters.
#[derive(Clone, Debug)]
pub struct PuzzleEngine {
    mode: Mode,
    grid: Grid,
    score: Score,
    selected: Selection,
    last_move: Option<MoveSnapshot>,
    assist_uses: AssistUses,
    rng: SmallRng,
}

impl PuzzleEngine {
    /// Starts a new game with a freshly generated grid.
    pub fn new(mode: Mode, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let grid = generate(mode, &mut rng);
        Self::from_parts(mode, grid, rng)
    }

    pub(crate) fn from_parts(mode: Mode, grid: Grid, rng: SmallRng) -> Self {
        Self {
            mode,
            grid,
            score: 0,
            selected: Selection::new(),
            last_move: None,
            assist_uses: AssistUses::default(),
            rng,
        }
    }

    pub(crate) fn restore(
        &mut self,
        score: Score,
        selected: Selection,
        last_move: Option<MoveSnapshot>,
        assist_uses: AssistUses,
    ) {
        self.score = score;
        self.selected = selected;
        self.last_move = last_move;
        self.assist_uses = assist_uses;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn selected(&self) -> &[CellIndex] {
        &self.selected
    }

    pub fn is_selected(&self, index: CellIndex) -> bool {
        self.selected.contains(&index)
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    pub fn last_move(&self) -> Option<&MoveSnapshot> {
        self.last_move.as_ref()
    }

    pub fn revert_available(&self) -> bool {
        self.last_move.is_some()
    }

    pub fn assist_uses(&self) -> AssistUses {
        self.assist_uses
    }

    /// Picks or unpicks the cell at `index`; picking a second cell evaluates
    /// the pair immediately.
    ///
    /// After an [`SelectOutcome::Invalid`] result both cells stay selected
    /// until [`clear_selection`](Self::clear_selection) is called.
    pub fn select_cell(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        if let Some(slot) = self.selected.iter().position(|&selected| selected == index) {
            self.selected.remove(slot);
            log::trace!("Deselected cell {index}");
            return Ok(SelectOutcome::Deselect { index });
        }

        self.validate_tile(index)?;

        if self.selected.len() == 2 {
            self.selected.clear();
            self.selected.push(index);
            log::trace!("Selection reset to cell {index}");
            return Ok(SelectOutcome::Reset { index });
        }

        self.selected.push(index);
        if self.selected.len() < 2 {
            log::trace!("Selected cell {index}");
            return Ok(SelectOutcome::Select { index });
        }

        self.last_move = Some(MoveSnapshot {
            grid: self.grid.clone(),
            score: self.score,
        });
        Ok(self.evaluate_pair())
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn evaluate_pair(&mut self) -> SelectOutcome {
        let indices = [self.selected[0], self.selected[1]];
        let [a, b] = indices;

        let (Some(x), Some(y)) = (self.grid.get(a), self.grid.get(b)) else {
            return SelectOutcome::Invalid { indices };
        };

        if !is_valid_pair(x, y) || !can_connect(&self.grid, a, b) {
            log::debug!("Rejected pair {a} ({x}) and {b} ({y})");
            return SelectOutcome::Invalid { indices };
        }

        let points = pair_points(x, y);
        self.score = self.score.saturating_add(points);
        self.grid.clear(a);
        self.grid.clear(b);
        self.selected.clear();
        log::debug!(
            "Removed pair {a} ({x}) and {b} ({y}) for {points} points, score {}",
            self.score
        );

        SelectOutcome::Valid {
            indices,
            points,
            total_score: self.score,
        }
    }

    fn validate_tile(&self, index: CellIndex) -> Result<Tile> {
        if !self.grid.contains(index) {
            return Err(GameError::InvalidIndex);
        }
        self.grid.get(index).ok_or(GameError::EmptyCell)
    }

    /// Runs one assist.
    pub fn assist(&mut self, action: AssistAction) -> AssistResult<AssistOutcome> {
        Ok(match action {
            AssistAction::Hint => AssistOutcome::Hint(self.use_hint()),
            AssistAction::Revert => {
                self.revert()?;
                AssistOutcome::Reverted
            }
            AssistAction::AddNumbers => AssistOutcome::NumbersAdded(self.add_numbers()?),
            AssistAction::Shuffle => {
                self.shuffle()?;
                AssistOutcome::Shuffled
            }
            AssistAction::Erase(index) => {
                self.erase(index)?;
                AssistOutcome::Erased(index)
            }
        })
    }

    /// Counts the removable pairs on the board. Never fails and has no limit;
    /// the usage counter is only kept for display.
    pub fn use_hint(&mut self) -> HintCount {
        let count = self.count_valid_moves();
        self.assist_uses.increment(AssistKind::Hints);
        HintCount(count)
    }

    /// Restores the grid and score from before the last evaluated pair.
    pub fn revert(&mut self) -> AssistResult<()> {
        let snapshot = self.last_move.take().ok_or(AssistError::NothingToRevert)?;
        self.grid = snapshot.grid;
        self.score = snapshot.score;
        self.selected.clear();
        self.assist_uses.increment(AssistKind::Revert);
        log::debug!("Reverted to score {}", self.score);
        Ok(())
    }

    /// Appends tiles according to the game mode, returning how many were added.
    pub fn add_numbers(&mut self) -> AssistResult<usize> {
        self.check_remaining(AssistKind::AddNumbers)?;
        if self.check_grid_limit() {
            return Err(AssistError::GridFull);
        }

        let capacity = self.grid.remaining_capacity();
        if capacity == 0 {
            return Err(AssistError::GridFull);
        }

        let present: Vec<Tile> = self.grid.tiles().collect();
        let mut tiles = refill_tiles(self.mode, present, &mut self.rng);
        tiles.truncate(capacity);
        if tiles.is_empty() {
            return Err(AssistError::NothingToAdd);
        }

        let added = tiles.len();
        self.grid.append(tiles);
        self.assist_uses.increment(AssistKind::AddNumbers);
        log::debug!(
            "Added {added} numbers, grid now has {} rows",
            self.grid.row_count()
        );
        Ok(added)
    }

    /// Whether the next Add Numbers would grow the grid to [`MAX_ROWS`].
    pub fn add_numbers_reaches_row_limit(&self) -> bool {
        let to_add = self.grid.tile_count().min(self.grid.remaining_capacity());
        to_add > 0 && rows_for(self.grid.len() + to_add) >= MAX_ROWS
    }

    /// Shuffles the remaining tiles among the non-empty cells.
    pub fn shuffle(&mut self) -> AssistResult<()> {
        self.check_remaining(AssistKind::Shuffle)?;

        let mut tiles: Vec<Tile> = self.grid.tiles().collect();
        tiles.shuffle(&mut self.rng);
        self.grid.refill_occupied(tiles);
        self.assist_uses.increment(AssistKind::Shuffle);
        log::debug!("Shuffled grid");
        Ok(())
    }

    /// Removes the tile at `index` without scoring.
    pub fn erase(&mut self, index: CellIndex) -> AssistResult<()> {
        self.check_remaining(AssistKind::Eraser)?;
        if !self.grid.contains(index) {
            return Err(AssistError::InvalidIndex);
        }

        let tile = self.grid.clear(index).ok_or(AssistError::CellEmpty)?;
        self.selected.retain(|selected| *selected != index);
        self.assist_uses.increment(AssistKind::Eraser);
        log::debug!("Erased {tile} at {index}");
        Ok(())
    }

    fn check_remaining(&self, kind: AssistKind) -> AssistResult<()> {
        if self.assist_uses.has_remaining(kind) {
            Ok(())
        } else {
            Err(AssistError::LimitReached(kind))
        }
    }

    pub fn assist_info(&self) -> AssistInfoMap {
        AssistInfoMap::new(|kind| AssistInfo {
            used: self.assist_uses.get(kind),
            limit: kind.limit(),
            available: self.is_assist_available(kind),
        })
    }

    pub fn is_assist_available(&self, kind: AssistKind) -> bool {
        match kind {
            AssistKind::Revert => self.revert_available(),
            _ => self.assist_uses.has_remaining(kind),
        }
    }

    /// Whether any assist that can change a stuck board has uses left.
    pub fn has_available_assists(&self) -> bool {
        AssistKind::ALL
            .into_iter()
            .filter(|kind| kind.can_unblock())
            .any(|kind| self.assist_uses.has_remaining(kind))
    }

    pub fn valid_pairs(&self) -> RemovablePairIter<'_> {
        RemovablePairIter::new(&self.grid)
    }

    pub fn has_valid_pairs(&self) -> bool {
        self.valid_pairs().next().is_some()
    }

    pub fn count_valid_moves(&self) -> usize {
        self.valid_pairs().count()
    }

    pub fn check_win_condition(&self) -> bool {
        self.score >= WINNING_SCORE
    }

    pub fn check_grid_limit(&self) -> bool {
        self.grid.row_count() >= MAX_ROWS
    }

    /// Lost when the grid is at its row limit, or when no pair can be removed
    /// and no assist is left to change that.
    pub fn check_lose_condition(&self) -> bool {
        (!self.has_valid_pairs() && !self.has_available_assists()) || self.check_grid_limit()
    }

    /// Win is checked before loss.
    pub fn status(&self) -> GameStatus {
        if self.check_win_condition() {
            GameStatus::Won
        } else if self.check_grid_limit() {
            GameStatus::Lost(LossReason::GridLimit)
        } else if !self.has_valid_pairs() && !self.has_available_assists() {
            GameStatus::Lost(LossReason::OutOfMoves)
        } else {
            GameStatus::Playing
        }
    }
}
