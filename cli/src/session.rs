use chrono::{DateTime, Utc};
use pairup_core::{
    AssistError, AssistKind, CellIndex, GameError, GameStatus, LossReason, MAX_ROWS, Mode,
    PuzzleEngine, SelectOutcome,
};
use pairup_protocol::{GameResult, SavedGame};

/// Rows from which the board warns about the grid limit.
pub(crate) const ROW_WARNING_FROM: usize = 45;

/// A gameplay action forwarded to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Select the cell, or erase it while the eraser is armed.
    Cell(CellIndex),
    ClearSelection,
    Hint,
    Revert,
    AddNumbers,
    Shuffle,
    ToggleEraser,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Sound {
    Select,
    Deselect,
    ValidPair,
    InvalidPair,
    AssistUse,
    Win,
    Lose,
}

impl Sound {
    /// Whether the sound is played as a terminal bell.
    pub(crate) const fn rings_bell(self) -> bool {
        matches!(self, Self::InvalidPair | Self::Win | Self::Lose)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

/// What the frontend should show after an action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Feedback {
    pub message: Option<(Tone, String)>,
    pub sound: Option<Sound>,
    /// The game state worth saving changed.
    pub changed: bool,
    /// Board warnings shown after the message.
    pub warnings: Vec<String>,
}

impl Feedback {
    fn new(tone: Tone, message: impl Into<String>) -> Self {
        Self {
            message: Some((tone, message.into())),
            ..Default::default()
        }
    }

    fn with_sound(mut self, sound: Sound) -> Self {
        self.sound = Some(sound);
        self
    }

    fn changed(mut self) -> Self {
        self.changed = true;
        self
    }
}

/// One game being played: the engine plus what the frontend tracks around it.
#[derive(Clone, Debug)]
pub(crate) struct GameSession {
    engine: PuzzleEngine,
    eraser_mode: bool,
    /// Play time accumulated before `resumed_at`, in milliseconds.
    elapsed_before: u64,
    resumed_at: DateTime<Utc>,
    forced_loss: Option<LossReason>,
}

impl GameSession {
    pub(crate) fn new(mode: Mode, seed: u64, now: DateTime<Utc>) -> Self {
        log::info!("Starting {mode} game with seed {seed}");
        Self {
            engine: PuzzleEngine::new(mode, seed),
            eraser_mode: false,
            elapsed_before: 0,
            resumed_at: now,
            forced_loss: None,
        }
    }

    /// `None` when the save holds no grid.
    pub(crate) fn resume(saved: SavedGame, seed: u64, now: DateTime<Utc>) -> Option<Self> {
        if !saved.is_resumable() {
            return None;
        }
        log::info!(
            "Resuming {} game saved at {:?}",
            saved.mode(),
            saved.timestamp
        );
        let elapsed_before = saved.elapsed_time;
        let eraser_mode = saved.eraser_mode;
        Some(Self {
            engine: saved.restore(seed),
            eraser_mode,
            elapsed_before,
            resumed_at: now,
            forced_loss: None,
        })
    }

    pub(crate) fn engine(&self) -> &PuzzleEngine {
        &self.engine
    }

    pub(crate) fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub(crate) fn eraser_mode(&self) -> bool {
        self.eraser_mode
    }

    pub(crate) fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let since_resume = (now - self.resumed_at).num_milliseconds().max(0) as u64;
        self.elapsed_before.saturating_add(since_resume)
    }

    pub(crate) fn status(&self) -> GameStatus {
        match self.forced_loss {
            Some(reason) => GameStatus::Lost(reason),
            None => self.engine.status(),
        }
    }

    pub(crate) fn to_saved(&self, now: DateTime<Utc>) -> SavedGame {
        SavedGame::new(&self.engine, self.elapsed_ms(now), self.eraser_mode, now)
    }

    pub(crate) fn to_result(&self, now: DateTime<Utc>) -> GameResult {
        let won = matches!(self.status(), GameStatus::Won);
        GameResult::new(self.mode(), won, self.engine.score(), self.elapsed_ms(now), now)
    }

    pub(crate) fn apply(&mut self, action: Action) -> Feedback {
        let mut feedback = self.run(action);
        if (feedback.changed || action == Action::Hint) && !self.status().is_finished() {
            feedback.warnings = self.board_warnings();
        }
        feedback
    }

    /// Rows nearing the limit, or no pair left while assists remain.
    pub(crate) fn board_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let rows = self.engine.row_count();
        if rows >= ROW_WARNING_FROM {
            warnings.push(format!(
                "Warning: Only {} lines left before grid limit!",
                MAX_ROWS.saturating_sub(rows)
            ));
        }
        if !self.engine.has_valid_pairs() && self.engine.has_available_assists() {
            warnings.push("No valid moves left! Use your remaining assists.".to_owned());
        }
        warnings
    }

    fn run(&mut self, action: Action) -> Feedback {
        match action {
            Action::Cell(index) if self.eraser_mode => self.erase(index),
            Action::Cell(index) => self.select(index),
            Action::ClearSelection => {
                self.engine.clear_selection();
                Feedback::default()
            }
            Action::Hint => {
                let count = self.engine.use_hint();
                Feedback::new(Tone::Info, format!("Available moves: {count}"))
                    .with_sound(Sound::AssistUse)
            }
            Action::Revert => match self.engine.revert() {
                Ok(()) => Feedback::new(Tone::Success, "Last move reverted")
                    .with_sound(Sound::AssistUse)
                    .changed(),
                Err(err) => assist_failed(err),
            },
            Action::AddNumbers => self.add_numbers(),
            Action::Shuffle => match self.engine.shuffle() {
                Ok(()) => Feedback::new(Tone::Success, "Grid shuffled")
                    .with_sound(Sound::AssistUse)
                    .changed(),
                Err(err) => assist_failed(err),
            },
            Action::ToggleEraser => self.toggle_eraser(),
        }
    }

    fn select(&mut self, index: CellIndex) -> Feedback {
        let outcome = match self.engine.select_cell(index) {
            Ok(outcome) => outcome,
            Err(GameError::EmptyCell) => {
                return Feedback::new(Tone::Warning, format!("Cell {index} is empty"));
            }
            Err(err) => return Feedback::new(Tone::Warning, format!("Cell {index}: {err}")),
        };

        match outcome {
            SelectOutcome::Select { .. } => Feedback::default().with_sound(Sound::Select),
            SelectOutcome::Deselect { .. } => Feedback::default().with_sound(Sound::Deselect),
            SelectOutcome::Reset { .. } => Feedback::default(),
            SelectOutcome::Valid { points, .. } => {
                Feedback::new(Tone::Success, format!("Valid pair. +{points} points"))
                    .with_sound(Sound::ValidPair)
                    .changed()
            }
            SelectOutcome::Invalid { .. } => {
                self.engine.clear_selection();
                Feedback::new(Tone::Error, "Invalid pair. Try again.")
                    .with_sound(Sound::InvalidPair)
            }
        }
    }

    fn erase(&mut self, index: CellIndex) -> Feedback {
        match self.engine.erase(index) {
            Ok(()) => {
                if !self.engine.is_assist_available(AssistKind::Eraser) {
                    self.eraser_mode = false;
                }
                Feedback::new(Tone::Success, "Number erased")
                    .with_sound(Sound::AssistUse)
                    .changed()
            }
            Err(err) => {
                if matches!(err, AssistError::LimitReached(_)) {
                    self.eraser_mode = false;
                }
                assist_failed(err)
            }
        }
    }

    fn add_numbers(&mut self) -> Feedback {
        if !self.engine.is_assist_available(AssistKind::AddNumbers) {
            return assist_failed(AssistError::LimitReached(AssistKind::AddNumbers));
        }
        if self.engine.add_numbers_reaches_row_limit() {
            log::debug!("Add Numbers would reach the row limit");
            self.forced_loss = Some(LossReason::GridLimit);
            return Feedback::default().changed();
        }

        match self.engine.add_numbers() {
            Ok(added) => Feedback::new(Tone::Success, format!("{added} numbers added to grid"))
                .with_sound(Sound::AssistUse)
                .changed(),
            Err(err) => assist_failed(err),
        }
    }

    fn toggle_eraser(&mut self) -> Feedback {
        if self.eraser_mode {
            self.eraser_mode = false;
            return Feedback::new(Tone::Info, "Eraser off");
        }
        if !self.engine.is_assist_available(AssistKind::Eraser) {
            return assist_failed(AssistError::LimitReached(AssistKind::Eraser));
        }
        self.eraser_mode = true;
        Feedback::new(
            Tone::Info,
            "Eraser on: pick a number to erase it, `e` again to cancel",
        )
    }
}

fn assist_failed(err: AssistError) -> Feedback {
    Feedback::new(Tone::Warning, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairup_core::{GRID_COLUMNS, Snapshot, Tile};

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    fn session_from(cells: Vec<Option<u8>>, score: u32) -> GameSession {
        let cells = cells
            .into_iter()
            .map(|value| value.map(|value| Tile::try_from(value).unwrap()))
            .collect();
        let saved = SavedGame {
            logic: Snapshot {
                grid: pairup_core::Grid::from_cells(cells),
                score,
                ..Default::default()
            },
            ..Default::default()
        };
        GameSession::resume(saved, 0, at(0)).unwrap()
    }

    #[test]
    fn valid_pair_scores_and_clears() {
        let mut session = GameSession::new(Mode::Classic, 1, at(0));

        let feedback = session.apply(Action::Cell(0));
        assert_eq!(feedback.sound, Some(Sound::Select));
        assert!(!feedback.changed);

        let feedback = session.apply(Action::Cell(9));
        assert_eq!(feedback.sound, Some(Sound::ValidPair));
        assert!(feedback.changed);
        assert_eq!(
            feedback.message,
            Some((Tone::Success, "Valid pair. +1 points".to_owned()))
        );
        assert_eq!(session.engine().score(), 1);
        assert_eq!(session.status(), GameStatus::Playing);
    }

    #[test]
    fn invalid_pair_clears_selection_at_once() {
        let mut session = GameSession::new(Mode::Classic, 1, at(0));
        session.apply(Action::Cell(0));
        let feedback = session.apply(Action::Cell(10));

        assert_eq!(feedback.sound, Some(Sound::InvalidPair));
        assert!(session.engine().selected().is_empty());
        assert_eq!(session.engine().grid().tile_count(), 27);
    }

    #[test]
    fn empty_cell_is_reported() {
        let mut session = session_from(vec![Some(1), None, Some(9)], 0);
        let feedback = session.apply(Action::Cell(1));
        assert_eq!(
            feedback.message,
            Some((Tone::Warning, "Cell 1 is empty".to_owned()))
        );
    }

    #[test]
    fn eraser_mode_erases_and_disarms_when_used_up() {
        let mut session = GameSession::new(Mode::Classic, 1, at(0));
        session.apply(Action::ToggleEraser);
        assert!(session.eraser_mode());

        for index in 0..5 {
            let feedback = session.apply(Action::Cell(index));
            assert_eq!(feedback.sound, Some(Sound::AssistUse));
        }

        assert!(!session.eraser_mode());
        assert_eq!(session.engine().grid().tile_count(), 22);

        let feedback = session.apply(Action::ToggleEraser);
        assert!(!session.eraser_mode());
        assert_eq!(
            feedback.message,
            Some((Tone::Warning, "Eraser limit reached".to_owned()))
        );
    }

    #[test]
    fn eraser_toggles_off() {
        let mut session = GameSession::new(Mode::Classic, 1, at(0));
        session.apply(Action::ToggleEraser);
        session.apply(Action::ToggleEraser);
        assert!(!session.eraser_mode());

        session.apply(Action::Cell(0));
        assert_eq!(session.engine().selected(), &[0]);
    }

    #[test]
    fn revert_without_move_warns() {
        let mut session = GameSession::new(Mode::Classic, 1, at(0));
        let feedback = session.apply(Action::Revert);
        assert!(!feedback.changed);
        assert_eq!(
            feedback.message,
            Some((Tone::Warning, "No moves to revert".to_owned()))
        );
    }

    #[test]
    fn hint_reports_capped_count() {
        let mut session = GameSession::new(Mode::Classic, 1, at(0));
        let feedback = session.apply(Action::Hint);
        assert_eq!(
            feedback.message,
            Some((Tone::Info, "Available moves: 5+".to_owned()))
        );
    }

    #[test]
    fn add_numbers_reaching_row_limit_loses() {
        let cells = (0..GRID_COLUMNS * 48)
            .map(|index| Some(1 + (index % GRID_COLUMNS) as u8))
            .collect();
        let mut session = session_from(cells, 0);
        let grid_before = session.engine().grid().clone();

        let feedback = session.apply(Action::AddNumbers);

        assert!(feedback.changed);
        assert_eq!(session.engine().grid(), &grid_before);
        assert_eq!(session.status(), GameStatus::Lost(LossReason::GridLimit));
    }

    #[test]
    fn growing_near_row_limit_warns() {
        let mut cells = vec![None; GRID_COLUMNS * 44 - 10];
        cells.extend([1, 2, 3, 4, 5, 6, 7, 8, 9, 1].map(Some));
        let mut session = session_from(cells, 0);

        let feedback = session.apply(Action::AddNumbers);

        assert_eq!(session.engine().row_count(), 46);
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(
            feedback.warnings,
            ["Warning: Only 4 lines left before grid limit!"]
        );
    }

    #[test]
    fn stuck_board_asks_for_assists() {
        let mut session = session_from(vec![Some(1), Some(2)], 0);

        let feedback = session.apply(Action::Hint);
        assert_eq!(
            feedback.message,
            Some((Tone::Info, "Available moves: 0".to_owned()))
        );
        assert_eq!(
            feedback.warnings,
            ["No valid moves left! Use your remaining assists."]
        );

        let feedback = session.apply(Action::Shuffle);
        assert_eq!(
            feedback.warnings,
            ["No valid moves left! Use your remaining assists."]
        );
        assert_eq!(session.status(), GameStatus::Playing);
    }

    #[test]
    fn selecting_does_not_repeat_warnings() {
        let mut session = session_from(vec![Some(1), Some(2)], 0);
        let feedback = session.apply(Action::Cell(0));
        assert!(feedback.warnings.is_empty());
    }

    #[test]
    fn add_numbers_counts_only_tiles_still_on_the_board() {
        // 440 cells over 49 rows with one tile left; appending it keeps 49 rows.
        let mut cells = vec![None; GRID_COLUMNS * 49 - 2];
        cells.push(Some(1));
        let mut session = session_from(cells, 0);
        assert!(!session.engine().add_numbers_reaches_row_limit());

        let feedback = session.apply(Action::AddNumbers);

        assert_eq!(
            feedback.message,
            Some((Tone::Success, "1 numbers added to grid".to_owned()))
        );
        assert_eq!(session.engine().row_count(), 49);
        assert_eq!(session.engine().grid().tile_count(), 2);
        assert_eq!(session.status(), GameStatus::Playing);
        assert_eq!(
            feedback.warnings,
            ["Warning: Only 1 lines left before grid limit!"]
        );
    }

    #[test]
    fn reaching_winning_score_wins() {
        let mut session = session_from(vec![Some(5), Some(5), Some(1)], 98);
        session.apply(Action::Cell(0));
        session.apply(Action::Cell(1));

        assert_eq!(session.status(), GameStatus::Won);
        let result = session.to_result(at(75));
        assert!(result.won);
        assert_eq!(result.score, 101);
        assert_eq!(result.time, "01:15");
    }

    #[test]
    fn elapsed_time_carries_over_resume() {
        let session = GameSession::new(Mode::Random, 3, at(0));
        let saved = session.to_saved(at(90));
        assert_eq!(saved.elapsed_time, 90_000);

        let resumed = GameSession::resume(saved, 3, at(1000)).unwrap();
        assert_eq!(resumed.elapsed_ms(at(1030)), 120_000);
        assert_eq!(resumed.mode(), Mode::Random);
    }

    #[test]
    fn empty_save_does_not_resume() {
        assert!(GameSession::resume(SavedGame::default(), 0, at(0)).is_none());
    }
}
