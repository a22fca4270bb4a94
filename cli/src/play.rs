use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::Utc;
use pairup_core::{GameStatus, Mode};
use pairup_protocol::{ResultsLog, SavedGame, Settings, format_elapsed};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::render::{self, Palette};
use crate::session::{Action, GameSession, Sound, Tone};
use crate::storage::Store;

/// A line typed during a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Action(Action),
    Save,
    Reset,
    Menu,
    Help,
}

impl FromStr for Input {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse() {
            return Ok(Self::Action(Action::Cell(index)));
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "c" | "clear" => Self::Action(Action::ClearSelection),
            "h" | "hint" => Self::Action(Action::Hint),
            "u" | "revert" => Self::Action(Action::Revert),
            "a" | "add" => Self::Action(Action::AddNumbers),
            "s" | "shuffle" => Self::Action(Action::Shuffle),
            "e" | "eraser" => Self::Action(Action::ToggleEraser),
            "save" => Self::Save,
            "reset" => Self::Reset,
            "q" | "quit" | "menu" => Self::Menu,
            "?" | "help" => Self::Help,
            _ => return Err(format!("Unknown command `{s}`, type `?` for help")),
        })
    }
}

/// Drives games between the terminal and the store.
pub(crate) struct Frontend<R, W> {
    store: Store,
    settings: Settings,
    palette: Palette,
    seeds: SmallRng,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Frontend<R, W> {
    pub(crate) fn new(
        store: Store,
        settings: Settings,
        palette: Palette,
        seed: u64,
        input: R,
        out: W,
    ) -> Self {
        Self {
            store,
            settings,
            palette,
            seeds: SmallRng::seed_from_u64(seed),
            input,
            out,
        }
    }

    pub(crate) fn new_game(&mut self, mode: Mode) -> Result<()> {
        let session = GameSession::new(mode, self.seeds.random(), Utc::now());
        self.play(session)
    }

    /// Resumes the saved game; a save that cannot be read is removed.
    pub(crate) fn continue_game(&mut self) -> Result<()> {
        let saved = match self.store.load::<SavedGame>() {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                writeln!(self.out, "No saved game")?;
                return Ok(());
            }
            Err(err) => {
                log::error!("Could not load saved game: {err:#}");
                writeln!(
                    self.out,
                    "{}",
                    self.palette.message(Tone::Error, "Error loading saved game")
                )?;
                self.store.delete::<SavedGame>()?;
                return Ok(());
            }
        };

        match GameSession::resume(saved, self.seeds.random(), Utc::now()) {
            Some(session) => {
                writeln!(
                    self.out,
                    "{}",
                    self.palette.message(Tone::Success, "Saved game loaded successfully")
                )?;
                self.play(session)
            }
            None => {
                writeln!(
                    self.out,
                    "{}",
                    self.palette.message(Tone::Error, "No valid saved game found")
                )?;
                Ok(())
            }
        }
    }

    fn play(&mut self, mut session: GameSession) -> Result<()> {
        self.show_board(&session)?;
        if self.finish_if_over(&session)? {
            return Ok(());
        }

        let mut line = String::new();
        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                self.auto_save(&session);
                return Ok(());
            }

            let input = match line.parse::<Input>() {
                Ok(input) => input,
                Err(err) => {
                    writeln!(self.out, "{err}")?;
                    continue;
                }
            };

            match input {
                Input::Help => {
                    writeln!(self.out, "{}", render::HELP)?;
                    continue;
                }
                Input::Menu => {
                    self.auto_save(&session);
                    return Ok(());
                }
                Input::Save => self.save(&session, true)?,
                Input::Reset => {
                    self.store.delete::<SavedGame>()?;
                    session = GameSession::new(session.mode(), self.seeds.random(), Utc::now());
                }
                Input::Action(action) => {
                    let feedback = session.apply(action);
                    if let Some(sound) = feedback.sound {
                        self.play_sound(sound)?;
                    }
                    if let Some((tone, message)) = &feedback.message {
                        writeln!(self.out, "{}", self.palette.message(*tone, message))?;
                    }
                    for warning in &feedback.warnings {
                        writeln!(self.out, "{}", self.palette.message(Tone::Warning, warning))?;
                    }
                    if self.finish_if_over(&session)? {
                        return Ok(());
                    }
                    if feedback.changed {
                        self.auto_save(&session);
                    }
                }
            }

            self.show_board(&session)?;
        }
    }

    fn show_board(&mut self, session: &GameSession) -> Result<()> {
        let board = render::board(session, &self.palette, Utc::now());
        write!(self.out, "{board}")?;
        Ok(())
    }

    /// Records the result and drops the save once the game is over.
    fn finish_if_over(&mut self, session: &GameSession) -> Result<bool> {
        let status = session.status();
        if !status.is_finished() {
            return Ok(false);
        }

        let now = Utc::now();
        let result = session.to_result(now);
        match self.store.load::<ResultsLog>() {
            Ok(results) => {
                let mut results = results.unwrap_or_default();
                results.push(result);
                self.store
                    .save(&results)
                    .context("saving game results")?;
            }
            Err(err) => log::error!("Not recording result over unreadable results: {err:#}"),
        }
        self.store.delete::<SavedGame>()?;

        let score = session.engine().score();
        let time = format_elapsed(session.elapsed_ms(now));
        let (tone, sound, message) = match status {
            GameStatus::Won => (
                Tone::Success,
                Sound::Win,
                format!("Congratulations! You won with {score} points in {time}!"),
            ),
            GameStatus::Lost(reason) => (Tone::Error, Sound::Lose, format!("Game over: {reason}")),
            GameStatus::Playing => return Ok(false),
        };
        log::info!("Game finished: {status:?} with {score} points in {time}");

        self.play_sound(sound)?;
        writeln!(self.out, "{}", self.palette.message(tone, &message))?;
        Ok(true)
    }

    fn play_sound(&mut self, sound: Sound) -> Result<()> {
        if self.settings.sound && sound.rings_bell() {
            write!(self.out, "\x07")?;
        }
        Ok(())
    }

    fn auto_save(&mut self, session: &GameSession) {
        if self.settings.auto_save {
            if let Err(err) = self.save(session, false) {
                log::error!("Auto-save failed: {err:#}");
            }
        }
    }

    fn save(&mut self, session: &GameSession, notify: bool) -> Result<()> {
        let saved = session.to_saved(Utc::now());
        match self.store.save(&saved) {
            Ok(()) if notify => writeln!(
                self.out,
                "{}",
                self.palette.message(Tone::Success, "Game saved successfully")
            )?,
            Ok(()) => {}
            Err(err) => {
                log::error!("Could not save game: {err:#}");
                if notify {
                    writeln!(
                        self.out,
                        "{}",
                        self.palette.message(Tone::Error, "Error saving game")
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use pairup_protocol::{RESULTS_KEY, SAVED_GAME_KEY};

    use super::*;
    use crate::storage::tests::unique_temp_store;

    fn frontend(store: &Store, settings: Settings, script: &str) -> Frontend<Cursor<String>, Vec<u8>> {
        Frontend::new(
            store.clone(),
            settings,
            Palette::PLAIN,
            7,
            Cursor::new(script.to_owned()),
            Vec::new(),
        )
    }

    fn output(frontend: Frontend<Cursor<String>, Vec<u8>>) -> String {
        String::from_utf8(frontend.out).unwrap()
    }

    #[test]
    fn inputs_parse() {
        assert_eq!("12".parse::<Input>(), Ok(Input::Action(Action::Cell(12))));
        assert_eq!(" H \n".parse::<Input>(), Ok(Input::Action(Action::Hint)));
        assert_eq!("e".parse::<Input>(), Ok(Input::Action(Action::ToggleEraser)));
        assert_eq!("menu".parse::<Input>(), Ok(Input::Menu));
        assert_eq!("save".parse::<Input>(), Ok(Input::Save));
        assert!("-3".parse::<Input>().is_err());
        assert!("jump".parse::<Input>().is_err());
    }

    #[test]
    fn valid_pair_is_auto_saved() {
        let store = unique_temp_store("play_autosave");
        let mut frontend = frontend(&store, Settings::default(), "0\n9\nq\n");

        frontend.new_game(Mode::Classic).unwrap();

        assert!(output(frontend).contains("Valid pair. +1 points"));
        let saved: SavedGame = store.load().unwrap().unwrap();
        assert_eq!(saved.logic.score, 1);
        assert_eq!(saved.logic.mode, Mode::Classic);

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn nothing_is_saved_without_auto_save() {
        let store = unique_temp_store("play_no_autosave");
        let settings = Settings {
            auto_save: false,
            ..Default::default()
        };
        let mut frontend = frontend(&store, settings, "0\n9\n");

        frontend.new_game(Mode::Classic).unwrap();

        assert!(store.load::<SavedGame>().unwrap().is_none());
    }

    #[test]
    fn explicit_save_and_continue() {
        let store = unique_temp_store("play_continue");
        let settings = Settings {
            auto_save: false,
            ..Default::default()
        };
        let mut first = frontend(&store, settings, "0\n9\nsave\nq\n");
        first.new_game(Mode::Classic).unwrap();
        assert!(output(first).contains("Game saved successfully"));

        let mut second = frontend(&store, settings, "q\n");
        second.continue_game().unwrap();
        let out = output(second);
        assert!(out.contains("Saved game loaded successfully"));
        assert!(out.contains("Score: 1/100"));

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn corrupt_save_is_removed() {
        let store = unique_temp_store("play_corrupt");
        fs::create_dir_all(store.dir()).unwrap();
        fs::write(
            store.dir().join(format!("{SAVED_GAME_KEY}.json")),
            r#""not a game""#,
        )
        .unwrap();

        let mut frontend = frontend(&store, Settings::default(), "");
        frontend.continue_game().unwrap();

        assert!(output(frontend).contains("Error loading saved game"));
        assert!(store.load::<SavedGame>().unwrap().is_none());

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn reset_drops_the_save() {
        let store = unique_temp_store("play_reset");
        let settings = Settings {
            auto_save: false,
            ..Default::default()
        };
        let mut frontend = frontend(&store, settings, "save\nreset\n");

        frontend.new_game(Mode::Random).unwrap();

        assert!(store.load::<SavedGame>().unwrap().is_none());
        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn finished_game_is_recorded() {
        let store = unique_temp_store("play_finished");
        let mut engine_state = pairup_core::PuzzleEngine::new(Mode::Classic, 0).to_snapshot();
        engine_state.score = 99;
        let saved = SavedGame {
            logic: engine_state,
            ..Default::default()
        };
        store.save(&saved).unwrap();

        let mut frontend = frontend(&store, Settings::default(), "0\n9\n");
        frontend.continue_game().unwrap();

        let out = output(frontend);
        assert!(out.contains("Congratulations! You won with 100 points"));
        assert!(out.contains('\x07'));
        let results: ResultsLog = store.load().unwrap().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|result| result.won && result.score == 100));
        assert!(store.load::<SavedGame>().unwrap().is_none());

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn unreadable_results_are_left_alone() {
        let store = unique_temp_store("play_bad_results");
        let mut engine_state = pairup_core::PuzzleEngine::new(Mode::Classic, 0).to_snapshot();
        engine_state.score = 99;
        store
            .save(&SavedGame {
                logic: engine_state,
                ..Default::default()
            })
            .unwrap();
        let results_path = store.dir().join(format!("{RESULTS_KEY}.json"));
        fs::write(&results_path, "[{broken").unwrap();

        let mut frontend = frontend(&store, Settings::default(), "0\n9\n");
        frontend.continue_game().unwrap();

        assert!(output(frontend).contains("Congratulations!"));
        assert_eq!(fs::read_to_string(&results_path).unwrap(), "[{broken");
        assert!(store.load::<SavedGame>().unwrap().is_none());

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn board_warnings_are_printed() {
        let store = unique_temp_store("play_warnings");
        store
            .save(&SavedGame {
                logic: pairup_core::Snapshot {
                    grid: pairup_core::Grid::from_tiles(
                        [1u8, 2].map(|value| pairup_core::Tile::try_from(value).unwrap()),
                    ),
                    ..Default::default()
                },
                ..Default::default()
            })
            .unwrap();

        let mut frontend = frontend(&store, Settings::default(), "h\nq\n");
        frontend.continue_game().unwrap();

        assert!(output(frontend).contains("No valid moves left! Use your remaining assists."));

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn unknown_command_keeps_playing() {
        let store = unique_temp_store("play_unknown");
        let settings = Settings {
            auto_save: false,
            ..Default::default()
        };
        let mut frontend = frontend(&store, settings, "jump\n?\nq\n");

        frontend.new_game(Mode::Chaotic).unwrap();

        let out = output(frontend);
        assert!(out.contains("Unknown command `jump`"));
        assert!(out.contains("Commands:"));
    }
}
