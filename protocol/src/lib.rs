//! Records the frontend persists between sessions.
//!
//! Each record is stored as JSON under its own key.

pub use results::*;
pub use saved::*;
pub use settings::*;

mod results;
mod saved;
mod settings;

pub const SAVED_GAME_KEY: &str = "pairEmUpSavedGame";
pub const RESULTS_KEY: &str = "pairEmUpGameResults";
pub const SETTINGS_KEY: &str = "pairEmUpSettings";

/// A record kept under a fixed key.
pub trait StorageKey {
    const KEY: &'static str;
}

impl StorageKey for SavedGame {
    const KEY: &'static str = SAVED_GAME_KEY;
}

impl StorageKey for ResultsLog {
    const KEY: &'static str = RESULTS_KEY;
}

impl StorageKey for Settings {
    const KEY: &'static str = SETTINGS_KEY;
}

/// Formats a duration in milliseconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so long games read `123:04`.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Parses `MM:SS` back into whole seconds.
pub fn parse_elapsed(time: &str) -> Option<u64> {
    let (minutes, seconds) = time.split_once(':')?;
    let minutes: u64 = minutes.trim().parse().ok()?;
    let seconds: u64 = seconds.trim().parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(minutes * 60 + seconds)
}
