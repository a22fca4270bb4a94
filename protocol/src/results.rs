use chrono::{DateTime, Utc};
use pairup_core::{Mode, Score};
use serde::{Deserialize, Serialize};

use crate::{format_elapsed, parse_elapsed};

/// How many finished games the log remembers.
pub const RESULTS_KEPT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub mode: Mode,
    pub won: bool,
    pub score: Score,
    /// Play time as `MM:SS`.
    pub time: String,
    pub date: DateTime<Utc>,
}

impl GameResult {
    pub fn new(mode: Mode, won: bool, score: Score, elapsed_ms: u64, date: DateTime<Utc>) -> Self {
        Self {
            mode,
            won,
            score,
            time: format_elapsed(elapsed_ms),
            date,
        }
    }

    /// Play time in seconds; unreadable times sort last.
    pub fn seconds(&self) -> u64 {
        parse_elapsed(&self.time).unwrap_or(u64::MAX)
    }
}

/// The most recent finished games, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GameResult>", into = "Vec<GameResult>")]
pub struct ResultsLog {
    results: Vec<GameResult>,
}

impl From<Vec<GameResult>> for ResultsLog {
    fn from(mut results: Vec<GameResult>) -> Self {
        if results.len() > RESULTS_KEPT {
            log::debug!("Trimming {} stored results to {RESULTS_KEPT}", results.len());
            results.drain(..results.len() - RESULTS_KEPT);
        }
        Self { results }
    }
}

impl From<ResultsLog> for Vec<GameResult> {
    fn from(log: ResultsLog) -> Self {
        log.results
    }
}

impl ResultsLog {
    pub fn push(&mut self, result: GameResult) {
        self.results.push(result);
        if self.results.len() > RESULTS_KEPT {
            self.results.remove(0);
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &GameResult> {
        self.results.iter()
    }

    /// Fastest games first.
    pub fn best_times(&self) -> Vec<&GameResult> {
        let mut results: Vec<_> = self.results.iter().collect();
        results.sort_by_key(|result| result.seconds());
        results
    }

    /// Highest score first, ties broken by the faster game.
    pub fn best_scores(&self) -> Vec<&GameResult> {
        let mut results: Vec<_> = self.results.iter().collect();
        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.seconds().cmp(&b.seconds()))
        });
        results
    }

    /// Returns false when there was nothing to clear.
    pub fn clear(&mut self) -> bool {
        let had_results = !self.results.is_empty();
        self.results.clear();
        had_results
    }
}
