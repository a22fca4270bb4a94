use chrono::{DateTime, Local, Utc};
use pairup_core::{AssistKind, GRID_COLUMNS, MAX_ROWS, WINNING_SCORE};
use pairup_protocol::{GameResult, Theme, format_elapsed};

use crate::session::{GameSession, Tone};

/// ANSI escapes used for one theme.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    selected: &'static str,
    empty: &'static str,
    success: &'static str,
    warning: &'static str,
    error: &'static str,
    reset: &'static str,
}

impl Palette {
    pub(crate) const PLAIN: Self = Self {
        selected: "",
        empty: "",
        success: "",
        warning: "",
        error: "",
        reset: "",
    };

    pub(crate) const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                selected: "\x1b[1;34m",
                empty: "\x1b[2m",
                success: "\x1b[32m",
                warning: "\x1b[33m",
                error: "\x1b[31m",
                reset: "\x1b[0m",
            },
            Theme::Dark => Self {
                selected: "\x1b[1;93m",
                empty: "\x1b[90m",
                success: "\x1b[92m",
                warning: "\x1b[93m",
                error: "\x1b[91m",
                reset: "\x1b[0m",
            },
        }
    }

    pub(crate) fn message(&self, tone: Tone, text: &str) -> String {
        let color = match tone {
            Tone::Info => "",
            Tone::Success => self.success,
            Tone::Warning => self.warning,
            Tone::Error => self.error,
        };
        if color.is_empty() {
            text.to_owned()
        } else {
            format!("{color}{text}{}", self.reset)
        }
    }
}

/// Status line, numbered grid and assist bar.
pub(crate) fn board(session: &GameSession, palette: &Palette, now: DateTime<Utc>) -> String {
    let engine = session.engine();
    let mut out = String::new();

    out.push_str(&format!(
        "Mode: {}   Score: {}/{WINNING_SCORE}   Time: {}   Rows: {}/{MAX_ROWS}\n",
        engine.mode(),
        engine.score(),
        format_elapsed(session.elapsed_ms(now)),
        engine.row_count(),
    ));

    out.push_str("     ");
    for column in 0..GRID_COLUMNS {
        out.push_str(&format!("{column:^3}"));
    }
    out.push('\n');

    for (row, cells) in engine.grid().cells().chunks(GRID_COLUMNS).enumerate() {
        let first = row * GRID_COLUMNS;
        out.push_str(&format!("{first:>4} "));
        for (offset, cell) in cells.iter().enumerate() {
            let index = first + offset;
            let shown = match cell {
                Some(tile) if engine.is_selected(index) => {
                    format!("{}[{tile}]{}", palette.selected, palette.reset)
                }
                Some(tile) => format!(" {tile} "),
                None => format!("{} . {}", palette.empty, palette.reset),
            };
            out.push_str(&shown);
        }
        out.push('\n');
    }

    let info = engine.assist_info();
    let mut assists = Vec::new();
    for (kind, info) in info.iter() {
        let key = match kind {
            AssistKind::Hints => 'h',
            AssistKind::Revert => 'u',
            AssistKind::AddNumbers => 'a',
            AssistKind::Shuffle => 's',
            AssistKind::Eraser => 'e',
        };
        let state = match (kind, info.limit) {
            (AssistKind::Revert, _) if info.available => "ready".to_owned(),
            (AssistKind::Revert, _) => "-".to_owned(),
            (_, Some(limit)) => format!("{}/{limit}", info.used),
            (_, None) => format!("{}", info.used),
        };
        let armed = if kind == AssistKind::Eraser && session.eraser_mode() {
            " (on)"
        } else {
            ""
        };
        assists.push(format!("[{key}] {kind} {state}{armed}"));
    }
    out.push_str(&assists.join("  "));
    out.push('\n');

    out
}

pub(crate) const HELP: &str = "\
Commands:
  <n>      select cell n (erase it while the eraser is on)
  c        clear selection
  h        hint: count available moves
  u        revert the last pair
  a        add numbers
  s        shuffle
  e        toggle eraser
  save     save the game
  reset    start over in the same mode
  q, menu  leave the game
  ?        this help";

/// Table of finished games in the given order.
pub(crate) fn results<'a>(results: impl IntoIterator<Item = &'a GameResult>) -> String {
    let mut out = format!(
        "{:<3} {:<8} {:<6} {:>5} {:>7}  {}\n",
        "#", "Mode", "Result", "Score", "Time", "Date"
    );
    for (rank, result) in results.into_iter().enumerate() {
        let outcome = if result.won { "Won" } else { "Lost" };
        let date = result.date.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        out.push_str(&format!(
            "{:<3} {:<8} {:<6} {:>5} {:>7}  {date}\n",
            rank + 1,
            result.mode.as_str(),
            outcome,
            result.score,
            result.time,
        ));
    }
    out
}
