use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pairup_core::Mode;
use pairup_protocol::{ResultsLog, Settings, Theme};

use crate::play::Frontend;
use crate::render::Palette;
use crate::storage::Store;

mod play;
mod render;
mod session;
mod storage;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Where saved games, results and settings are kept
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Start a new game
    Play {
        #[arg(short, long, default_value_t = Mode::Classic)]
        mode: Mode,
    },
    /// Resume the saved game
    Continue,
    /// Show the last finished games
    Results {
        #[arg(long, value_enum, default_value_t = ResultsOrder::Time)]
        by: ResultsOrder,
    },
    /// Forget all finished games
    ClearResults,
    /// Show or change settings
    Settings {
        #[arg(long, value_enum)]
        sound: Option<Toggle>,
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long, value_enum)]
        auto_save: Option<Toggle>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ResultsOrder {
    /// Fastest first
    Time,
    /// Highest score first
    Score,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::On
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");

    let store = Store::new(args.data_dir.unwrap_or_else(Store::default_dir));
    log::debug!("data dir: {}", store.dir().display());
    let settings: Settings = store.load_or_default();

    let mut out = io::stdout().lock();
    match args.command {
        Command::Play { mode } => frontend(store, settings, seed).new_game(mode),
        Command::Continue => frontend(store, settings, seed).continue_game(),
        Command::Results { by } => show_results(&store, by, &mut out),
        Command::ClearResults => clear_results(&store, &mut out),
        Command::Settings {
            sound,
            theme,
            auto_save,
        } => {
            let mut settings = settings;
            let changed = update_settings(&mut settings, sound, theme, auto_save);
            if changed {
                store
                    .save(&settings)
                    .context("saving settings")?;
                writeln!(out, "Settings saved successfully")?;
            }
            writeln!(
                out,
                "sound: {}\ntheme: {}\nauto-save: {}",
                on_off(settings.sound),
                settings.theme,
                on_off(settings.auto_save),
            )?;
            Ok(())
        }
    }
}

fn frontend(
    store: Store,
    settings: Settings,
    seed: u64,
) -> Frontend<io::StdinLock<'static>, io::StdoutLock<'static>> {
    let stdout = io::stdout();
    let palette = if stdout.is_terminal() {
        Palette::for_theme(settings.theme)
    } else {
        Palette::PLAIN
    };
    Frontend::new(
        store,
        settings,
        palette,
        seed,
        io::stdin().lock(),
        stdout.lock(),
    )
}

fn show_results(store: &Store, order: ResultsOrder, out: &mut impl Write) -> Result<()> {
    let results: ResultsLog = store.load_or_default();
    if results.is_empty() {
        writeln!(
            out,
            "No game results yet. Play some games to see your results here."
        )?;
        return Ok(());
    }

    let ordered = match order {
        ResultsOrder::Time => results.best_times(),
        ResultsOrder::Score => results.best_scores(),
    };
    write!(out, "{}", render::results(ordered))?;
    Ok(())
}

fn clear_results(store: &Store, out: &mut impl Write) -> Result<()> {
    let mut results: ResultsLog = store.load_or_default();
    if results.clear() {
        store
            .save(&results)
            .context("clearing game results")?;
        writeln!(out, "Game results cleared")?;
    } else {
        writeln!(out, "No game results to clear")?;
    }
    Ok(())
}

/// Returns whether anything changed.
fn update_settings(
    settings: &mut Settings,
    sound: Option<Toggle>,
    theme: Option<Theme>,
    auto_save: Option<Toggle>,
) -> bool {
    let before = *settings;
    if let Some(sound) = sound {
        settings.sound = sound.into();
    }
    if let Some(theme) = theme {
        settings.theme = theme;
    }
    if let Some(auto_save) = auto_save {
        settings.auto_save = auto_save.into();
    }
    *settings != before
}

const fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}
