//! calcpad: a terminal notepad that evaluates every line as a formula.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p calcpad-tui -- notes.calc
//! cargo run -p calcpad-tui -- --trigger change --log-file calcpad.log
//! ```
//!
//! Lines are plain arithmetic (`+ - * / % **`, parentheses) and may refer to the previous
//! results with `ans(n)`. Handles (`@name`), hashtags (`#tag`) and digits are highlighted.
//!
//! # Keys
//!
//! - Enter: new line, then evaluate (always)
//! - Ctrl+E: evaluate now
//! - Ctrl+T: switch between evaluating on Enter and on every change
//! - Ctrl+R: show/hide the raw content pane
//! - Ctrl+S: save
//! - Ctrl+Q: quit

mod app;
mod config;

use app::{App, AppError, Settings};
use calcpad_eval::TriggerPolicy;
use clap::Parser;
use config::{CalcpadConfig, ConfigError};
use crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    fs::OpenOptions,
    io::{self, stdout},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calcpad", version, about = "Line-by-line calculator notepad")]
struct Args {
    /// File to open (created on save if missing).
    file: Option<PathBuf>,

    /// Config file. Defaults to ./calcpad.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// When to re-evaluate: "enter" or "change". Overrides the config file.
    #[arg(short, long)]
    trigger: Option<TriggerPolicy>,

    /// Write logs to this file. Without it nothing is logged.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter directive; RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("calcpad: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    if let Some(path) = &args.log_file {
        init_logging(path, &args.log_level)?;
    }

    let config = CalcpadConfig::load(args.config.as_deref())?;
    let settings = Settings {
        policy: args.trigger.unwrap_or(config.trigger.mode),
        palette: config.styles.palette()?,
        show_raw: config.view.show_raw,
    };
    tracing::info!(policy = %settings.policy, file = ?args.file, "starting calcpad");

    let mut app = App::open(args.file, settings)?;

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result.map_err(Error::from)
}

/// The terminal belongs to the UI, so logs only ever go to a file.
fn init_logging(path: &Path, level: &str) -> Result<(), Error> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| Error::LogFile {
            path: path.to_path_buf(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Paste(text) => app.handle_paste(text),
                _ => {}
            }
        }
    }

    Ok(())
}
