use std::fs::File;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use ked::config::Config;
use ked::editor::Editor;
use ked::input::{Action, InputHandler};
use ked::{help, manual, render};

/// A small modal terminal text editor
#[derive(Parser, Debug)]
#[command(name = "ked")]
#[command(about = "A modal terminal text editor", long_about = None)]
#[command(version)]
struct Args {
    /// Files to open, each in its own buffer
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: system temp dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Logs go to a file, never stdout: stdout is the screen.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => std::env::temp_dir().join("ked.log"),
    };
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    match (&args.config, Config::default_path()) {
        (Some(path), _) => Config::load(path),
        (None, Some(path)) => Config::load(&path),
        (None, None) => Ok(Config::default()),
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

/// Restores the terminal however `run` exits.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    editor: &mut Editor,
    config: &Config,
) -> Result<()> {
    let mut input = InputHandler::new();
    loop {
        terminal.draw(|frame| render::draw(frame, editor, config))?;

        let key = match event::read()? {
            Event::Key(key) => key,
            // Resize and the rest just trigger the next draw.
            _ => continue,
        };

        let size = terminal.size()?;
        let action = input.handle_key(editor, key, size.height as usize, size.width as usize, config);
        match action {
            Action::Continue => {}
            Action::Quit => return Ok(()),
            Action::ShowHelp => help::show(terminal)?,
            Action::ShowManual(word) => manual::show(terminal, &word)?,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;
    let config = load_config(&args)?;

    let mut editor = Editor::from_files(&args.files);
    tracing::info!(buffers = editor.buffers().len(), "starting");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        restore_terminal();
        original_hook(panic);
    }));

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;
    let result = run(&mut terminal, &mut editor, &config);

    drop(_guard);
    tracing::info!("exiting");
    result
}
