//! Manual page lookup for the word under the cursor.
//!
//! The page itself is rendered by the system `man` command with the TUI
//! suspended, so pager behavior, formatting, and MANPATH handling all stay
//! the terminal's problem.

use std::io::Stdout;
use std::process::{Command, Stdio};

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// The maximal alphanumeric-or-underscore run around byte column `cx`.
///
/// A cursor sitting one past the end of the line counts as sitting on the
/// last byte, so `K` works at end of line. Returns `None` on an empty line
/// or when the cursor touches no word characters.
pub fn word_under_cursor(text: &str, cx: usize) -> Option<&str> {
    if text.is_empty() {
        return None;
    }
    let bytes = text.as_bytes();
    let mut cx = cx.min(bytes.len());
    if cx >= bytes.len() && cx > 0 {
        cx -= 1;
    }

    let mut start = cx;
    while start > 0 && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = cx;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }

    (start < end).then(|| &text[start..end])
}

/// Whether `man` knows a page for `word`, probed with `man -w` so nothing
/// is displayed.
pub fn entry_exists(word: &str) -> bool {
    Command::new("man")
        .arg("-w")
        .arg(word)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Suspend the TUI, run `man <word>` with the real terminal, and restore.
///
/// The screen is cleared on return so the next frame repaints everything the
/// pager overwrote.
pub fn show(terminal: &mut Terminal<CrosstermBackend<Stdout>>, word: &str) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    let result = Command::new("man").arg(word).status();

    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    enable_raw_mode()?;
    terminal.clear()?;

    result.with_context(|| format!("failed to run man {word}"))?;
    Ok(())
}
