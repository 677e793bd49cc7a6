//! Built-in help page.
//!
//! Runs its own small event loop on the shared terminal until dismissed,
//! then clears so the editor repaints cleanly.

use std::io::Stdout;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};

const HELP_TEXT: &[&str] = &[
    "",
    "NORMAL mode",
    "  h j k l / arrows   move the cursor",
    "  Enter              move down one line",
    "  PageUp / PageDown  move one screen",
    "  g g                jump to the first line",
    "  G                  jump to the last line",
    "  [ / ]              previous / next buffer",
    "  i                  enter INSERT mode",
    "  w                  write the buffer to its file",
    "  e                  open the file explorer",
    "  K                  man page for the word under the cursor",
    "  H                  this page",
    "  q                  quit",
    "",
    "INSERT mode",
    "  Esc                back to NORMAL mode",
    "  Backspace / Delete delete before / under the cursor",
    "  Enter              split the line",
    "  arrows             move without leaving INSERT",
    "",
    "EXPLORER mode",
    "  j / k              move the selection",
    "  Enter              open file or enter directory",
    "  q                  back to the editor",
];

fn draw(frame: &mut Frame, offset: usize) {
    let area = frame.area();
    if area.height == 0 {
        return;
    }

    let title = Paragraph::new(Line::from("Help").centered())
        .style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(title, Rect { height: 1, ..area });

    let body = Rect {
        y: area.y + 1,
        height: area.height - 1,
        ..area
    };
    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .skip(offset)
        .take(body.height as usize)
        .map(|&l| Line::from(l))
        .collect();
    frame.render_widget(Paragraph::new(lines), body);
}

/// Display the help page until the user presses `q` or `Esc`.
pub fn show(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    let mut offset = 0usize;
    loop {
        terminal.draw(|frame| draw(frame, offset))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let visible = terminal.size()?.height.saturating_sub(1) as usize;
        let max_offset = HELP_TEXT.len().saturating_sub(visible);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Char('j') | KeyCode::Down => offset = (offset + 1).min(max_offset),
            KeyCode::Char('k') | KeyCode::Up => offset = offset.saturating_sub(1),
            _ => {}
        }
    }

    terminal.clear()?;
    Ok(())
}
