//! Key dispatch.
//!
//! Translates one key event into edit-engine calls according to the current
//! mode, then re-clamps the scroll offsets so the cursor is visible in the
//! next frame. Commands that need the real terminal (quitting, the help
//! page, man pages) are returned as an [`Action`] for the main loop to run.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::buffer::DeleteDir;
use crate::config::Config;
use crate::editor::Editor;
use crate::manual;
use crate::mode::Mode;
use crate::viewport::gutter_width;

/// What the main loop should do after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
    ShowHelp,
    ShowManual(String),
}

/// Per-session input state. Only the pending first `g` of a `gg` jump
/// survives between keys.
#[derive(Debug, Default)]
pub struct InputHandler {
    pending_g: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one key event against a `rows` x `cols` terminal.
    pub fn handle_key(
        &mut self,
        editor: &mut Editor,
        key: KeyEvent,
        rows: usize,
        cols: usize,
        config: &Config,
    ) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::Continue;
        }

        // Bottom row is the status bar.
        let text_rows = rows.saturating_sub(1);

        let action = match editor.mode {
            Mode::Normal => self.handle_normal_key(editor, key, text_rows),
            Mode::Insert => {
                handle_insert_key(editor, key, text_rows);
                Action::Continue
            }
            Mode::Explorer => {
                // Listing rows: everything between title bar and status bar.
                handle_explorer_key(editor, key, rows.saturating_sub(2));
                Action::Continue
            }
        };

        if editor.mode != Mode::Explorer {
            let buf = editor.active_buffer_mut();
            let gutter = if config.line_numbers {
                gutter_width(buf.line_count())
            } else {
                0
            };
            buf.adjust_scroll(text_rows, cols.saturating_sub(gutter), config.tab_width);
        }

        action
    }

    fn handle_normal_key(&mut self, editor: &mut Editor, key: KeyEvent, text_rows: usize) -> Action {
        // The key after a pending `g` is consumed either way; only a second
        // `g` does anything.
        if self.pending_g {
            self.pending_g = false;
            if key.code == KeyCode::Char('g') && key.modifiers == KeyModifiers::NONE {
                editor.active_buffer_mut().jump_top();
            }
            return Action::Continue;
        }

        match key.code {
            KeyCode::Char('i') => editor.mode = Mode::Insert,
            KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('w') => editor.save_active(),
            KeyCode::Char('H') => return Action::ShowHelp,
            KeyCode::Char('K') => return manual_action(editor),
            KeyCode::Char('e') => editor.open_explorer(),
            KeyCode::Char(']') => editor.next_buffer(),
            KeyCode::Char('[') => editor.prev_buffer(),
            KeyCode::Char('g') => self.pending_g = true,
            KeyCode::Char('G') => editor.active_buffer_mut().jump_bottom(),
            _ => handle_motion_key(editor, key.code, text_rows),
        }
        Action::Continue
    }
}

fn manual_action(editor: &mut Editor) -> Action {
    let buf = editor.active_buffer();
    let word = manual::word_under_cursor(&buf.current_line().text, buf.cx).map(str::to_string);
    match word {
        Some(word) if manual::entry_exists(&word) => Action::ShowManual(word),
        Some(word) => {
            editor.set_status(format!("No manual entry for '{word}'"));
            Action::Continue
        }
        None => {
            editor.set_status("Not a valid word");
            Action::Continue
        }
    }
}

fn handle_motion_key(editor: &mut Editor, code: KeyCode, text_rows: usize) {
    let buf = editor.active_buffer_mut();
    match code {
        KeyCode::Char('h') | KeyCode::Left => buf.move_left(),
        KeyCode::Char('l') | KeyCode::Right => buf.move_right(),
        KeyCode::Char('k') | KeyCode::Up => buf.move_up(),
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => buf.move_down(),
        KeyCode::PageUp => buf.page_up(text_rows),
        KeyCode::PageDown => buf.page_down(text_rows),
        _ => {}
    }
}

fn handle_insert_key(editor: &mut Editor, key: KeyEvent, text_rows: usize) {
    match key.code {
        KeyCode::Esc => editor.mode = Mode::Normal,
        KeyCode::Backspace => editor.active_buffer_mut().delete_char(DeleteDir::Backward),
        KeyCode::Delete => editor.active_buffer_mut().delete_char(DeleteDir::Forward),
        KeyCode::Enter => editor.active_buffer_mut().insert_newline(),
        KeyCode::Tab => editor.active_buffer_mut().insert_char('\t'),
        KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down | KeyCode::PageUp
        | KeyCode::PageDown => handle_motion_key(editor, key.code, text_rows),
        KeyCode::Char(c) => {
            // Only printable ASCII becomes text; control chords never do.
            // The renderer counts one cell per byte, so wider glyphs are
            // not typeable (files containing them still load and display).
            if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                && (c.is_ascii_graphic() || c == ' ')
            {
                editor.active_buffer_mut().insert_char(c);
            }
        }
        _ => {}
    }
}

fn handle_explorer_key(editor: &mut Editor, key: KeyEvent, list_rows: usize) {
    let Some(explorer) = editor.explorer.as_mut() else {
        editor.mode = Mode::Normal;
        return;
    };

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => explorer.move_down(),
        KeyCode::Char('k') | KeyCode::Up => explorer.move_up(),
        KeyCode::Char('q') => {
            editor.close_explorer();
            return;
        }
        KeyCode::Enter => match explorer.enter() {
            Ok(None) => {}
            Ok(Some(path)) => {
                editor.open_file(&path);
                editor.explorer = None;
                return;
            }
            Err(err) => {
                editor.set_status(format!("Err: {err}"));
                return;
            }
        },
        _ => {}
    }

    explorer.adjust_scroll(list_rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROWS: usize = 24;
    const COLS: usize = 80;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn feed(handler: &mut InputHandler, editor: &mut Editor, code: KeyCode) -> Action {
        handler.handle_key(editor, press(code), ROWS, COLS, &Config::default())
    }

    fn type_line(handler: &mut InputHandler, editor: &mut Editor, text: &str) {
        feed(handler, editor, KeyCode::Char('i'));
        for c in text.chars() {
            feed(handler, editor, KeyCode::Char(c));
        }
        feed(handler, editor, KeyCode::Esc);
    }

    #[test]
    fn i_and_esc_toggle_insert_mode() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        feed(&mut handler, &mut ed, KeyCode::Char('i'));
        assert_eq!(ed.mode, Mode::Insert);
        feed(&mut handler, &mut ed, KeyCode::Esc);
        assert_eq!(ed.mode, Mode::Normal);
    }

    #[test]
    fn q_requests_quit_only_in_normal_mode() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        feed(&mut handler, &mut ed, KeyCode::Char('i'));
        assert_eq!(feed(&mut handler, &mut ed, KeyCode::Char('q')), Action::Continue);
        assert_eq!(ed.active_buffer().current_line().text, "q");

        feed(&mut handler, &mut ed, KeyCode::Esc);
        assert_eq!(feed(&mut handler, &mut ed, KeyCode::Char('q')), Action::Quit);
    }

    #[test]
    fn typing_inserts_text() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        type_line(&mut handler, &mut ed, "hello");
        assert_eq!(ed.active_buffer().current_line().text, "hello");
        assert_eq!(ed.active_buffer().cx, 5);
    }

    #[test]
    fn enter_splits_and_backspace_joins_in_insert() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        type_line(&mut handler, &mut ed, "abcd");
        feed(&mut handler, &mut ed, KeyCode::Char('i'));
        feed(&mut handler, &mut ed, KeyCode::Left);
        feed(&mut handler, &mut ed, KeyCode::Left);
        feed(&mut handler, &mut ed, KeyCode::Enter);
        assert_eq!(ed.active_buffer().line_count(), 2);
        assert_eq!(ed.active_buffer().current_line().text, "cd");

        feed(&mut handler, &mut ed, KeyCode::Backspace);
        assert_eq!(ed.active_buffer().line_count(), 1);
        assert_eq!(ed.active_buffer().current_line().text, "abcd");
        assert_eq!(ed.active_buffer().cx, 2);
    }

    #[test]
    fn gg_jumps_to_top_and_lone_g_swallows_next_key() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        for _ in 0..5 {
            feed(&mut handler, &mut ed, KeyCode::Char('i'));
            feed(&mut handler, &mut ed, KeyCode::Enter);
            feed(&mut handler, &mut ed, KeyCode::Esc);
        }
        assert_eq!(ed.active_buffer().cy, 5);

        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        assert_eq!(ed.active_buffer().cy, 0);

        // g then a non-g key: the second key is consumed, not executed.
        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        feed(&mut handler, &mut ed, KeyCode::Char('j'));
        assert_eq!(ed.active_buffer().cy, 0);
        feed(&mut handler, &mut ed, KeyCode::Char('j'));
        assert_eq!(ed.active_buffer().cy, 1);
    }

    #[test]
    fn capital_g_jumps_to_bottom() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        for _ in 0..5 {
            feed(&mut handler, &mut ed, KeyCode::Char('i'));
            feed(&mut handler, &mut ed, KeyCode::Enter);
            feed(&mut handler, &mut ed, KeyCode::Esc);
        }
        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        feed(&mut handler, &mut ed, KeyCode::Char('G'));
        assert_eq!(ed.active_buffer().cy, 5);
        assert_eq!(ed.active_buffer().cx, 0);
    }

    #[test]
    fn enter_moves_down_in_normal_mode() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        feed(&mut handler, &mut ed, KeyCode::Char('i'));
        feed(&mut handler, &mut ed, KeyCode::Enter);
        feed(&mut handler, &mut ed, KeyCode::Esc);
        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        feed(&mut handler, &mut ed, KeyCode::Char('g'));

        feed(&mut handler, &mut ed, KeyCode::Enter);
        assert_eq!(ed.active_buffer().cy, 1);
        assert_eq!(ed.active_buffer().line_count(), 2);
    }

    #[test]
    fn page_keys_move_one_text_screen() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        for _ in 0..100 {
            feed(&mut handler, &mut ed, KeyCode::Char('i'));
            feed(&mut handler, &mut ed, KeyCode::Enter);
            feed(&mut handler, &mut ed, KeyCode::Esc);
        }
        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        feed(&mut handler, &mut ed, KeyCode::Char('g'));

        feed(&mut handler, &mut ed, KeyCode::PageDown);
        assert_eq!(ed.active_buffer().cy, ROWS - 1);
        feed(&mut handler, &mut ed, KeyCode::PageUp);
        assert_eq!(ed.active_buffer().cy, 0);
    }

    #[test]
    fn motion_keeps_cursor_in_view() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        for _ in 0..100 {
            feed(&mut handler, &mut ed, KeyCode::Char('i'));
            feed(&mut handler, &mut ed, KeyCode::Enter);
            feed(&mut handler, &mut ed, KeyCode::Esc);
        }
        let buf = ed.active_buffer();
        assert_eq!(buf.cy, 100);
        assert_eq!(buf.row_offset, 100 - (ROWS - 1) + 1);

        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        feed(&mut handler, &mut ed, KeyCode::Char('g'));
        assert_eq!(ed.active_buffer().row_offset, 0);
    }

    #[test]
    fn w_reports_save_result_in_status() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        feed(&mut handler, &mut ed, KeyCode::Char('w'));
        assert_eq!(ed.take_status().as_deref(), Some("No file name"));
    }

    #[test]
    fn k_on_empty_line_reports_no_word() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        let action = feed(&mut handler, &mut ed, KeyCode::Char('K'));
        assert_eq!(action, Action::Continue);
        assert_eq!(ed.take_status().as_deref(), Some("Not a valid word"));
    }

    #[test]
    fn explorer_round_trip() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        feed(&mut handler, &mut ed, KeyCode::Char('e'));
        assert_eq!(ed.mode, Mode::Explorer);
        assert!(ed.explorer.is_some());

        feed(&mut handler, &mut ed, KeyCode::Char('j'));
        feed(&mut handler, &mut ed, KeyCode::Char('q'));
        assert_eq!(ed.mode, Mode::Normal);
        assert!(ed.explorer.is_none());
    }

    #[test]
    fn typing_admits_only_printable_ascii() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        feed(&mut handler, &mut ed, KeyCode::Char('i'));
        for c in ['é', 'λ', '界', '\u{7f}'] {
            feed(&mut handler, &mut ed, KeyCode::Char(c));
        }
        // Multi-byte glyphs would desync the byte-per-cell column math, so
        // none of them may land in the line.
        assert_eq!(ed.active_buffer().current_line().text, "");
        assert_eq!(ed.active_buffer().cx, 0);

        feed(&mut handler, &mut ed, KeyCode::Char('a'));
        feed(&mut handler, &mut ed, KeyCode::Char(' '));
        feed(&mut handler, &mut ed, KeyCode::Tab);
        assert_eq!(ed.active_buffer().current_line().text, "a \t");
    }

    #[test]
    fn control_chords_do_not_insert() {
        let mut handler = InputHandler::new();
        let mut ed = Editor::new();
        feed(&mut handler, &mut ed, KeyCode::Char('i'));
        let chord = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        handler.handle_key(&mut ed, chord, ROWS, COLS, &Config::default());
        assert_eq!(ed.active_buffer().current_line().text, "");
    }
}
