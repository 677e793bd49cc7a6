//! Frame painting.
//!
//! One `draw` call paints the whole screen from editor state: the text area
//! with its gutter, the `~` filler rows, and the reverse-video status bar.
//! In EXPLORER mode the directory listing replaces the text area.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::buffer::Buffer;
use crate::config::Config;
use crate::editor::Editor;
use crate::explorer::Explorer;
use crate::mode::Mode;
use crate::viewport::{gutter_width, render_column};

/// Tabs expanded to spaces at multiples of `tab_width`; every other byte
/// passes through. The result has one `char` per screen column.
fn expand_tabs(text: &str, tab_width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut col = 0;
    for c in text.chars() {
        if c == '\t' {
            let pad = tab_width - (col % tab_width);
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(c);
            col += 1;
        }
    }
    out
}

/// The default status line, shown when no one-shot message is pending.
fn status_text(buf: &Buffer, mode: Mode, tab_width: usize) -> String {
    let name = buf
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "[No Name]".to_string());
    let rx = render_column(&buf.current_line().text, buf.cx, tab_width);
    format!(
        " [{}] | {} | L: {}/{} C: {}-{}",
        mode.label(),
        name,
        buf.cy + 1,
        buf.line_count(),
        buf.cx + 1,
        rx + 1,
    )
}

pub fn draw(frame: &mut Frame, editor: &mut Editor, config: &Config) {
    let area = frame.area();
    if area.height == 0 || area.width == 0 {
        return;
    }

    let status_row = Rect {
        y: area.y + area.height - 1,
        height: 1,
        ..area
    };
    let body = Rect {
        height: area.height - 1,
        ..area
    };

    match (editor.mode, editor.explorer.as_ref()) {
        (Mode::Explorer, Some(explorer)) => draw_explorer(frame, explorer, body),
        _ => draw_text_area(frame, editor, config, body),
    }

    // Taking the message is what makes it one-shot.
    let status = editor.take_status().unwrap_or_else(|| {
        status_text(editor.active_buffer(), editor.mode, config.tab_width)
    });
    frame.render_widget(
        Paragraph::new(status).style(Style::default().add_modifier(Modifier::REVERSED)),
        status_row,
    );
}

fn draw_text_area(frame: &mut Frame, editor: &Editor, config: &Config, body: Rect) {
    let buf = editor.active_buffer();
    let gutter = if config.line_numbers {
        gutter_width(buf.line_count())
    } else {
        0
    };
    let text_cols = (body.width as usize).saturating_sub(gutter);
    let gutter_style = Style::default().fg(Color::DarkGray);

    let mut rows: Vec<Line> = Vec::with_capacity(body.height as usize);
    let mut lines = buf.iter().skip(buf.row_offset);
    for _ in 0..body.height {
        match lines.next() {
            Some(line) => {
                let expanded = expand_tabs(&line.text, config.tab_width);
                let visible: String = expanded
                    .chars()
                    .skip(buf.col_offset)
                    .take(text_cols)
                    .collect();
                let mut spans = Vec::with_capacity(2);
                if gutter > 0 {
                    spans.push(Span::styled(
                        format!("{:>width$} ", line.lineno, width = gutter - 1),
                        gutter_style,
                    ));
                }
                spans.push(Span::raw(visible));
                rows.push(Line::from(spans));
            }
            None => rows.push(Line::from("~")),
        }
    }
    frame.render_widget(Paragraph::new(rows), body);

    // Scroll offsets are only re-clamped on key dispatch, so the first draw
    // after a shrink can see a cursor outside the window; pin it to the rect.
    let rx = render_column(&buf.current_line().text, buf.cx, config.tab_width);
    let x = (gutter + rx - buf.col_offset).min((body.width as usize).saturating_sub(1));
    let y = (buf.cy - buf.row_offset).min((body.height as usize).saturating_sub(1));
    frame.set_cursor_position((body.x + x as u16, body.y + y as u16));
}

fn draw_explorer(frame: &mut Frame, explorer: &Explorer, body: Rect) {
    if body.height == 0 {
        return;
    }

    let title = Paragraph::new(format!(" File Explorer: {} ", explorer.cwd().display())).style(
        Style::default()
            .add_modifier(Modifier::REVERSED)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(title, Rect { height: 1, ..body });

    let list = Rect {
        y: body.y + 1,
        height: body.height - 1,
        ..body
    };
    let mut rows: Vec<Line> = Vec::with_capacity(list.height as usize);
    for (idx, entry) in explorer
        .entries()
        .iter()
        .enumerate()
        .skip(explorer.row_offset)
        .take(list.height as usize)
    {
        let mut style = Style::default();
        if entry.is_dir {
            style = style.fg(Color::Blue).add_modifier(Modifier::BOLD);
        }
        if idx == explorer.cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        rows.push(Line::from(Span::styled(
            format!(" {}", entry.display_name()),
            style,
        )));
    }
    frame.render_widget(Paragraph::new(rows), list);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Editor;
    use ratatui::backend::{Backend, TestBackend};
    use ratatui::Terminal;

    #[test]
    fn cursor_stays_inside_frame_after_shrink() {
        let mut editor = Editor::new();
        let config = Config::default();
        for _ in 0..30 {
            editor.active_buffer_mut().insert_newline();
        }
        for c in "abcdefghijklmnop".chars() {
            editor.active_buffer_mut().insert_char(c);
        }
        // Scroll state settled for a full-size terminal.
        editor.active_buffer_mut().adjust_scroll(23, 77, config.tab_width);

        // First draw after shrinking, before any key re-clamps the offsets.
        let mut terminal = Terminal::new(TestBackend::new(10, 4)).unwrap();
        terminal
            .draw(|frame| draw(frame, &mut editor, &config))
            .unwrap();
        let pos = terminal.backend_mut().get_cursor_position().unwrap();
        assert!(pos.x < 10, "cursor x {} outside 10-wide frame", pos.x);
        assert!(pos.y < 3, "cursor y {} below the text area", pos.y);
    }

    #[test]
    fn expand_tabs_hits_tab_stops() {
        assert_eq!(expand_tabs("a\tb", 8), "a       b");
        assert_eq!(expand_tabs("\t", 8), "        ");
        assert_eq!(expand_tabs("12345678\tx", 8), "12345678        x");
        assert_eq!(expand_tabs("plain", 8), "plain");
    }

    #[test]
    fn status_shows_unnamed_buffer() {
        let buf = Buffer::new();
        assert_eq!(
            status_text(&buf, Mode::Normal, 8),
            " [NORMAL] | [No Name] | L: 1/1 C: 1-1"
        );
    }

    #[test]
    fn status_rendered_column_diverges_after_tab() {
        let mut buf = Buffer::new();
        buf.insert_char('\t');
        buf.insert_char('x');
        let line = status_text(&buf, Mode::Insert, 8);
        assert!(line.starts_with(" [INSERT] |"), "{line}");
        assert!(line.ends_with("L: 1/1 C: 3-10"), "{line}");
    }
}
