//! Mapping from logical cursor state to render coordinates: tab expansion,
//! gutter sizing, and the scroll clamps that keep the cursor visible.

use crate::buffer::Buffer;

/// Rendered column of byte column `cx` within `text`.
///
/// Every byte counts one column except tab, which advances to the next
/// multiple of `tab_width`. Pure function of its inputs; display and
/// horizontal scrolling both go through it.
pub fn render_column(text: &str, cx: usize, tab_width: usize) -> usize {
    let mut rx = 0;
    for &b in &text.as_bytes()[..cx.min(text.len())] {
        if b == b'\t' {
            rx += tab_width - (rx % tab_width);
        } else {
            rx += 1;
        }
    }
    rx
}

/// Width of the line-number gutter: decimal digits of `line_count` plus one
/// padding column. Recomputed once per render pass.
pub fn gutter_width(line_count: usize) -> usize {
    let mut digits = 1;
    let mut n = line_count;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits + 1
}

impl Buffer {
    /// Clamp scroll offsets so the cursor stays inside a text area of
    /// `rows` x `cols` cells (the caller has already subtracted the gutter
    /// and status bar). This is the only place scroll state changes; it
    /// runs after every cursor or edit operation, not just on render.
    pub fn adjust_scroll(&mut self, rows: usize, cols: usize, tab_width: usize) {
        if rows == 0 || cols == 0 {
            return;
        }

        if self.cy < self.row_offset {
            self.row_offset = self.cy;
        }
        if self.cy >= self.row_offset + rows {
            self.row_offset = self.cy - rows + 1;
        }

        let rx = render_column(&self.current_line().text, self.cx, tab_width);
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if rx >= self.col_offset + cols {
            self.col_offset = rx - cols + 1;
        }
    }
}
