use crate::line::{Line, LineArena, LineId};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Which neighbor a character delete consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDir {
    /// Backspace: delete the character before the cursor, joining with the
    /// previous line when the cursor sits at column 0.
    Backward,
    /// Delete: remove the character under the cursor, joining with the next
    /// line when the cursor sits at end of line.
    Forward,
}

/// Result of a save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The buffer has no path; nothing was written.
    Unnamed,
    Written { lines: usize, bytes: u64 },
}

/// One open document: its lines, cursor, and scroll state.
///
/// Lines live in a slot arena and are ordered by their `prev`/`next` ids;
/// `head`, `tail` and `current` are ids into the same arena, so structural
/// edits retarget them explicitly and can never leave them dangling.
#[derive(Debug)]
pub struct Buffer {
    lines: LineArena,
    head: LineId,
    tail: LineId,
    current: LineId,

    /// Cursor byte column within the current line, `0..=current.size()`.
    pub cx: usize,
    /// Cursor row, 0-based position of `current` among all lines.
    pub cy: usize,

    /// First visible row of the viewport.
    pub row_offset: usize,
    /// First visible rendered column of the viewport.
    pub col_offset: usize,

    path: Option<PathBuf>,
    line_count: usize,
}

impl Buffer {
    /// Create an unnamed buffer holding a single empty line.
    pub fn new() -> Self {
        Self::from_lines(Vec::new(), None)
    }

    /// Load a buffer from a file.
    ///
    /// Each record has its trailing CR and/or LF stripped, so both LF- and
    /// CRLF-terminated files read identically. An unreadable or empty file
    /// yields a buffer with one empty line; the path is recorded either way
    /// so a later save creates the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let texts = match File::open(path) {
            Ok(file) => read_records(file),
            Err(e) => {
                tracing::debug!("open {:?} failed: {}; starting empty", path, e);
                Vec::new()
            }
        };
        Self::from_lines(texts, Some(path.to_path_buf()))
    }

    fn from_lines(texts: Vec<String>, path: Option<PathBuf>) -> Self {
        let mut arena = LineArena::new();
        let mut iter = texts.into_iter();
        let first = iter.next().unwrap_or_default();
        let head = arena.insert(Line {
            text: first,
            lineno: 1,
            prev: None,
            next: None,
        });

        let mut tail = head;
        for text in iter {
            let lineno = arena[tail].lineno + 1;
            let id = arena.insert(Line {
                text,
                lineno,
                prev: Some(tail),
                next: None,
            });
            arena[tail].next = Some(id);
            tail = id;
        }

        let line_count = arena.len();
        Self {
            lines: arena,
            head,
            tail,
            current: head,
            cx: 0,
            cy: 0,
            row_offset: 0,
            col_offset: 0,
            path,
            line_count,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn head(&self) -> LineId {
        self.head
    }

    pub fn tail(&self) -> LineId {
        self.tail
    }

    pub fn current_id(&self) -> LineId {
        self.current
    }

    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id]
    }

    pub fn current_line(&self) -> &Line {
        &self.lines[self.current]
    }

    /// Iterate the lines in document order.
    pub fn iter(&self) -> Lines<'_> {
        Lines {
            arena: &self.lines,
            next: Some(self.head),
        }
    }

    pub fn line_texts(&self) -> Vec<String> {
        self.iter().map(|l| l.text.clone()).collect()
    }
}

// Edit operations. Every public mutation leaves linenos sequential from 1,
// `line_count` equal to the number of live lines, and `cx` within the
// current line.
impl Buffer {
    /// Insert one character at the cursor and advance past it.
    pub fn insert_char(&mut self, c: char) {
        let cx = self.cx;
        let line = &mut self.lines[self.current];
        line.text.insert(cx, c);
        self.cx += c.len_utf8();
    }

    /// Split the current line at the cursor.
    ///
    /// Text from the cursor to end of line moves to a new line linked right
    /// after the current one; the cursor lands at column 0 of the new line.
    /// Splitting at end of line yields an empty new line; splitting at
    /// column 0 moves everything, leaving the original empty.
    pub fn insert_newline(&mut self) {
        let cx = self.cx;
        let line = &mut self.lines[self.current];
        let rest = line.text.split_off(cx);
        // Trim the old line's spare capacity; not required, just keeps
        // memory proportional to text after repeated splits.
        line.text.shrink_to_fit();
        let after = line.next;
        let lineno = line.lineno;

        let new_id = self.lines.insert(Line {
            text: rest,
            lineno: lineno + 1,
            prev: Some(self.current),
            next: after,
        });
        self.lines[self.current].next = Some(new_id);
        match after {
            Some(id) => self.lines[id].prev = Some(new_id),
            None => self.tail = new_id,
        }

        self.current = new_id;
        self.cx = 0;
        self.cy += 1;
        self.line_count += 1;
        self.renumber_from(new_id, lineno + 1);
    }

    /// Delete one character relative to the cursor.
    ///
    /// Backspace at column 0 joins with the previous line (no-op at the very
    /// start of the buffer); Delete at end of line joins with the next
    /// (no-op at the very end). Both boundary no-ops are silent by design —
    /// callers that care compare state before and after.
    pub fn delete_char(&mut self, dir: DeleteDir) {
        match dir {
            DeleteDir::Backward => {
                if self.cx == 0 {
                    self.join_with_prev();
                } else {
                    let line = &mut self.lines[self.current];
                    let mut start = self.cx - 1;
                    while !line.text.is_char_boundary(start) {
                        start -= 1;
                    }
                    line.text.remove(start);
                    self.cx = start;
                }
            }
            DeleteDir::Forward => {
                let size = self.lines[self.current].size();
                if self.cx == size {
                    self.join_with_next();
                } else {
                    // Cursor stays put; the rest of the line shifts left.
                    self.lines[self.current].text.remove(self.cx);
                }
            }
        }
    }

    /// Backspace at column 0: merge the current line into its predecessor.
    /// The cursor lands exactly at the join point.
    fn join_with_prev(&mut self) {
        let Some(prev) = self.lines[self.current].prev else {
            return;
        };
        let removed = self.lines.remove(self.current);
        let join_at = self.lines[prev].size();
        self.lines[prev].text.push_str(&removed.text);
        self.lines[prev].next = removed.next;
        match removed.next {
            Some(after) => self.lines[after].prev = Some(prev),
            None => self.tail = prev,
        }

        self.current = prev;
        self.cx = join_at;
        self.cy -= 1;
        self.line_count -= 1;
        if let Some(after) = removed.next {
            let start = self.lines[prev].lineno + 1;
            self.renumber_from(after, start);
        }
    }

    /// Delete at end of line: merge the next line into the current one.
    /// Cursor does not move.
    fn join_with_next(&mut self) {
        let Some(next) = self.lines[self.current].next else {
            return;
        };
        let removed = self.lines.remove(next);
        self.lines[self.current].text.push_str(&removed.text);
        self.lines[self.current].next = removed.next;
        match removed.next {
            Some(after) => self.lines[after].prev = Some(self.current),
            None => self.tail = self.current,
        }

        self.line_count -= 1;
        if let Some(after) = removed.next {
            let start = self.lines[self.current].lineno + 1;
            self.renumber_from(after, start);
        }
    }

    /// Reassign linenos sequentially from `start` walking forward from `from`.
    /// Runs eagerly after every structural change; nothing renumbers lazily.
    fn renumber_from(&mut self, from: LineId, start: usize) {
        let mut next = Some(from);
        let mut n = start;
        while let Some(id) = next {
            self.lines[id].lineno = n;
            n += 1;
            next = self.lines[id].next;
        }
    }
}

// Cursor motion. Horizontal moves stay on char boundaries; vertical moves
// snap the column back into the new line when it is shorter.
impl Buffer {
    pub fn move_left(&mut self) {
        if self.cx == 0 {
            return;
        }
        let text = &self.lines[self.current].text;
        let mut cx = self.cx - 1;
        while !text.is_char_boundary(cx) {
            cx -= 1;
        }
        self.cx = cx;
    }

    pub fn move_right(&mut self) {
        let text = &self.lines[self.current].text;
        if self.cx >= text.len() {
            return;
        }
        let mut cx = self.cx + 1;
        while !text.is_char_boundary(cx) {
            cx += 1;
        }
        self.cx = cx;
    }

    pub fn move_up(&mut self) {
        if let Some(prev) = self.lines[self.current].prev {
            self.current = prev;
            self.cy -= 1;
            self.snap_cx();
        }
    }

    pub fn move_down(&mut self) {
        if let Some(next) = self.lines[self.current].next {
            self.current = next;
            self.cy += 1;
            self.snap_cx();
        }
    }

    pub fn page_up(&mut self, rows: usize) {
        for _ in 0..rows {
            self.move_up();
        }
    }

    pub fn page_down(&mut self, rows: usize) {
        for _ in 0..rows {
            self.move_down();
        }
    }

    pub fn jump_top(&mut self) {
        self.current = self.head;
        self.cy = 0;
        self.cx = 0;
    }

    pub fn jump_bottom(&mut self) {
        self.current = self.tail;
        self.cy = self.line_count - 1;
        self.cx = 0;
    }

    /// Clamp `cx` into the current line after a vertical move.
    fn snap_cx(&mut self) {
        let text = &self.lines[self.current].text;
        if self.cx > text.len() {
            self.cx = text.len();
        }
        while !text.is_char_boundary(self.cx) {
            self.cx -= 1;
        }
    }
}

impl Buffer {
    /// Write every line followed by a single LF.
    ///
    /// Load strips line terminators, so they are restored here — always as
    /// LF. A CRLF source therefore saves as LF-only; the normalization is
    /// one-way and intentional. Returns [`SaveOutcome::Unnamed`] without
    /// touching the filesystem when the buffer has no path.
    pub fn save(&self) -> io::Result<SaveOutcome> {
        let Some(path) = &self.path else {
            return Ok(SaveOutcome::Unnamed);
        };

        let mut out = BufWriter::new(File::create(path)?);
        let mut bytes: u64 = 0;
        for line in self.iter() {
            out.write_all(line.text.as_bytes())?;
            out.write_all(b"\n")?;
            bytes += line.text.len() as u64 + 1;
        }
        out.flush()?;
        tracing::info!("wrote {:?}: {}L, {}B", path, self.line_count, bytes);
        Ok(SaveOutcome::Written {
            lines: self.line_count,
            bytes,
        })
    }

    /// Panic if any structural invariant is violated. Test support: every
    /// property test calls this after each operation.
    pub fn check_invariants(&self) {
        assert!(self.line_count >= 1, "buffer must keep at least one line");
        assert_eq!(self.line_count, self.lines.len(), "line_count vs arena");

        let mut seen = 0;
        let mut prev: Option<LineId> = None;
        let mut next = Some(self.head);
        let mut found_current = false;
        while let Some(id) = next {
            let line = self.lines.get(id).expect("link to freed line");
            seen += 1;
            assert_eq!(line.lineno, seen, "lineno out of sequence");
            assert_eq!(line.prev, prev, "asymmetric prev link");
            assert!(!line.text.contains('\n'), "embedded newline");
            if id == self.current {
                found_current = true;
                assert_eq!(self.cy, seen - 1, "cy vs current position");
                assert!(self.cx <= line.size(), "cx past end of line");
            }
            if line.next.is_none() {
                assert_eq!(id, self.tail, "stale tail");
            }
            prev = Some(id);
            next = line.next;
        }
        assert_eq!(seen, self.line_count, "walk count vs line_count");
        assert!(found_current, "current not a member of the buffer");
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Forward iterator over a buffer's lines.
pub struct Lines<'a> {
    arena: &'a LineArena,
    next: Option<LineId>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let line = &self.arena[id];
        self.next = line.next;
        Some(line)
    }
}

/// Split a reader into records, stripping the trailing CR/LF of each.
fn read_records(file: File) -> Vec<String> {
    let mut reader = BufReader::new(file);
    let mut texts = Vec::new();
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {
                if raw.last() == Some(&b'\n') {
                    raw.pop();
                }
                if raw.last() == Some(&b'\r') {
                    raw.pop();
                }
                texts.push(String::from_utf8_lossy(&raw).into_owned());
            }
            Err(e) => {
                tracing::warn!("read failed mid-file: {}", e);
                break;
            }
        }
    }
    texts
}
