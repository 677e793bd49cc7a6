//! Multi-buffer session state: the open buffers, which one is active, the
//! current mode, and the one-shot status message.

use std::path::Path;

use crate::buffer::{Buffer, SaveOutcome};
use crate::explorer::Explorer;
use crate::mode::Mode;

/// Top-level editor session.
///
/// There is always at least one buffer. The explorer is populated only while
/// [`Mode::Explorer`] is active.
pub struct Editor {
    buffers: Vec<Buffer>,
    active: usize,
    pub mode: Mode,
    status: Option<String>,
    pub explorer: Option<Explorer>,
}

impl Editor {
    /// A session with a single unnamed, empty buffer.
    pub fn new() -> Self {
        Self {
            buffers: vec![Buffer::new()],
            active: 0,
            mode: Mode::Normal,
            status: None,
            explorer: None,
        }
    }

    /// A session with one buffer per path, the last one active. With no
    /// paths this is the same as [`Editor::new`].
    pub fn from_files(paths: &[std::path::PathBuf]) -> Self {
        let mut editor = Self::new();
        if !paths.is_empty() {
            editor.buffers.clear();
            for path in paths {
                editor.open_file(path);
            }
        }
        editor
    }

    pub fn active_buffer(&self) -> &Buffer {
        &self.buffers[self.active]
    }

    pub fn active_buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.active]
    }

    pub fn buffers(&self) -> &[Buffer] {
        &self.buffers
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Open `path` in a new buffer and activate it. If a buffer already holds
    /// this path (compared as given, without canonicalization), it is
    /// activated instead of being loaded twice.
    pub fn open_file(&mut self, path: &Path) {
        if let Some(idx) = self
            .buffers
            .iter()
            .position(|b| b.path() == Some(path))
        {
            self.set_active(idx);
            return;
        }

        let buffer = Buffer::from_path(path);
        tracing::info!(path = %path.display(), lines = buffer.line_count(), "opened buffer");
        self.buffers.push(buffer);
        self.set_active(self.buffers.len() - 1);
    }

    /// Activate buffer `idx`. Always lands in NORMAL mode, so a buffer switch
    /// cancels any in-progress insertion. Out-of-range indices are ignored.
    pub fn set_active(&mut self, idx: usize) {
        if idx < self.buffers.len() {
            self.active = idx;
            self.mode = Mode::Normal;
        }
    }

    /// Activate the next buffer in open order. No wraparound: at the last
    /// buffer this does nothing.
    pub fn next_buffer(&mut self) {
        if self.active + 1 < self.buffers.len() {
            self.set_active(self.active + 1);
        }
    }

    /// Activate the previous buffer in open order. No wraparound.
    pub fn prev_buffer(&mut self) {
        if self.active > 0 {
            self.set_active(self.active - 1);
        }
    }

    /// Replace the status message. One slot: a new message overwrites any
    /// message the user has not seen yet.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Take the pending status message, leaving the slot empty. The renderer
    /// calls this once per frame, which is what makes messages one-shot.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Write the active buffer to its path and report the result in the
    /// status slot.
    pub fn save_active(&mut self) {
        let result = self.buffers[self.active].save();
        match result {
            Ok(SaveOutcome::Written { lines, bytes }) => {
                let path = self.buffers[self.active]
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                self.set_status(format!("\"{path}\" {lines}L, {bytes}B written"));
            }
            Ok(SaveOutcome::Unnamed) => self.set_status("No file name"),
            Err(err) => {
                tracing::warn!(error = %err, "save failed");
                self.set_status(format!("Err: {err}"));
            }
        }
    }

    /// Enter the directory browser rooted at the process working directory.
    /// On failure the mode is unchanged and the error lands in the status
    /// slot.
    pub fn open_explorer(&mut self) {
        let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
        match Explorer::open(cwd) {
            Ok(explorer) => {
                self.explorer = Some(explorer);
                self.mode = Mode::Explorer;
            }
            Err(err) => self.set_status(format!("Err: {err}")),
        }
    }

    /// Leave the directory browser without opening anything.
    pub fn close_explorer(&mut self) {
        self.explorer = None;
        self.mode = Mode::Normal;
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::path::PathBuf;

    #[test]
    fn starts_with_one_empty_buffer_in_normal_mode() {
        let ed = Editor::new();
        assert_eq!(ed.buffers().len(), 1);
        assert_eq!(ed.mode, Mode::Normal);
        assert_eq!(ed.active_buffer().path(), None);
        assert_eq!(ed.active_buffer().line_count(), 1);
    }

    #[test]
    fn from_files_has_no_scratch_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "a\n").unwrap();
        std::fs::write(&b, "b\n").unwrap();

        let ed = Editor::from_files(&[a.clone(), b.clone()]);
        assert_eq!(ed.buffers().len(), 2);
        assert_eq!(ed.active_buffer().path(), Some(b.as_path()));

        let empty = Editor::from_files(&[]);
        assert_eq!(empty.buffers().len(), 1);
        assert_eq!(empty.active_buffer().path(), None);
    }

    #[test]
    fn open_file_dedups_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "hello\n").unwrap();

        let mut ed = Editor::new();
        ed.open_file(&path);
        assert_eq!(ed.buffers().len(), 2);
        assert_eq!(ed.active_index(), 1);

        ed.open_file(&path);
        assert_eq!(ed.buffers().len(), 2);
        assert_eq!(ed.active_index(), 1);
    }

    #[test]
    fn reopening_activates_without_reloading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "original\n").unwrap();

        let mut ed = Editor::new();
        ed.open_file(&path);
        ed.active_buffer_mut().insert_char('x');
        ed.prev_buffer();

        // Edits survive a re-open of the same path.
        ed.open_file(&path);
        assert!(ed.active_buffer().current_line().text.starts_with('x'));
    }

    #[test]
    fn buffer_cycling_does_not_wrap() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a", "b"] {
            let mut f = std::fs::File::create(dir.path().join(name)).unwrap();
            writeln!(f, "{name}").unwrap();
        }

        let mut ed = Editor::new();
        ed.open_file(&dir.path().join("a"));
        ed.open_file(&dir.path().join("b"));
        assert_eq!(ed.active_index(), 2);

        ed.next_buffer();
        assert_eq!(ed.active_index(), 2);

        ed.prev_buffer();
        ed.prev_buffer();
        ed.prev_buffer();
        assert_eq!(ed.active_index(), 0);
    }

    #[test]
    fn switching_buffers_forces_normal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "x\n").unwrap();

        let mut ed = Editor::new();
        ed.open_file(&path);
        ed.mode = Mode::Insert;
        ed.prev_buffer();
        assert_eq!(ed.mode, Mode::Normal);
    }

    #[test]
    fn status_slot_is_one_shot() {
        let mut ed = Editor::new();
        ed.set_status("first");
        ed.set_status("second");
        assert_eq!(ed.take_status().as_deref(), Some("second"));
        assert_eq!(ed.take_status(), None);
    }

    #[test]
    fn save_unnamed_buffer_reports_no_file_name() {
        let mut ed = Editor::new();
        ed.save_active();
        assert_eq!(ed.take_status().as_deref(), Some("No file name"));
    }

    #[test]
    fn save_reports_lines_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "ab\ncd\n").unwrap();

        let mut ed = Editor::new();
        ed.open_file(&path);
        ed.save_active();
        let msg = ed.take_status().unwrap();
        assert_eq!(msg, format!("\"{}\" 2L, 6B written", path.display()));
    }

    #[test]
    fn open_missing_file_still_creates_buffer() {
        let mut ed = Editor::new();
        let path = PathBuf::from("/nonexistent/deeply/missing.txt");
        ed.open_file(&path);
        assert_eq!(ed.active_buffer().path(), Some(path.as_path()));
        assert_eq!(ed.active_buffer().line_count(), 1);
    }
}
