//! Directory browser backing EXPLORER mode.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

impl Entry {
    /// Name as shown in the listing: directories carry a trailing slash.
    pub fn display_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// A directory listing plus a cursor over it.
///
/// The listing always starts with `..` (even at the filesystem root, where it
/// points back at the root itself) and never shows `.`. Entries are sorted by
/// name in byte order, which keeps `..` near the top.
#[derive(Debug)]
pub struct Explorer {
    cwd: PathBuf,
    entries: Vec<Entry>,
    pub cursor: usize,
    pub row_offset: usize,
}

impl Explorer {
    /// Browse `cwd`. Fails if the directory cannot be read.
    pub fn open(cwd: PathBuf) -> io::Result<Self> {
        let entries = scan(&cwd)?;
        Ok(Self {
            cwd,
            entries,
            cursor: 0,
            row_offset: 0,
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    /// Move the cursor down one row; at the bottom this does nothing.
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor up one row; at the top this does nothing.
    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Clamp the scroll offset so the cursor stays within `rows` visible
    /// listing rows.
    pub fn adjust_scroll(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        if self.cursor < self.row_offset {
            self.row_offset = self.cursor;
        }
        if self.cursor >= self.row_offset + rows {
            self.row_offset = self.cursor - rows + 1;
        }
    }

    /// Act on the selected entry. Descending into a directory rescans and
    /// resets the cursor; selecting a file returns its full path for the
    /// caller to open. An unreadable subdirectory leaves the listing as it
    /// was and surfaces the error.
    pub fn enter(&mut self) -> io::Result<Option<PathBuf>> {
        let Some(entry) = self.selected() else {
            return Ok(None);
        };
        let target = if entry.name == ".." {
            self.cwd.parent().unwrap_or(&self.cwd).to_path_buf()
        } else {
            self.cwd.join(&entry.name)
        };

        if entry.is_dir {
            let entries = scan(&target)?;
            self.cwd = target;
            self.entries = entries;
            self.cursor = 0;
            self.row_offset = 0;
            Ok(None)
        } else {
            Ok(Some(target))
        }
    }
}

fn scan(dir: &Path) -> io::Result<Vec<Entry>> {
    let mut entries = vec![Entry {
        name: "..".to_string(),
        is_dir: true,
    }];
    for dirent in fs::read_dir(dir)? {
        let dirent = dirent?;
        let name = dirent.file_name().to_string_lossy().into_owned();
        // A broken symlink still lists; it just isn't a directory.
        let is_dir = dirent.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(Entry { name, is_dir });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
