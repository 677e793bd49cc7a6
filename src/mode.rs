/// Input routing mode.
///
/// NORMAL takes cursor motion and commands; INSERT routes keys into the
/// edit operations; EXPLORER owns the directory browser. Activating any
/// buffer forces NORMAL, so switching buffers always cancels an in-progress
/// insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Explorer,
}

impl Mode {
    /// Status bar label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Explorer => "EXPLORER",
        }
    }
}
