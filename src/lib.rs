//! ked, a small modal terminal text editor.
//!
//! Core state lives in [`editor::Editor`]: a list of [`buffer::Buffer`]s,
//! each an arena of lines with its own cursor and scroll offsets. Input
//! dispatch, viewport math, and rendering are separate layers over that
//! state, so everything below `main` is testable without a terminal.

pub mod buffer;
pub mod config;
pub mod editor;
pub mod explorer;
pub mod help;
pub mod input;
pub mod line;
pub mod manual;
pub mod mode;
pub mod render;
pub mod viewport;
