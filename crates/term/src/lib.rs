//! Terminal rendering for the match-3 board.
//!
//! Board snapshots are drawn into a plain framebuffer (pure, unit-testable)
//! which the renderer then flushes to the terminal. Cells are two columns
//! wide to compensate for the usual glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{BoardMarks, GameView, HudView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
