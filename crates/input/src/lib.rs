//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework. Maps `crossterm` key events into
//! [`InputAction`]s and keeps the board cursor, which turns those actions into
//! the `(col, row)` positions the swap controller expects.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit, InputAction};
