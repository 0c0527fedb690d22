//! Move analysis on top of the core rules.
//!
//! Nothing here mutates a board: every candidate swap is tried on a scratch
//! copy of the grid. Used for hints and for spotting boards with no moves left.

pub mod hints;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use hints::{best_swap, find_swaps, has_moves, swaps_in_grid, HintError, SwapHint};
