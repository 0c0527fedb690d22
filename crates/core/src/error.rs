//! Error types for board construction and cascade resolution.
//!
//! "No match found" and rejected swaps are ordinary outcomes and never show up
//! here; these variants are configuration problems or misuse of a busy board.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board dimensions {width}x{height} (each must be 1..={max})")]
    InvalidDimensions { width: u8, height: u8, max: u8 },

    #[error("layout mask is {found_width}x{found_height}, board is {width}x{height}")]
    LayoutMismatch {
        width: u8,
        height: u8,
        found_width: usize,
        found_height: usize,
    },

    #[error("layout line {line}: unexpected character {ch:?}")]
    LayoutParse { line: usize, ch: char },

    #[error("need at least {min} distinct piece kinds, got {found}")]
    TooFewKinds { found: usize, min: usize },

    #[error("layout blocks every cell")]
    NoUsableCells,

    #[error("no match-free board after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("cascade did not settle within {rounds} rounds")]
    CascadeLimit { rounds: u32 },

    #[error("board is busy resolving a cascade")]
    Busy,
}
