//! Scoring module - points for removed matches
//!
//! - Every removed piece is worth [`POINTS_PER_PIECE`]
//! - Long straight runs add [`LONG_MATCH_BONUS`], super matches [`SUPER_MATCH_BONUS`]
//! - Matches found in later cascade rounds are multiplied by the round number

use crate::types::{MatchShape, LONG_MATCH_BONUS, POINTS_PER_PIECE, SUPER_MATCH_BONUS};

/// Base points for one match of `size` pieces
pub fn score_match(shape: MatchShape, size: usize) -> u32 {
    let bonus = match shape {
        MatchShape::None => return 0,
        MatchShape::Horizontal | MatchShape::Vertical => 0,
        MatchShape::LongHorizontal | MatchShape::LongVertical => LONG_MATCH_BONUS,
        MatchShape::Super => SUPER_MATCH_BONUS,
    };
    size as u32 * POINTS_PER_PIECE + bonus
}

/// Points for a match removed in cascade round `round` (1-based)
pub fn score_in_round(shape: MatchShape, size: usize, round: u32) -> u32 {
    score_match(shape, size) * round.max(1)
}
