//! Layout mask - which cells of a board are permanently blocked.
//!
//! The mask is consulted once, when a board is built. It is stored bottom row
//! first so `rows[row][col]` lines up with board coordinates.
//!
//! Text form (one line per row, **top row first**):
//!
//! ```text
//! ; comment lines and blank lines are ignored
//! #....#
//! ......
//! ```
//!
//! `#`, `x` and `X` mark blocked cells; `.`, `o` and `O` mark usable ones.

use crate::error::BoardError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutMask {
    width: u8,
    height: u8,
    /// Row-major, row 0 (bottom) first
    blocked: Vec<bool>,
}

impl LayoutMask {
    /// Mask with every cell usable
    pub fn open(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            blocked: vec![false; width as usize * height as usize],
        }
    }

    /// Build from a boolean matrix indexed `rows[row][col]`, row 0 at the bottom.
    ///
    /// The matrix must be exactly `width` x `height`; nothing is truncated or padded.
    pub fn from_rows(width: u8, height: u8, rows: &[Vec<bool>]) -> Result<Self, BoardError> {
        let mismatch = |found_width: usize| BoardError::LayoutMismatch {
            width,
            height,
            found_width,
            found_height: rows.len(),
        };

        if rows.len() != height as usize {
            let found_width = rows.first().map(Vec::len).unwrap_or(0);
            return Err(mismatch(found_width));
        }
        if let Some(bad) = rows.iter().find(|r| r.len() != width as usize) {
            return Err(mismatch(bad.len()));
        }

        Ok(Self {
            width,
            height,
            blocked: rows.iter().flatten().copied().collect(),
        })
    }

    /// Parse the text form. The first meaningful line is the top row.
    pub fn parse(width: u8, height: u8, text: &str) -> Result<Self, BoardError> {
        let mut top_down = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                match ch {
                    '#' | 'x' | 'X' => row.push(true),
                    '.' | 'o' | 'O' => row.push(false),
                    _ => return Err(BoardError::LayoutParse { line: idx + 1, ch }),
                }
            }
            top_down.push(row);
        }
        top_down.reverse();
        Self::from_rows(width, height, &top_down)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// True if the cell is blocked. Coordinates outside the mask are not blocked.
    pub fn is_blocked(&self, col: i16, row: i16) -> bool {
        if col < 0 || row < 0 || col >= self.width as i16 || row >= self.height as i16 {
            return false;
        }
        self.blocked[row as usize * self.width as usize + col as usize]
    }

    pub fn usable_count(&self) -> usize {
        self.blocked.iter().filter(|b| !**b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flips_rows_to_bottom_first() {
        let mask = LayoutMask::parse(3, 2, "#..\n..x\n").unwrap();
        // Top line is row 1.
        assert!(mask.is_blocked(0, 1));
        assert!(!mask.is_blocked(1, 1));
        // Bottom line is row 0.
        assert!(mask.is_blocked(2, 0));
        assert!(!mask.is_blocked(0, 0));
        assert_eq!(mask.usable_count(), 4);
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let text = "; ring\n\n...\n.#.\n...\n";
        let mask = LayoutMask::parse(3, 3, text).unwrap();
        assert!(mask.is_blocked(1, 1));
        assert_eq!(mask.usable_count(), 8);
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let err = LayoutMask::parse(3, 3, "...\n...\n").unwrap_err();
        assert_eq!(
            err,
            BoardError::LayoutMismatch {
                width: 3,
                height: 3,
                found_width: 3,
                found_height: 2
            }
        );

        let rows = vec![vec![false; 3], vec![false; 4]];
        assert!(matches!(
            LayoutMask::from_rows(3, 2, &rows),
            Err(BoardError::LayoutMismatch { found_width: 4, .. })
        ));
    }

    #[test]
    fn unknown_character_reports_line() {
        let err = LayoutMask::parse(2, 2, "..\n.?\n").unwrap_err();
        assert_eq!(err, BoardError::LayoutParse { line: 2, ch: '?' });
    }

    #[test]
    fn out_of_range_is_not_blocked() {
        let mask = LayoutMask::open(2, 2);
        assert!(!mask.is_blocked(-1, 0));
        assert!(!mask.is_blocked(5, 5));
    }
}
