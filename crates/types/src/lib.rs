//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no game logic, making them usable in any
//! context (rule engine, terminal rendering, event export).
//!
//! # Coordinates
//!
//! A [`Position`] is a `(col, row)` pair:
//!
//! - **col** grows to the right, starting at 0
//! - **row** grows upward; row 0 is the bottom row and gravity pulls toward it
//! - rows at or above the board height form the virtual spawn area that
//!   freshly generated pieces drop in from
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 6 | Columns of a default board |
//! | `DEFAULT_HEIGHT` | 8 | Rows of a default board |
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//! | `SUPER_MIN_PERPENDICULAR` | 2 | Perpendicular extension that upgrades a run to a super match |
//! | `MIN_PIECE_KINDS` | 3 | Fewest enabled colors a board accepts |
//! | `MAX_BOARD_DIM` | 64 | Largest width or height accepted |
//! | `MAX_GENERATION_ATTEMPTS` | 1000 | Full refills tried before giving up on a match-free start |
//! | `MAX_CASCADE_ROUNDS` | 256 | Scan rounds a single cascade may take |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{MatchShape, PieceKind, Position};
//!
//! assert_eq!(PieceKind::from_char('r'), Some(PieceKind::Red));
//! assert_eq!(PieceKind::Purple.as_char(), 'P');
//!
//! let a = Position::new(2, 3);
//! assert_eq!(a.manhattan(Position::new(2, 4)), 1);
//!
//! assert!(MatchShape::LongVertical.is_long());
//! ```

use serde::Serialize;

/// Default board width in cells
pub const DEFAULT_WIDTH: u8 = 6;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u8 = 8;

/// Shortest same-color run that forms a match
pub const MIN_RUN: usize = 3;

/// Perpendicular run length (excluding the shared piece) that turns a run into a super match
pub const SUPER_MIN_PERPENDICULAR: usize = 2;

/// Fewest enabled piece kinds a board can be generated with
pub const MIN_PIECE_KINDS: usize = 3;

/// Largest accepted board width or height
pub const MAX_BOARD_DIM: u8 = 64;

/// Number of full refills tried before initial generation gives up
pub const MAX_GENERATION_ATTEMPTS: u32 = 1000;

/// Number of scan rounds one cascade may run before it is treated as runaway
pub const MAX_CASCADE_ROUNDS: u32 = 256;

/// Points awarded per removed piece
pub const POINTS_PER_PIECE: u32 = 10;

/// Bonus points for a four-or-longer straight run
pub const LONG_MATCH_BONUS: u32 = 20;

/// Bonus points for a cross/T/L shaped super match
pub const SUPER_MATCH_BONUS: u32 = 50;

/// The five piece colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Red,
    Blue,
    Purple,
    Green,
    White,
}

impl PieceKind {
    pub const ALL: [PieceKind; 5] = [
        PieceKind::Red,
        PieceKind::Blue,
        PieceKind::Purple,
        PieceKind::Green,
        PieceKind::White,
    ];

    /// Parse piece kind from a single letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_match3_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('g'), Some(PieceKind::Green));
    /// assert_eq!(PieceKind::from_char('W'), Some(PieceKind::White));
    /// assert_eq!(PieceKind::from_char('x'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(PieceKind::Red),
            'b' => Some(PieceKind::Blue),
            'p' => Some(PieceKind::Purple),
            'g' => Some(PieceKind::Green),
            'w' => Some(PieceKind::White),
            _ => None,
        }
    }

    /// Parse piece kind from its name or letter (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "r" => Some(PieceKind::Red),
            "blue" | "b" => Some(PieceKind::Blue),
            "purple" | "p" => Some(PieceKind::Purple),
            "green" | "g" => Some(PieceKind::Green),
            "white" | "w" => Some(PieceKind::White),
            _ => None,
        }
    }

    /// Uppercase letter used in text layouts and the terminal view
    pub fn as_char(&self) -> char {
        match self {
            PieceKind::Red => 'R',
            PieceKind::Blue => 'B',
            PieceKind::Purple => 'P',
            PieceKind::Green => 'G',
            PieceKind::White => 'W',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Red => "red",
            PieceKind::Blue => "blue",
            PieceKind::Purple => "purple",
            PieceKind::Green => "green",
            PieceKind::White => "white",
        }
    }

    /// Stable small integer used by snapshots (0 is reserved for "no piece")
    pub fn code(&self) -> u8 {
        match self {
            PieceKind::Red => 1,
            PieceKind::Blue => 2,
            PieceKind::Purple => 3,
            PieceKind::Green => 4,
            PieceKind::White => 5,
        }
    }
}

/// Grid coordinate. Row 0 is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Position {
    pub col: i16,
    pub row: i16,
}

impl Position {
    pub const fn new(col: i16, row: i16) -> Self {
        Self { col, row }
    }

    /// Position one step in `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self {
            col: self.col.saturating_add(dc),
            row: self.row.saturating_add(dr),
        }
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: Position) -> u32 {
        (i32::from(self.col) - i32::from(other.col)).unsigned_abs()
            + (i32::from(self.row) - i32::from(other.row)).unsigned_abs()
    }

    /// True when the two positions share an edge
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// The four grid directions. `Up` increases the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i16, i16) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Scan axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Forward and backward directions along this axis, forward first
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::Horizontal => [Direction::Right, Direction::Left],
            Axis::Vertical => [Direction::Up, Direction::Down],
        }
    }

    pub fn perpendicular(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Shape classification of a match
///
/// - **Horizontal** / **Vertical**: exactly three in a row
/// - **LongHorizontal** / **LongVertical**: four or more in a row
/// - **Super**: a run merged with a perpendicular run sharing one of its pieces
/// - **None**: no match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchShape {
    Horizontal,
    Vertical,
    LongHorizontal,
    LongVertical,
    Super,
    None,
}

impl MatchShape {
    /// Classify a straight run of `len` pieces along `axis`
    pub fn classify(axis: Axis, len: usize) -> Self {
        match (axis, len) {
            (_, n) if n < MIN_RUN => MatchShape::None,
            (Axis::Horizontal, n) if n == MIN_RUN => MatchShape::Horizontal,
            (Axis::Horizontal, _) => MatchShape::LongHorizontal,
            (Axis::Vertical, n) if n == MIN_RUN => MatchShape::Vertical,
            (Axis::Vertical, _) => MatchShape::LongVertical,
        }
    }

    /// Axis of a straight shape; `None` for super and empty matches
    pub fn axis(&self) -> Option<Axis> {
        match self {
            MatchShape::Horizontal | MatchShape::LongHorizontal => Some(Axis::Horizontal),
            MatchShape::Vertical | MatchShape::LongVertical => Some(Axis::Vertical),
            MatchShape::Super | MatchShape::None => None,
        }
    }

    pub fn is_long(&self) -> bool {
        matches!(self, MatchShape::LongHorizontal | MatchShape::LongVertical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchShape::Horizontal => "horizontal",
            MatchShape::Vertical => "vertical",
            MatchShape::LongHorizontal => "long_horizontal",
            MatchShape::LongVertical => "long_vertical",
            MatchShape::Super => "super",
            MatchShape::None => "none",
        }
    }
}

/// Identity of a piece, unique for the lifetime of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

/// Why a piece changed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveCause {
    /// Player swap applied
    Swap,
    /// Swap undone because it produced no match
    SwapRevert,
    /// Gravity moved the piece down its column
    Collapse,
}

/// Notifications emitted by the board for animation and scoring collaborators.
///
/// Events are appended in the order the mutations happen, so replaying them
/// against the starting snapshot reproduces the final board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    /// A piece moved from one cell to another
    Moved {
        piece: PieceId,
        kind: PieceKind,
        from: Position,
        to: Position,
        cause: MoveCause,
    },
    /// A new piece dropped in from the spawn area above the board
    Spawned {
        piece: PieceId,
        kind: PieceKind,
        from: Position,
        to: Position,
    },
    /// A match was removed from the board
    Removed {
        shape: MatchShape,
        kind: PieceKind,
        pieces: Vec<(PieceId, Position)>,
    },
    /// The cascade reached a stable board
    Settled { rounds: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_length_and_axis() {
        assert_eq!(MatchShape::classify(Axis::Horizontal, 2), MatchShape::None);
        assert_eq!(MatchShape::classify(Axis::Horizontal, 3), MatchShape::Horizontal);
        assert_eq!(MatchShape::classify(Axis::Horizontal, 5), MatchShape::LongHorizontal);
        assert_eq!(MatchShape::classify(Axis::Vertical, 3), MatchShape::Vertical);
        assert_eq!(MatchShape::classify(Axis::Vertical, 4), MatchShape::LongVertical);
    }

    #[test]
    fn adjacency_is_manhattan_one() {
        let p = Position::new(2, 3);
        assert!(p.is_adjacent(Position::new(3, 3)));
        assert!(p.is_adjacent(Position::new(2, 2)));
        assert!(!p.is_adjacent(Position::new(3, 4)));
        assert!(!p.is_adjacent(p));
        assert!(!p.is_adjacent(Position::new(4, 5)));
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let far = Position::new(i16::MIN, i16::MIN);
        let near = Position::new(i16::MAX, 0);
        assert_eq!(far.manhattan(near), 65535 + 32768);
        assert!(!far.is_adjacent(near));
        assert_eq!(near.step(Direction::Right), near);
    }

    #[test]
    fn piece_letters_roundtrip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
        }
    }
}
