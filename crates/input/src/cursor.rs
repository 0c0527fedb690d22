//! Board cursor: the cell keyboard actions point at.

use crate::types::{Direction, Position};

/// Cursor position clamped to a `width x height` board.
///
/// Starts on the bottom-left cell. Blocked cells are not skipped; selecting
/// one is simply ignored by the swap controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Position,
    width: u8,
    height: u8,
}

impl Cursor {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            pos: Position::new(0, 0),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Move one cell; stops at the edges instead of wrapping
    pub fn step(&mut self, dir: Direction) -> Position {
        let next = self.pos.step(dir);
        self.pos = Position::new(
            next.col.clamp(0, self.width as i16 - 1),
            next.row.clamp(0, self.height as i16 - 1),
        );
        self.pos
    }

    pub fn jump_to(&mut self, pos: Position) {
        self.pos = Position::new(
            pos.col.clamp(0, self.width as i16 - 1),
            pos.row.clamp(0, self.height as i16 - 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_moves_and_clamps() {
        let mut c = Cursor::new(3, 2);
        assert_eq!(c.step(Direction::Left), Position::new(0, 0));
        assert_eq!(c.step(Direction::Down), Position::new(0, 0));
        assert_eq!(c.step(Direction::Up), Position::new(0, 1));
        assert_eq!(c.step(Direction::Up), Position::new(0, 1));
        c.step(Direction::Right);
        c.step(Direction::Right);
        assert_eq!(c.step(Direction::Right), Position::new(2, 1));
    }

    #[test]
    fn test_jump_clamps() {
        let mut c = Cursor::new(4, 4);
        c.jump_to(Position::new(9, -3));
        assert_eq!(c.position(), Position::new(3, 0));
    }
}
