//! Grid module - cell storage for the board
//!
//! The grid is a `width x height` flat array of slots (row-major, row 0 at
//! the bottom). Each slot records whether it is usable and which piece, if any,
//! occupies it. Every query is bounds-checked: coordinates off the board read
//! as [`CellView::Blocked`], the same answer a permanently blocked cell gives,
//! so directional scans can walk until they hit anything that is not a piece.
//!
//! The grid is the only place that changes a piece's stored position, and it
//! does so in the same call that moves the piece between slots.

use crate::layout::LayoutMask;
use crate::types::{PieceId, PieceKind, Position};

/// A piece on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pos: Position,
}

impl Piece {
    /// A piece not yet placed. Its position is assigned when the grid takes it.
    pub fn new(id: PieceId, kind: PieceKind) -> Self {
        Self {
            id,
            kind,
            pos: Position::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }
}

/// What a coordinate holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    /// Out of bounds or permanently blocked
    Blocked,
    /// Usable, currently without a piece
    Empty,
    Occupied(Piece),
}

impl CellView {
    pub fn piece(self) -> Option<Piece> {
        match self {
            CellView::Occupied(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_usable(self) -> bool {
        !matches!(self, CellView::Blocked)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Slot {
    usable: bool,
    occupant: Option<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: u8,
    height: u8,
    slots: Vec<Slot>,
}

impl Grid {
    /// Create an empty grid. Cells blocked by `layout` are never usable.
    ///
    /// The layout is expected to match the grid dimensions; board construction
    /// validates that before calling this.
    pub fn new(width: u8, height: u8, layout: Option<&LayoutMask>) -> Self {
        let mut slots = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height as i16 {
            for col in 0..width as i16 {
                let blocked = layout.map(|m| m.is_blocked(col, row)).unwrap_or(false);
                slots.push(Slot {
                    usable: !blocked,
                    occupant: None,
                });
            }
        }
        Self {
            width,
            height,
            slots,
        }
    }

    #[inline(always)]
    fn index(&self, col: i16, row: i16) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width as i16 || row >= self.height as i16 {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos.col, pos.row).is_some()
    }

    pub fn get(&self, col: i16, row: i16) -> CellView {
        match self.index(col, row).map(|i| &self.slots[i]) {
            Some(Slot { usable: true, occupant: Some(p) }) => CellView::Occupied(*p),
            Some(Slot { usable: true, occupant: None }) => CellView::Empty,
            _ => CellView::Blocked,
        }
    }

    pub fn at(&self, pos: Position) -> CellView {
        self.get(pos.col, pos.row)
    }

    pub fn is_usable(&self, col: i16, row: i16) -> bool {
        self.get(col, row).is_usable()
    }

    pub fn piece(&self, pos: Position) -> Option<Piece> {
        self.at(pos).piece()
    }

    pub fn kind_at(&self, pos: Position) -> Option<PieceKind> {
        self.piece(pos).map(|p| p.kind)
    }

    /// Place `piece` at `(col, row)`, stamping its position.
    ///
    /// Returns the previous occupant, or gives the piece back as `Err` when the
    /// cell is blocked or off the board.
    pub fn set(&mut self, col: i16, row: i16, mut piece: Piece) -> Result<Option<Piece>, Piece> {
        match self.index(col, row) {
            Some(idx) if self.slots[idx].usable => {
                piece.pos = Position::new(col, row);
                Ok(self.slots[idx].occupant.replace(piece))
            }
            _ => Err(piece),
        }
    }

    /// Remove and return the occupant of `(col, row)`
    pub fn clear(&mut self, col: i16, row: i16) -> Option<Piece> {
        let idx = self.index(col, row)?;
        self.slots[idx].occupant.take()
    }

    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        self.clear(pos.col, pos.row)
    }

    /// Move the occupant of `from` into the empty usable cell `to`
    pub fn move_piece(&mut self, from: Position, to: Position) -> bool {
        if self.at(to) != CellView::Empty {
            return false;
        }
        let Some(piece) = self.clear(from.col, from.row) else {
            return false;
        };
        match self.set(to.col, to.row, piece) {
            Ok(_) => true,
            Err(piece) => {
                // `to` was checked above, so this only restores on a logic error.
                let _ = self.set(from.col, from.row, piece);
                false
            }
        }
    }

    /// Exchange the occupants of two occupied cells and fix both positions
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a.col, a.row), self.index(b.col, b.row)) else {
            return false;
        };
        if ia == ib {
            return false;
        }
        let (Some(mut pa), Some(mut pb)) = (self.slots[ia].occupant, self.slots[ib].occupant) else {
            return false;
        };
        pa.pos = b;
        pb.pos = a;
        self.slots[ia].occupant = Some(pb);
        self.slots[ib].occupant = Some(pa);
        true
    }

    /// All coordinates in column-major order (column 0 bottom to top, then column 1, ...)
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let (w, h) = (self.width as i16, self.height as i16);
        (0..w).flat_map(move |col| (0..h).map(move |row| Position::new(col, row)))
    }

    pub fn usable_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.positions().filter(|p| self.at(*p).is_usable())
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.slots.iter().filter_map(|s| s.occupant.as_ref())
    }

    pub fn usable_count(&self) -> usize {
        self.slots.iter().filter(|s| s.usable).count()
    }

    pub fn empty_usable_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.usable && s.occupant.is_none())
            .count()
    }

    /// Drop every piece, keeping the usable/blocked layout
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.occupant = None;
        }
    }

    /// Text picture of the grid, top row first (`#` blocked, `.` empty, piece letters otherwise)
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in (0..self.height as i16).rev() {
            for col in 0..self.width as i16 {
                out.push(match self.get(col, row) {
                    CellView::Blocked => '#',
                    CellView::Empty => '.',
                    CellView::Occupied(p) => p.kind.as_char(),
                });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(id: u32, kind: PieceKind) -> Piece {
        Piece::new(PieceId(id), kind)
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(6, 8, None);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(5, 0), Some(5));
        assert_eq!(grid.index(0, 1), Some(6));
        assert_eq!(grid.index(5, 7), Some(47));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(6, 0), None);
        assert_eq!(grid.index(0, 8), None);
    }

    #[test]
    fn test_set_stamps_position() {
        let mut grid = Grid::new(3, 3, None);
        assert_eq!(grid.set(2, 1, piece(7, PieceKind::Red)), Ok(None));
        let placed = grid.piece(Position::new(2, 1)).unwrap();
        assert_eq!(placed.position(), Position::new(2, 1));
        assert_eq!(placed.id, PieceId(7));
    }

    #[test]
    fn test_set_into_blocked_cell_hands_piece_back() {
        let mask = LayoutMask::parse(2, 1, "#.").unwrap();
        let mut grid = Grid::new(2, 1, Some(&mask));
        let p = piece(1, PieceKind::Blue);
        assert_eq!(grid.set(0, 0, p), Err(p));
        assert_eq!(grid.set(9, 0, p), Err(p));
        assert_eq!(grid.get(0, 0), CellView::Blocked);
        assert_eq!(grid.get(1, 0), CellView::Empty);
    }

    #[test]
    fn test_swap_exchanges_positions() {
        let mut grid = Grid::new(2, 1, None);
        grid.set(0, 0, piece(1, PieceKind::Red)).unwrap();
        grid.set(1, 0, piece(2, PieceKind::Blue)).unwrap();

        assert!(grid.swap(Position::new(0, 0), Position::new(1, 0)));

        let left = grid.piece(Position::new(0, 0)).unwrap();
        let right = grid.piece(Position::new(1, 0)).unwrap();
        assert_eq!((left.id, left.position()), (PieceId(2), Position::new(0, 0)));
        assert_eq!((right.id, right.position()), (PieceId(1), Position::new(1, 0)));
    }

    #[test]
    fn test_swap_needs_two_occupants() {
        let mut grid = Grid::new(2, 1, None);
        grid.set(0, 0, piece(1, PieceKind::Red)).unwrap();
        let before = grid.clone();
        assert!(!grid.swap(Position::new(0, 0), Position::new(1, 0)));
        assert!(!grid.swap(Position::new(0, 0), Position::new(0, 0)));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_move_piece_requires_empty_target() {
        let mut grid = Grid::new(1, 3, None);
        grid.set(0, 2, piece(1, PieceKind::Green)).unwrap();
        grid.set(0, 1, piece(2, PieceKind::White)).unwrap();

        assert!(!grid.move_piece(Position::new(0, 2), Position::new(0, 1)));
        assert!(grid.move_piece(Position::new(0, 1), Position::new(0, 0)));
        assert_eq!(
            grid.piece(Position::new(0, 0)).map(|p| p.position()),
            Some(Position::new(0, 0))
        );
        assert_eq!(grid.get(0, 1), CellView::Empty);
    }

    #[test]
    fn test_positions_are_column_major() {
        let grid = Grid::new(2, 2, None);
        let order: Vec<_> = grid.positions().collect();
        assert_eq!(
            order,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_to_ascii_top_row_first() {
        let mask = LayoutMask::parse(2, 2, "#.\n..").unwrap();
        let mut grid = Grid::new(2, 2, Some(&mask));
        grid.set(0, 0, piece(1, PieceKind::Purple)).unwrap();
        assert_eq!(grid.to_ascii(), "#.\nP.\n");
    }
}
