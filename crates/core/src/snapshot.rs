//! Immutable copy of a board for rendering, comparison and export.
//!
//! Cells are stored row-major with the **top** row first, the order a
//! terminal draws them in.

use serde::Serialize;

use crate::grid::{CellView, Grid};
use crate::resolver::Phase;
use crate::types::{PieceId, PieceKind, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotCell {
    Blocked,
    Empty,
    Piece { id: PieceId, kind: PieceKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<SnapshotCell>,
    pub phase: Phase,
    pub busy: bool,
}

impl BoardSnapshot {
    pub fn capture(grid: &Grid, phase: Phase, busy: bool) -> Self {
        let (width, height) = (grid.width(), grid.height());
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in (0..height as i16).rev() {
            for col in 0..width as i16 {
                cells.push(match grid.get(col, row) {
                    CellView::Blocked => SnapshotCell::Blocked,
                    CellView::Empty => SnapshotCell::Empty,
                    CellView::Occupied(p) => SnapshotCell::Piece {
                        id: p.id,
                        kind: p.kind,
                    },
                });
            }
        }
        Self {
            width,
            height,
            cells,
            phase,
            busy,
        }
    }

    /// Cell at board coordinates (row 0 at the bottom); off-board reads as blocked
    pub fn cell(&self, pos: Position) -> SnapshotCell {
        if pos.col < 0 || pos.row < 0 || pos.col >= self.width as i16 || pos.row >= self.height as i16
        {
            return SnapshotCell::Blocked;
        }
        let top_row = self.height as usize - 1 - pos.row as usize;
        self.cells[top_row * self.width as usize + pos.col as usize]
    }

    /// Rows as drawn, top row first
    pub fn rows(&self) -> impl Iterator<Item = &[SnapshotCell]> {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// FNV-1a over dimensions and cell contents
    pub fn board_hash(&self) -> u64 {
        const OFFSET: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;

        let mut hash = OFFSET;
        let mut feed = |bytes: &[u8]| {
            for b in bytes {
                hash ^= *b as u64;
                hash = hash.wrapping_mul(PRIME);
            }
        };

        feed(&[self.width, self.height]);
        for cell in &self.cells {
            match cell {
                SnapshotCell::Blocked => feed(&[0]),
                SnapshotCell::Empty => feed(&[1]),
                SnapshotCell::Piece { id, kind } => {
                    feed(&[2, kind.code()]);
                    feed(&id.0.to_le_bytes());
                }
            }
        }
        hash
    }

    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.rows() {
            for cell in row {
                out.push(match cell {
                    SnapshotCell::Blocked => '#',
                    SnapshotCell::Empty => '.',
                    SnapshotCell::Piece { kind, .. } => kind.as_char(),
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
    use crate::grid::Piece;
    use crate::layout::LayoutMask;

    fn sample() -> Grid {
        let mask = LayoutMask::parse(2, 2, "#.\n..").unwrap();
        let mut grid = Grid::new(2, 2, Some(&mask));
        grid.set(0, 0, Piece::new(PieceId(1), PieceKind::Red)).unwrap();
        grid.set(1, 1, Piece::new(PieceId(2), PieceKind::Blue)).unwrap();
        grid
    }

    #[test]
    fn test_cells_are_top_row_first() {
        let snap = BoardSnapshot::capture(&sample(), Phase::Idle, false);
        assert_eq!(snap.cells[0], SnapshotCell::Blocked);
        assert_eq!(
            snap.cells[1],
            SnapshotCell::Piece {
                id: PieceId(2),
                kind: PieceKind::Blue
            }
        );
        assert_eq!(snap.cell(Position::new(1, 0)), SnapshotCell::Empty);
        assert_eq!(snap.cell(Position::new(5, 0)), SnapshotCell::Blocked);
        assert_eq!(snap.to_ascii(), "#B\nR.\n");
    }

    #[test]
    fn test_hash_tracks_ids() {
        let grid = sample();
        let a = BoardSnapshot::capture(&grid, Phase::Idle, false);
        assert_eq!(a.board_hash(), BoardSnapshot::capture(&grid, Phase::Idle, false).board_hash());

        let mut other = grid.clone();
        other.take(Position::new(0, 0));
        other.set(0, 0, Piece::new(PieceId(9), PieceKind::Red)).unwrap();
        let b = BoardSnapshot::capture(&other, Phase::Idle, false);
        assert_eq!(a.to_ascii(), b.to_ascii());
        assert_ne!(a.board_hash(), b.board_hash());
    }

    #[test]
    fn test_serializes_tagged_cells() {
        let snap = BoardSnapshot::capture(&sample(), Phase::Idle, false);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains(r#""type":"blocked""#));
        assert!(json.contains(r#""phase":"idle""#));
    }
}
