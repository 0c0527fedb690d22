//! Match detection - runs along one axis and super-match merging.
//!
//! [`scan_run`] reports at most one straight run per origin: horizontal is
//! tried first, vertical only when the horizontal run is shorter than
//! [`MIN_RUN`]. Cross, T and L shapes are never reported twice; instead
//! [`super_match`] grows a straight run with the perpendicular runs hanging
//! off its members.
//!
//! Pieces already claimed by an earlier match in the same scan are recorded in
//! [`ScanMarks`] and treated like a color mismatch by both functions.

use crate::grid::{CellView, Grid, Piece};
use crate::types::{
    Axis, Direction, MatchShape, PieceId, PieceKind, Position, MIN_RUN, SUPER_MIN_PERPENDICULAR,
};

/// Per-scan marker set: which cells already belong to a recorded match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMarks {
    width: u8,
    height: u8,
    marked: Vec<bool>,
}

impl ScanMarks {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            marked: vec![false; width as usize * height as usize],
        }
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if pos.col < 0 || pos.row < 0 || pos.col >= self.width as i16 || pos.row >= self.height as i16
        {
            return None;
        }
        Some(pos.row as usize * self.width as usize + pos.col as usize)
    }

    pub fn reset(&mut self) {
        self.marked.fill(false);
    }

    pub fn mark(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.marked[i] = true;
        }
    }

    pub fn is_marked(&self, pos: Position) -> bool {
        self.index(pos).map(|i| self.marked[i]).unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.marked.iter().filter(|m| **m).count()
    }

    /// Marked cells in column-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let (w, h) = (self.width as i16, self.height as i16);
        (0..w)
            .flat_map(move |col| (0..h).map(move |row| Position::new(col, row)))
            .filter(|p| self.is_marked(*p))
    }
}

/// Connected pieces and the shape they form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchResult {
    pub pieces: Vec<Piece>,
    pub shape: MatchShape,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            pieces: Vec::new(),
            shape: MatchShape::None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.shape != MatchShape::None
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn kind(&self) -> Option<PieceKind> {
        self.pieces.first().map(|p| p.kind)
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.iter().any(|p| p.id == id)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.pieces.iter().map(|p| p.position())
    }
}

/// Walk from `start` in `dir`, collecting same-kind pieces until anything else is hit
fn walk(
    grid: &Grid,
    marks: &ScanMarks,
    start: Position,
    dir: Direction,
    kind: PieceKind,
    exclude: &[Piece],
    out: &mut Vec<Piece>,
) {
    let mut pos = start;
    loop {
        let CellView::Occupied(next) = grid.at(pos) else {
            break;
        };
        if next.kind != kind
            || marks.is_marked(pos)
            || exclude.iter().any(|p| p.id == next.id)
            || out.iter().any(|p| p.id == next.id)
        {
            break;
        }
        out.push(next);
        pos = pos.step(dir);
    }
}

/// Find the run through the piece at `origin`.
///
/// Returns a `None`-shaped result when the origin is empty, blocked, already
/// marked, or part of no run of [`MIN_RUN`] or more in either axis.
pub fn scan_run(grid: &Grid, marks: &ScanMarks, origin: Position) -> MatchResult {
    let Some(piece) = grid.piece(origin) else {
        return MatchResult::none();
    };
    if marks.is_marked(origin) {
        return MatchResult::none();
    }

    let mut run = Vec::with_capacity(8);
    for axis in [Axis::Horizontal, Axis::Vertical] {
        run.clear();
        run.push(piece);
        for dir in axis.directions() {
            walk(grid, marks, origin.step(dir), dir, piece.kind, &[], &mut run);
        }

        let shape = MatchShape::classify(axis, run.len());
        if shape != MatchShape::None {
            return MatchResult { pieces: run, shape };
        }
    }

    MatchResult {
        pieces: run,
        shape: MatchShape::None,
    }
}

/// Upgrade a straight run to [`MatchShape::Super`] when any member also sits
/// in a perpendicular run of at least [`SUPER_MIN_PERPENDICULAR`] further pieces.
///
/// Every perpendicular extension that reaches the threshold is merged; shorter
/// ones are ignored. A run without any qualifying extension comes back unchanged.
pub fn super_match(grid: &Grid, marks: &ScanMarks, result: MatchResult) -> MatchResult {
    let Some(axis) = result.shape.axis() else {
        return result;
    };
    if result.len() < MIN_RUN {
        return result;
    }
    let Some(kind) = result.kind() else {
        return result;
    };

    let cross = axis.perpendicular();
    let mut merged = result.pieces.clone();
    let mut extension = Vec::new();

    for member in &result.pieces {
        extension.clear();
        for dir in cross.directions() {
            walk(
                grid,
                marks,
                member.position().step(dir),
                dir,
                kind,
                &merged,
                &mut extension,
            );
        }
        if extension.len() >= SUPER_MIN_PERPENDICULAR {
            merged.extend_from_slice(&extension);
        }
    }

    if merged.len() == result.len() {
        return result;
    }
    MatchResult {
        pieces: merged,
        shape: MatchShape::Super,
    }
}
