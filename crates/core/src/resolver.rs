//! Resolver - the scan / remove / collapse / refill cascade.
//!
//! ```text
//! Idle -> Scanning -> (Removing -> Collapsing -> Refilling -> Scanning)* -> Idle
//! ```
//!
//! The [`Resolver`] owns the per-scan state (marks and recorded matches) and
//! the report of the cascade in progress. The phase functions below work on a
//! borrowed [`Grid`]; [`crate::Board::step`] decides which one runs next, so a
//! driver can pause between any two phases to animate.

use serde::Serialize;

use crate::grid::{CellView, Grid, Piece};
use crate::matcher::{scan_run, super_match, MatchResult, ScanMarks};
use crate::rng::PieceSource;
use crate::scoring::score_in_round;
use crate::types::{
    BoardEvent, MatchShape, MoveCause, PieceId, PieceKind, Position, MIN_RUN,
};

/// Cascade state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Scanning,
    Removing,
    Collapsing,
    Refilling,
}

/// One removed match, as reported to scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub round: u32,
    pub shape: MatchShape,
    pub kind: PieceKind,
    pub size: u32,
    pub points: u32,
}

/// Totals for one cascade, from the first scan until the board settled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    /// Scan rounds that removed at least one match
    pub rounds: u32,
    pub removed: u32,
    pub spawned: u32,
    pub points: u32,
    pub matches: Vec<MatchSummary>,
}

/// Result of advancing the cascade by one phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing in flight
    Idle,
    /// Matches were found and recorded; removal is next
    Matched { matches: usize },
    /// No match, but empty cells remain; collapse and refill are next
    Holes { empty: usize },
    /// The swap that started this cascade matched nothing and was undone
    Reverted,
    Removed { pieces: usize },
    Collapsed { moved: usize },
    Refilled { spawned: usize },
    /// The board is stable again
    Settled(CascadeReport),
}

#[derive(Debug, Clone)]
pub struct Resolver {
    phase: Phase,
    marks: ScanMarks,
    matches: Vec<MatchResult>,
    scans: u32,
    report: CascadeReport,
}

impl Resolver {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            phase: Phase::Idle,
            marks: ScanMarks::new(width, height),
            matches: Vec::new(),
            scans: 0,
            report: CascadeReport::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    pub fn marks(&self) -> &ScanMarks {
        &self.marks
    }

    /// Scans performed by the cascade in flight
    pub fn scans(&self) -> u32 {
        self.scans
    }

    pub fn report(&self) -> &CascadeReport {
        &self.report
    }

    /// Forget scan state and start a fresh report
    pub(crate) fn begin(&mut self) {
        self.clear_scan();
        self.scans = 0;
        self.report = CascadeReport::default();
        self.phase = Phase::Scanning;
    }

    pub(crate) fn finish(&mut self) -> CascadeReport {
        self.phase = Phase::Idle;
        self.clear_scan();
        std::mem::take(&mut self.report)
    }

    pub(crate) fn count_scan(&mut self) -> u32 {
        self.scans += 1;
        self.scans
    }

    pub(crate) fn clear_scan(&mut self) {
        self.marks.reset();
        self.matches.clear();
    }

    /// Record every match on the board.
    ///
    /// Cells are visited column-major; each unmarked piece is tried as an
    /// origin, runs of [`MIN_RUN`] or more go through super-match merging and
    /// all their members are marked so later origins cannot claim them again.
    pub fn scan(&mut self, grid: &Grid) -> bool {
        self.clear_scan();

        for pos in grid.positions() {
            if !matches!(grid.at(pos), CellView::Occupied(_)) || self.marks.is_marked(pos) {
                continue;
            }

            let result = scan_run(grid, &self.marks, pos);
            if result.len() < MIN_RUN || !result.is_match() {
                continue;
            }

            let result = super_match(grid, &self.marks, result);
            for member in result.positions() {
                self.marks.mark(member);
            }
            log::debug!(
                "match {} x{} {:?} at {}",
                result.shape.as_str(),
                result.len(),
                result.kind(),
                pos
            );
            self.matches.push(result);
        }

        !self.matches.is_empty()
    }

    /// Drop every marked piece from the grid, one `Removed` event per match
    pub fn remove_matched(&mut self, grid: &mut Grid, events: &mut Vec<BoardEvent>) -> usize {
        self.report.rounds += 1;
        let round = self.report.rounds;
        let mut removed = 0;

        for result in &self.matches {
            let Some(kind) = result.kind() else {
                continue;
            };
            let mut pieces = Vec::with_capacity(result.len());
            for piece in &result.pieces {
                let pos = piece.position();
                if grid.clear(pos.col, pos.row).is_some() {
                    pieces.push((piece.id, pos));
                }
            }
            if pieces.is_empty() {
                continue;
            }

            let size = pieces.len();
            let points = score_in_round(result.shape, size, round);
            removed += size;
            self.report.points += points;
            self.report.matches.push(MatchSummary {
                round,
                shape: result.shape,
                kind,
                size: size as u32,
                points,
            });
            events.push(BoardEvent::Removed {
                shape: result.shape,
                kind,
                pieces,
            });
        }

        self.report.removed += removed as u32;
        self.clear_scan();
        removed
    }

    pub(crate) fn add_spawned(&mut self, spawned: usize) {
        self.report.spawned += spawned as u32;
    }
}

/// Let pieces fall down their columns into empty usable cells.
///
/// For each column the lowest empty usable cell is filled by the nearest piece
/// above it (blocked cells in between are passed over) until no piece sits
/// above an empty usable cell. Returns the number of pieces moved.
pub fn collapse(grid: &mut Grid, events: &mut Vec<BoardEvent>) -> usize {
    let (width, height) = (grid.width() as i16, grid.height() as i16);
    let mut moved = 0;

    for col in 0..width {
        for target in 0..height {
            if grid.get(col, target) != CellView::Empty {
                continue;
            }

            let Some(src) = ((target + 1)..height)
                .find(|&row| matches!(grid.get(col, row), CellView::Occupied(_)))
            else {
                // Nothing left above this hole.
                break;
            };

            let from = Position::new(col, src);
            let to = Position::new(col, target);
            let Some(piece) = grid.piece(from) else {
                break;
            };
            if grid.move_piece(from, to) {
                moved += 1;
                events.push(BoardEvent::Moved {
                    piece: piece.id,
                    kind: piece.kind,
                    from,
                    to,
                    cause: MoveCause::Collapse,
                });
            }
        }
    }

    moved
}

/// Fill every empty usable cell with a new piece.
///
/// Columns are filled from the top down. The pieces of one column drop in from
/// a stack above the board, the lowest new piece starting just above the top row.
pub fn refill<S: PieceSource + ?Sized>(
    grid: &mut Grid,
    source: &mut S,
    next_id: &mut u32,
    events: &mut Vec<BoardEvent>,
) -> usize {
    let (width, height) = (grid.width() as i16, grid.height() as i16);
    let mut spawned = 0;

    for col in 0..width {
        let holes = (0..height)
            .filter(|&row| grid.get(col, row) == CellView::Empty)
            .count() as i16;
        let mut stacked = holes;

        for row in (0..height).rev() {
            if grid.get(col, row) != CellView::Empty {
                continue;
            }
            stacked -= 1;

            let id = PieceId(*next_id);
            *next_id += 1;
            let kind = source.next_kind();
            if grid.set(col, row, Piece::new(id, kind)).is_ok() {
                spawned += 1;
                events.push(BoardEvent::Spawned {
                    piece: id,
                    kind,
                    from: Position::new(col, height + stacked),
                    to: Position::new(col, row),
                });
            }
        }
    }

    spawned
}
