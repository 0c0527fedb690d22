//! Board - the grid, its piece source and the cascade in flight.
//!
//! A board is built once per level from a [`BoardConfig`] and a
//! [`PieceSource`]. It starts match-free and is only mutated through swaps,
//! explicit removals and the cascade that follows them.
//!
//! # Driving a cascade
//!
//! ```
//! use tui_match3_core::{Board, BoardConfig, PieceCatalog, StepOutcome};
//! use tui_match3_core::types::Position;
//!
//! let mut board = Board::new(BoardConfig::default(), PieceCatalog::standard(7)).unwrap();
//! assert!(!board.scan_board());
//!
//! if board.begin_swap(Position::new(0, 0), Position::new(1, 0)).is_ok() {
//!     loop {
//!         match board.step().unwrap() {
//!             StepOutcome::Settled(_) | StepOutcome::Reverted => break,
//!             _ => {} // render between phases
//!         }
//!     }
//! }
//! assert!(!board.is_busy());
//! ```

use arrayvec::ArrayVec;

use crate::error::BoardError;
use crate::grid::{CellView, Grid, Piece};
use crate::layout::LayoutMask;
use crate::matcher::MatchResult;
use crate::resolver::{collapse, refill, CascadeReport, Phase, Resolver, StepOutcome};
use crate::rng::{PieceCatalog, PieceSource};
use crate::snapshot::BoardSnapshot;
use crate::swap::{SwapOutcome, SwapRejection};
use crate::types::{
    BoardEvent, Direction, MoveCause, PieceId, PieceKind, Position, DEFAULT_HEIGHT, DEFAULT_WIDTH,
    MAX_BOARD_DIM, MAX_CASCADE_ROUNDS, MAX_GENERATION_ATTEMPTS,
};

/// Board dimensions and the optional blocked-cell layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub layout: Option<LayoutMask>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl BoardConfig {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            layout: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutMask) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        let dims = 1..=MAX_BOARD_DIM;
        if !dims.contains(&self.width) || !dims.contains(&self.height) {
            return Err(BoardError::InvalidDimensions {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_DIM,
            });
        }

        if let Some(layout) = &self.layout {
            if layout.width() != self.width || layout.height() != self.height {
                return Err(BoardError::LayoutMismatch {
                    width: self.width,
                    height: self.height,
                    found_width: layout.width() as usize,
                    found_height: layout.height() as usize,
                });
            }
            if layout.usable_count() == 0 {
                return Err(BoardError::NoUsableCells);
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Board<S = PieceCatalog> {
    grid: Grid,
    source: S,
    resolver: Resolver,
    layout: Option<LayoutMask>,
    next_id: u32,
    events: Vec<BoardEvent>,
    /// Swap that started the cascade in flight, undone if its first scan finds nothing
    pending_swap: Option<(Position, Position)>,
    busy: bool,
}

impl<S: PieceSource> Board<S> {
    /// Validate `config` and generate a match-free board
    pub fn new(config: BoardConfig, source: S) -> Result<Self, BoardError> {
        let mut board = Self::empty(config, source)?;
        board.generate()?;
        Ok(board)
    }

    /// Validate `config` and build a board with every usable cell empty
    pub fn empty(config: BoardConfig, source: S) -> Result<Self, BoardError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height, config.layout.as_ref());
        Ok(Self {
            resolver: Resolver::new(config.width, config.height),
            grid,
            source,
            layout: config.layout,
            next_id: 0,
            events: Vec::new(),
            pending_swap: None,
            busy: false,
        })
    }

    /// Build a board from a text picture, top row first.
    ///
    /// Piece letters (`R`, `B`, `P`, `G`, `W`) place pieces, `.` is an empty
    /// usable cell and `#` is blocked. Blank lines and `;` comments are skipped.
    /// The picture is taken as-is, matches included.
    pub fn from_ascii(text: &str, source: S) -> Result<Self, BoardError> {
        let lines: Vec<(usize, &str)> = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty() && !l.starts_with(';'))
            .collect();

        let height = lines.len();
        let width = lines.first().map(|(_, l)| l.chars().count()).unwrap_or(0);
        if let Some((_, bad)) = lines.iter().find(|(_, l)| l.chars().count() != width) {
            return Err(BoardError::LayoutMismatch {
                width: width.min(u8::MAX as usize) as u8,
                height: height.min(u8::MAX as usize) as u8,
                found_width: bad.chars().count(),
                found_height: height,
            });
        }
        if width == 0 || width > MAX_BOARD_DIM as usize || height > MAX_BOARD_DIM as usize {
            return Err(BoardError::InvalidDimensions {
                width: width.min(u8::MAX as usize) as u8,
                height: height.min(u8::MAX as usize) as u8,
                max: MAX_BOARD_DIM,
            });
        }
        let (width, height) = (width as u8, height as u8);

        let mut blocked = vec![vec![false; width as usize]; height as usize];
        let mut kinds = Vec::new();
        for (i, (line_no, line)) in lines.iter().enumerate() {
            let row = height as usize - 1 - i;
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '#' => blocked[row][col] = true,
                    '.' => {}
                    _ => match PieceKind::from_char(ch) {
                        Some(kind) => kinds.push((col as i16, row as i16, kind)),
                        None => return Err(BoardError::LayoutParse { line: *line_no, ch }),
                    },
                }
            }
        }

        let mask = LayoutMask::from_rows(width, height, &blocked)?;
        let mut board = Self::empty(BoardConfig::new(width, height).with_layout(mask), source)?;
        // Column-major ids, same order generation uses.
        kinds.sort_by_key(|&(col, row, _)| (col, row));
        for (col, row, kind) in kinds {
            let id = board.alloc_id();
            let _ = board.grid.set(col, row, Piece::new(id, kind));
        }
        Ok(board)
    }

    fn alloc_id(&mut self) -> PieceId {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fill every usable cell, discarding whole fills that contain a match.
    ///
    /// Each cell avoids the kind of the two placed cells to its left or below
    /// it when they agree. The fill is built on a scratch grid and only
    /// replaces the current pieces once it is known to be match-free, so a
    /// failure leaves the board as it was. Piece ids restart from the same
    /// value on every attempt.
    fn generate(&mut self) -> Result<(), BoardError> {
        let first_id = self.next_id;
        let cells: Vec<Position> = self.grid.usable_positions().collect();
        let mut scratch = self.grid.clone();

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            scratch.clear_all();
            let mut next_id = first_id;
            if !fill_avoiding_runs(&mut scratch, &mut self.source, &cells, &mut next_id) {
                continue;
            }

            let has_match = self.resolver.scan(&scratch);
            self.resolver.clear_scan();
            if !has_match {
                log::info!(
                    "generated {}x{} board ({} pieces) after {} attempt(s)",
                    scratch.width(),
                    scratch.height(),
                    cells.len(),
                    attempt
                );
                self.grid = scratch;
                self.next_id = next_id;
                return Ok(());
            }
        }

        log::warn!("board generation gave up after {} attempts", MAX_GENERATION_ATTEMPTS);
        Err(BoardError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Throw the pieces away and generate a fresh board with the same layout.
    ///
    /// The source keeps its sequence, so a reset board differs from the first
    /// one. On error the current pieces are kept.
    pub fn reset(&mut self) -> Result<(), BoardError> {
        if self.busy {
            return Err(BoardError::Busy);
        }
        self.generate()?;
        self.events.clear();
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn layout(&self) -> Option<&LayoutMask> {
        self.layout.as_ref()
    }

    pub fn width(&self) -> u8 {
        self.grid.width()
    }

    pub fn height(&self) -> u8 {
        self.grid.height()
    }

    pub fn phase(&self) -> Phase {
        self.resolver.phase()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Id the next created piece will get
    pub fn next_piece_id(&self) -> PieceId {
        PieceId(self.next_id)
    }

    /// Scan the whole board and record its matches.
    ///
    /// While a cascade is in flight this reports the matches it already
    /// recorded instead of rescanning.
    pub fn scan_board(&mut self) -> bool {
        if self.busy {
            return !self.resolver.matches().is_empty();
        }
        self.resolver.scan(&self.grid)
    }

    /// Matches recorded by the last scan
    pub fn matches(&self) -> &[MatchResult] {
        self.resolver.matches()
    }

    pub fn is_marked(&self, pos: Position) -> bool {
        self.resolver.marks().is_marked(pos)
    }

    /// Remove one piece outside of any cascade. No event is emitted.
    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        if self.busy {
            return None;
        }
        self.grid.take(pos)
    }

    /// Start a cascade on the current board
    pub fn begin_cascade(&mut self) -> Result<(), BoardError> {
        if self.busy {
            return Err(BoardError::Busy);
        }
        self.busy = true;
        self.resolver.begin();
        log::debug!("cascade started");
        Ok(())
    }

    /// Advance the cascade by exactly one phase
    pub fn step(&mut self) -> Result<StepOutcome, BoardError> {
        match self.resolver.phase() {
            Phase::Idle => Ok(StepOutcome::Idle),
            Phase::Scanning => self.step_scan(),
            Phase::Removing => {
                let pieces = self.resolver.remove_matched(&mut self.grid, &mut self.events);
                self.resolver.set_phase(Phase::Collapsing);
                log::debug!("removed {} pieces", pieces);
                Ok(StepOutcome::Removed { pieces })
            }
            Phase::Collapsing => {
                let moved = collapse(&mut self.grid, &mut self.events);
                self.resolver.set_phase(Phase::Refilling);
                log::debug!("collapsed {} pieces", moved);
                Ok(StepOutcome::Collapsed { moved })
            }
            Phase::Refilling => {
                let spawned = refill(
                    &mut self.grid,
                    &mut self.source,
                    &mut self.next_id,
                    &mut self.events,
                );
                self.resolver.add_spawned(spawned);
                self.resolver.set_phase(Phase::Scanning);
                log::debug!("spawned {} pieces", spawned);
                Ok(StepOutcome::Refilled { spawned })
            }
        }
    }

    fn step_scan(&mut self) -> Result<StepOutcome, BoardError> {
        let scans = self.resolver.count_scan();
        if scans > MAX_CASCADE_ROUNDS {
            log::warn!("cascade still matching after {} scans, stopping", MAX_CASCADE_ROUNDS);
            self.resolver.finish();
            self.pending_swap = None;
            self.busy = false;
            return Err(BoardError::CascadeLimit {
                rounds: MAX_CASCADE_ROUNDS,
            });
        }

        if self.resolver.scan(&self.grid) {
            // A swap that produced a match is committed.
            self.pending_swap = None;
            self.resolver.set_phase(Phase::Removing);
            return Ok(StepOutcome::Matched {
                matches: self.resolver.matches().len(),
            });
        }

        if scans == 1 {
            if let Some((a, b)) = self.pending_swap.take() {
                self.swap_cells(a, b, MoveCause::SwapRevert);
                self.resolver.finish();
                self.busy = false;
                log::debug!("swap {} <-> {} reverted", a, b);
                return Ok(StepOutcome::Reverted);
            }
        }

        let empty = self.grid.empty_usable_count();
        if empty > 0 {
            self.resolver.set_phase(Phase::Collapsing);
            return Ok(StepOutcome::Holes { empty });
        }

        let report = self.resolver.finish();
        self.busy = false;
        self.events.push(BoardEvent::Settled {
            rounds: report.rounds,
        });
        log::debug!(
            "settled after {} round(s): {} removed, {} points",
            report.rounds,
            report.removed,
            report.points
        );
        Ok(StepOutcome::Settled(report))
    }

    /// Run the cascade to completion, starting one if none is in flight.
    ///
    /// A reverted swap yields an empty report.
    pub fn resolve_cascade(&mut self) -> Result<CascadeReport, BoardError> {
        if self.resolver.phase() == Phase::Idle {
            self.begin_cascade()?;
        }
        loop {
            match self.step()? {
                StepOutcome::Settled(report) => return Ok(report),
                StepOutcome::Reverted | StepOutcome::Idle => return Ok(CascadeReport::default()),
                _ => {}
            }
        }
    }

    /// Exchange two pieces, emitting one `Moved` event for each
    fn swap_cells(&mut self, a: Position, b: Position, cause: MoveCause) -> bool {
        let (Some(pa), Some(pb)) = (self.grid.piece(a), self.grid.piece(b)) else {
            return false;
        };
        if !self.grid.swap(a, b) {
            return false;
        }
        for (piece, from, to) in [(pa, a, b), (pb, b, a)] {
            self.events.push(BoardEvent::Moved {
                piece: piece.id,
                kind: piece.kind,
                from,
                to,
                cause,
            });
        }
        true
    }

    /// Why a swap of `a` and `b` would be refused right now, if at all
    pub fn check_swap(&self, a: Position, b: Position) -> Option<SwapRejection> {
        if self.busy {
            return Some(SwapRejection::Busy);
        }
        if !a.is_adjacent(b) {
            return Some(SwapRejection::NotAdjacent);
        }
        match (self.grid.at(a), self.grid.at(b)) {
            (CellView::Blocked, _) | (_, CellView::Blocked) => Some(SwapRejection::Unusable),
            (CellView::Empty, _) | (_, CellView::Empty) => Some(SwapRejection::Empty),
            _ => None,
        }
    }

    /// Swap two adjacent pieces and start the cascade without running it.
    ///
    /// Drive the rest with [`Board::step`]; the first scan either commits the
    /// swap or undoes it.
    pub fn begin_swap(&mut self, a: Position, b: Position) -> Result<(), SwapRejection> {
        if let Some(reason) = self.check_swap(a, b) {
            log::debug!("swap {} <-> {} rejected: {}", a, b, reason.as_str());
            return Err(reason);
        }
        if !self.swap_cells(a, b, MoveCause::Swap) {
            return Err(SwapRejection::Empty);
        }
        self.pending_swap = Some((a, b));
        self.busy = true;
        self.resolver.begin();
        Ok(())
    }

    /// Swap two adjacent pieces and resolve everything that follows
    pub fn try_swap(&mut self, a: Position, b: Position) -> Result<SwapOutcome, BoardError> {
        if let Err(reason) = self.begin_swap(a, b) {
            return Ok(SwapOutcome::Rejected(reason));
        }
        loop {
            match self.step()? {
                StepOutcome::Reverted => return Ok(SwapOutcome::Reverted),
                StepOutcome::Settled(report) => return Ok(SwapOutcome::Committed(report)),
                _ => {}
            }
        }
    }

    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Hand over every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.grid, self.phase(), self.busy)
    }
}

/// Fill `cells` in order, never completing a run of three with the two
/// cells to the left or the two cells below. Returns false when the source
/// has no kind left for some cell.
fn fill_avoiding_runs<S: PieceSource>(
    grid: &mut Grid,
    source: &mut S,
    cells: &[Position],
    next_id: &mut u32,
) -> bool {
    for &pos in cells {
        let mut avoid: ArrayVec<PieceKind, 2> = ArrayVec::new();
        for dir in [Direction::Left, Direction::Down] {
            let near = pos.step(dir);
            let far = near.step(dir);
            if let Some(kind) = grid.kind_at(near) {
                if grid.kind_at(far) == Some(kind) && !avoid.contains(&kind) {
                    avoid.push(kind);
                }
            }
        }

        let Some(kind) = source.next_kind_avoiding(&avoid) else {
            return false;
        };
        let _ = grid.set(pos.col, pos.row, Piece::new(PieceId(*next_id), kind));
        *next_id += 1;
    }
    true
}
