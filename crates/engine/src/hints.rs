use arrayvec::ArrayVec;
use serde::Serialize;

use crate::core::{scan_run, super_match, Board, CellView, Grid, PieceSource, ScanMarks};
use crate::types::{Direction, MatchShape, Position, MIN_RUN};

/// A swap that would produce a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SwapHint {
    pub a: Position,
    pub b: Position,
    pub shape: MatchShape,
    /// Pieces in the largest match the swap creates
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintError {
    Busy,
    NoMoves,
}

impl HintError {
    pub fn code(self) -> &'static str {
        match self {
            HintError::Busy => "busy",
            HintError::NoMoves => "no_moves",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            HintError::Busy => "board is resolving a cascade",
            HintError::NoMoves => "no swap on this board produces a match",
        }
    }
}

/// Every swap that matches, in column-major order of its first cell.
///
/// Only right and up neighbours are tried, so each pair shows up once.
pub fn find_swaps<S: PieceSource>(board: &Board<S>) -> Result<Vec<SwapHint>, HintError> {
    if board.is_busy() {
        return Err(HintError::Busy);
    }
    Ok(swaps_in_grid(board.grid()))
}

pub fn swaps_in_grid(grid: &Grid) -> Vec<SwapHint> {
    let mut scratch = grid.clone();
    let marks = ScanMarks::new(grid.width(), grid.height());
    let mut hints = Vec::new();

    for a in grid.positions() {
        if !matches!(grid.at(a), CellView::Occupied(_)) {
            continue;
        }
        for dir in [Direction::Right, Direction::Up] {
            let b = a.step(dir);
            if !matches!(grid.at(b), CellView::Occupied(_)) {
                continue;
            }
            // Same kind on both sides changes nothing.
            if grid.kind_at(a) == grid.kind_at(b) {
                continue;
            }

            scratch.swap(a, b);
            if let Some((shape, size)) = best_match_at(&scratch, &marks, [a, b]) {
                hints.push(SwapHint { a, b, shape, size });
            }
            scratch.swap(a, b);
        }
    }

    log::debug!("found {} possible swaps", hints.len());
    hints
}

fn best_match_at(grid: &Grid, marks: &ScanMarks, origins: [Position; 2]) -> Option<(MatchShape, usize)> {
    let mut found: ArrayVec<(MatchShape, usize), 2> = ArrayVec::new();
    for origin in origins {
        let run = scan_run(grid, marks, origin);
        if run.len() < MIN_RUN || !run.is_match() {
            continue;
        }
        let merged = super_match(grid, marks, run);
        found.push((merged.shape, merged.len()));
    }
    // First origin wins a tie.
    found
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
}

/// The swap with the largest match; ties go to the earliest swap
pub fn best_swap<S: PieceSource>(board: &Board<S>) -> Result<SwapHint, HintError> {
    find_swaps(board)?
        .into_iter()
        .reduce(|best, next| if next.size > best.size { next } else { best })
        .ok_or(HintError::NoMoves)
}

pub fn has_moves<S: PieceSource>(board: &Board<S>) -> Result<bool, HintError> {
    Ok(!find_swaps(board)?.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardConfig, PieceCatalog, SequenceSource};

    fn board(text: &str) -> Board<SequenceSource> {
        Board::from_ascii(text, SequenceSource::from_letters("GBPW")).unwrap()
    }

    #[test]
    fn finds_the_single_matching_swap() {
        let b = board("GBGP\nRRBR\nBGPG");
        let hints = find_swaps(&b).unwrap();
        assert_eq!(
            hints,
            vec![SwapHint {
                a: Position::new(2, 1),
                b: Position::new(3, 1),
                shape: MatchShape::Horizontal,
                size: 3,
            }]
        );
        assert!(has_moves(&b).unwrap());
    }

    #[test]
    fn dead_board_has_no_moves() {
        let b = board("RGB\nGBR\nBRG");
        assert!(!has_moves(&b).unwrap());
        assert_eq!(best_swap(&b), Err(HintError::NoMoves));
        assert_eq!(HintError::NoMoves.code(), "no_moves");
    }

    #[test]
    fn best_swap_prefers_larger_matches() {
        // Lifting the red at (2,1) into the bottom row makes five in a row.
        let b = board("BGBGB\nWPRGW\nRRBRR");
        let hints = find_swaps(&b).unwrap();
        assert!(hints.iter().any(|h| h.size == 3));
        let best = best_swap(&b).unwrap();
        assert_eq!((best.a, best.b), (Position::new(2, 0), Position::new(2, 1)));
        assert_eq!(best.shape, MatchShape::LongHorizontal);
        assert_eq!(best.size, 5);
    }

    #[test]
    fn analysis_does_not_touch_the_board() {
        let b = Board::new(BoardConfig::default(), PieceCatalog::standard(3)).unwrap();
        let before = b.snapshot();
        let _ = find_swaps(&b).unwrap();
        assert_eq!(b.snapshot(), before);
    }

    #[test]
    fn every_hint_commits() {
        let b = Board::new(BoardConfig::default(), PieceCatalog::standard(11)).unwrap();
        for hint in find_swaps(&b).unwrap() {
            let mut trial = b.clone();
            let outcome = trial.try_swap(hint.a, hint.b).unwrap();
            assert!(outcome.is_committed(), "{hint:?} gave {outcome:?}");
        }
    }

    #[test]
    fn busy_board_is_refused() {
        let mut b = board("GBGB\nRRBR\nBGPG");
        b.begin_swap(Position::new(2, 1), Position::new(3, 1)).unwrap();
        assert_eq!(find_swaps(&b), Err(HintError::Busy));
        assert_eq!(HintError::Busy.code(), "busy");
    }
}
