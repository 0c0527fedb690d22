//! Swap controller - two-click selection on top of [`Board::try_swap`].
//!
//! The first click selects a piece, clicking it again deselects it, and
//! clicking any other piece attempts a swap. The selection is cleared after
//! every attempt, whatever its outcome.

use serde::Serialize;

use crate::board::Board;
use crate::error::BoardError;
use crate::grid::CellView;
use crate::resolver::CascadeReport;
use crate::rng::PieceSource;
use crate::types::Position;

/// Why a swap request was refused. The board is untouched in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapRejection {
    /// A cascade is in flight
    Busy,
    NotAdjacent,
    /// One of the cells is blocked or off the board
    Unusable,
    /// One of the cells holds no piece
    Empty,
}

impl SwapRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapRejection::Busy => "board busy",
            SwapRejection::NotAdjacent => "pieces not adjacent",
            SwapRejection::Unusable => "cell not usable",
            SwapRejection::Empty => "cell empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    Rejected(SwapRejection),
    /// The swap matched nothing and was undone
    Reverted,
    Committed(CascadeReport),
}

impl SwapOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SwapOutcome::Committed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(Position),
    Deselected,
    Swapped(SwapOutcome),
    /// A stepped swap was accepted; drive the board with [`Board::step`]
    SwapStarted,
    /// Busy board, or a cell without a piece
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapController {
    selected: Option<Position>,
}

impl SwapController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Handle a click on `pos`, resolving a swap to completion
    pub fn select<S: PieceSource>(
        &mut self,
        board: &mut Board<S>,
        pos: Position,
    ) -> Result<Selection, BoardError> {
        match self.pick(board, pos) {
            Pick::Swap(first) => Ok(Selection::Swapped(board.try_swap(first, pos)?)),
            Pick::Done(selection) => Ok(selection),
        }
    }

    /// Like [`SwapController::select`], but an accepted swap is only started.
    pub fn select_stepped<S: PieceSource>(
        &mut self,
        board: &mut Board<S>,
        pos: Position,
    ) -> Selection {
        match self.pick(board, pos) {
            Pick::Swap(first) => match board.begin_swap(first, pos) {
                Ok(()) => Selection::SwapStarted,
                Err(reason) => Selection::Swapped(SwapOutcome::Rejected(reason)),
            },
            Pick::Done(selection) => selection,
        }
    }

    fn pick<S: PieceSource>(&mut self, board: &Board<S>, pos: Position) -> Pick {
        if board.is_busy() || !matches!(board.grid().at(pos), CellView::Occupied(_)) {
            return Pick::Done(Selection::Ignored);
        }
        match self.selected.take() {
            None => {
                self.selected = Some(pos);
                Pick::Done(Selection::Selected(pos))
            }
            Some(first) if first == pos => Pick::Done(Selection::Deselected),
            Some(first) => Pick::Swap(first),
        }
    }
}

enum Pick {
    Swap(Position),
    Done(Selection),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;

    fn board(text: &str) -> Board<SequenceSource> {
        Board::from_ascii(text, SequenceSource::from_letters("GBPW")).unwrap()
    }

    #[test]
    fn test_select_then_deselect() {
        let mut b = board("RGB\nGBR");
        let mut ctl = SwapController::new();
        let p = Position::new(1, 1);
        assert_eq!(ctl.select(&mut b, p).unwrap(), Selection::Selected(p));
        assert_eq!(ctl.selected(), Some(p));
        assert_eq!(ctl.select(&mut b, p).unwrap(), Selection::Deselected);
        assert_eq!(ctl.selected(), None);
    }

    #[test]
    fn test_empty_and_blocked_cells_are_ignored() {
        let mut b = board("R.#\nGBR");
        let mut ctl = SwapController::new();
        assert_eq!(
            ctl.select(&mut b, Position::new(1, 1)).unwrap(),
            Selection::Ignored
        );
        assert_eq!(
            ctl.select(&mut b, Position::new(2, 1)).unwrap(),
            Selection::Ignored
        );
        assert_eq!(ctl.selected(), None);
    }

    #[test]
    fn test_second_piece_attempts_swap_and_clears() {
        let mut b = board("RGB\nGBR\nBRG");
        let before = b.snapshot();
        let mut ctl = SwapController::new();
        ctl.select(&mut b, Position::new(0, 0)).unwrap();

        let far = ctl.select(&mut b, Position::new(2, 2)).unwrap();
        assert_eq!(
            far,
            Selection::Swapped(SwapOutcome::Rejected(SwapRejection::NotAdjacent))
        );
        assert_eq!(ctl.selected(), None);
        assert_eq!(b.snapshot(), before);

        ctl.select(&mut b, Position::new(0, 0)).unwrap();
        let near = ctl.select(&mut b, Position::new(1, 0)).unwrap();
        assert_eq!(near, Selection::Swapped(SwapOutcome::Reverted));
        assert_eq!(ctl.selected(), None);
    }

    #[test]
    fn test_stepped_selection_leaves_board_busy() {
        let mut b = board("GBGB\nRRBR\nBGPG");
        let mut ctl = SwapController::new();
        ctl.select_stepped(&mut b, Position::new(2, 1));
        assert_eq!(
            ctl.select_stepped(&mut b, Position::new(3, 1)),
            Selection::SwapStarted
        );
        assert!(b.is_busy());
        assert_eq!(
            ctl.select_stepped(&mut b, Position::new(0, 0)),
            Selection::Ignored
        );
        let report = b.resolve_cascade().unwrap();
        assert!(report.removed >= 3);
    }
}
