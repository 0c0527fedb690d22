//! Swap tests - validation, revert and the busy guard

use tui_match3::core::{
    Board, BoardConfig, BoardError, PieceCatalog, Selection, SequenceSource, SwapController,
    SwapOutcome, SwapRejection,
};
use tui_match3::engine::find_swaps;
use tui_match3::types::{Direction, Position};

fn generated(seed: u32) -> Board {
    Board::new(BoardConfig::default(), PieceCatalog::standard(seed)).unwrap()
}

#[test]
fn test_non_adjacent_swap_is_rejected() {
    let mut board = generated(8);
    let a = Position::new(2, 3);
    let b = Position::new(4, 5);
    let before = board.snapshot();
    let id_a = board.grid().piece(a).unwrap().id;
    let id_b = board.grid().piece(b).unwrap().id;

    let outcome = board.try_swap(a, b).unwrap();
    assert_eq!(outcome, SwapOutcome::Rejected(SwapRejection::NotAdjacent));

    assert_eq!(board.snapshot(), before);
    assert_eq!(board.grid().piece(a).unwrap().id, id_a);
    assert_eq!(board.grid().piece(a).unwrap().position(), a);
    assert_eq!(board.grid().piece(b).unwrap().id, id_b);
    assert_eq!(board.grid().piece(b).unwrap().position(), b);
    assert!(board.events().is_empty());
}

#[test]
fn test_diagonal_and_self_swaps_are_rejected() {
    let mut board = generated(9);
    let a = Position::new(1, 1);
    assert_eq!(
        board.try_swap(a, Position::new(2, 2)).unwrap(),
        SwapOutcome::Rejected(SwapRejection::NotAdjacent)
    );
    assert_eq!(
        board.try_swap(a, a).unwrap(),
        SwapOutcome::Rejected(SwapRejection::NotAdjacent)
    );
}

#[test]
fn test_swap_off_the_board_is_rejected() {
    let mut board = generated(10);
    assert_eq!(
        board
            .try_swap(Position::new(0, 0), Position::new(-1, 0))
            .unwrap(),
        SwapOutcome::Rejected(SwapRejection::Unusable)
    );
}

#[test]
fn test_swap_at_extreme_coordinates_is_rejected() {
    let mut board = generated(11);
    let before = board.snapshot();
    for (a, b) in [
        (Position::new(i16::MIN, 0), Position::new(1, 0)),
        (Position::new(0, i16::MAX), Position::new(0, i16::MIN)),
        (Position::new(i16::MAX, 0), Position::new(i16::MAX - 1, 0)),
    ] {
        let outcome = board.try_swap(a, b).unwrap();
        assert!(
            matches!(outcome, SwapOutcome::Rejected(_)),
            "{a} <-> {b}: {outcome:?}"
        );
    }
    assert_eq!(
        board
            .try_swap(Position::new(i16::MAX, 0), Position::new(i16::MAX - 1, 0))
            .unwrap(),
        SwapOutcome::Rejected(SwapRejection::Unusable)
    );
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_swap_with_empty_cell_is_rejected() {
    let mut board = Board::from_ascii("RG.\nGRB", SequenceSource::from_letters("W")).unwrap();
    assert_eq!(
        board
            .try_swap(Position::new(1, 1), Position::new(2, 1))
            .unwrap(),
        SwapOutcome::Rejected(SwapRejection::Empty)
    );
}

#[test]
fn test_no_match_swap_leaves_board_identical() {
    let mut board = generated(12);
    let hints = find_swaps(&board).unwrap();

    // First adjacent pair that is not a hint.
    let (a, b) = board
        .grid()
        .positions()
        .flat_map(|a| [(a, a.step(Direction::Right)), (a, a.step(Direction::Up))])
        .filter(|(_, b)| board.grid().contains(*b))
        .find(|(a, b)| !hints.iter().any(|h| h.a == *a && h.b == *b))
        .expect("some swap does not match");

    let before = board.snapshot();
    let outcome = board.try_swap(a, b).unwrap();
    assert_eq!(outcome, SwapOutcome::Reverted);
    assert_eq!(board.snapshot(), before);
    assert_eq!(board.snapshot().board_hash(), before.board_hash());
    assert!(!board.is_busy());
}

#[test]
fn test_every_hint_is_committed() {
    let board = generated(13);
    for hint in find_swaps(&board).unwrap() {
        let mut trial = board.clone();
        let outcome = trial.try_swap(hint.a, hint.b).unwrap();
        assert!(outcome.is_committed(), "{hint:?}");
    }
}

#[test]
fn test_busy_board_rejects_without_side_effects() {
    let mut board = generated(14);
    let hint = find_swaps(&board)
        .unwrap()
        .into_iter()
        .next()
        .expect("generated board has a move");
    board.begin_swap(hint.a, hint.b).unwrap();
    assert!(board.is_busy());

    let during = board.snapshot();
    let events = board.events().len();
    assert_eq!(
        board
            .try_swap(Position::new(0, 0), Position::new(0, 1))
            .unwrap(),
        SwapOutcome::Rejected(SwapRejection::Busy)
    );
    assert_eq!(board.reset(), Err(BoardError::Busy));
    assert_eq!(board.snapshot(), during);
    assert_eq!(board.events().len(), events);

    board.resolve_cascade().unwrap();
    assert!(!board.is_busy());
    assert!(!board.scan_board());
}

#[test]
fn test_controller_two_clicks() {
    let mut board = generated(15);
    let hint = find_swaps(&board).unwrap().into_iter().next().unwrap();
    let mut ctl = SwapController::new();

    assert_eq!(
        ctl.select(&mut board, hint.a).unwrap(),
        Selection::Selected(hint.a)
    );
    match ctl.select(&mut board, hint.b).unwrap() {
        Selection::Swapped(SwapOutcome::Committed(report)) => assert!(report.removed >= 3),
        other => panic!("expected a committed swap, got {other:?}"),
    }
    assert_eq!(ctl.selected(), None);
}
