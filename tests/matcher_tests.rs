//! Match detection through the board scan

use tui_match3::core::{Board, SequenceSource};
use tui_match3::types::{MatchShape, Position};

fn board(text: &str) -> Board<SequenceSource> {
    Board::from_ascii(text, SequenceSource::from_letters("GBPW")).unwrap()
}

fn marked(board: &Board<SequenceSource>) -> Vec<Position> {
    board
        .grid()
        .positions()
        .filter(|p| board.is_marked(*p))
        .collect()
}

#[test]
fn test_bottom_row_red_run() {
    let mut b = board("GBG\nBGB\nRRR");
    assert!(b.scan_board());
    assert_eq!(b.matches().len(), 1);
    assert_eq!(b.matches()[0].shape, MatchShape::Horizontal);
    assert_eq!(
        marked(&b),
        vec![Position::new(0, 0), Position::new(1, 0), Position::new(2, 0)]
    );
}

#[test]
fn test_vertical_four_is_long() {
    let mut b = board("RG\nRB\nRG\nRB");
    assert!(b.scan_board());
    let m = &b.matches()[0];
    assert_eq!(m.shape, MatchShape::LongVertical);
    assert_eq!(m.len(), 4);
    assert_eq!(marked(&b).len(), 4);
}

#[test]
fn test_t_shape_is_one_super_match() {
    let mut b = board("BRB\nGRG\nRRR");
    assert!(b.scan_board());
    assert_eq!(b.matches().len(), 1);

    let m = &b.matches()[0];
    assert_eq!(m.shape, MatchShape::Super);
    assert_eq!(m.len(), 5);
    let mut ids: Vec<_> = m.pieces.iter().map(|p| p.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5, "each piece listed once");
    assert_eq!(marked(&b).len(), 5);
}

#[test]
fn test_l_shape_is_one_super_match() {
    let mut b = board("RBG\nRGB\nRRR");
    assert!(b.scan_board());
    assert_eq!(b.matches().len(), 1);
    assert_eq!(b.matches()[0].shape, MatchShape::Super);
    assert_eq!(b.matches()[0].len(), 5);
}

#[test]
fn test_two_separate_runs() {
    let mut b = board("WWW\nBGB\nRRR");
    assert!(b.scan_board());
    assert_eq!(b.matches().len(), 2);
    assert_eq!(marked(&b).len(), 6);
}

#[test]
fn test_runs_stop_at_blocked_and_empty_cells() {
    let mut b = board("RR#R\nGB.B\nBGBG");
    assert!(!b.scan_board());
    assert!(b.matches().is_empty());
}

#[test]
fn test_scan_is_idempotent() {
    let mut b = board("GGGB\nRBPR\nRBWP\nRPBW");
    assert!(b.scan_board());
    let first = b.matches().to_vec();
    assert!(b.scan_board());
    assert_eq!(b.matches(), &first[..]);
}

#[test]
fn test_no_match_on_short_runs() {
    let mut b = board("RRG\nGGR\nRRG");
    assert!(!b.scan_board());
}
