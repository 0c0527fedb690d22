//! Core rule engine - pure, deterministic, and testable
//!
//! This crate holds every match-3 rule: the grid, piece generation, match
//! detection, the cascade and the swap controller. It has **no dependencies**
//! on UI or I/O, so it is:
//!
//! - **Deterministic**: the same seed (or scripted source) gives the same boards
//! - **Testable**: every phase can be driven and inspected on its own
//! - **Portable**: runs in a terminal, a GUI or headless
//!
//! # Module Structure
//!
//! - [`grid`]: cell storage, bounds-checked queries, piece placement
//! - [`layout`]: blocked-cell masks supplied at construction
//! - [`rng`]: [`PieceSource`] trait, seeded catalog, scripted sequences
//! - [`matcher`]: straight runs and super-match merging
//! - [`resolver`]: scan / remove / collapse / refill phases
//! - [`board`]: the board itself, generation, the step driver, swaps
//! - [`swap`]: two-click selection and swap outcomes
//! - [`scoring`]: points per match
//! - [`session`]: move budget and goal
//! - [`snapshot`]: immutable copies for rendering and export
//!
//! # Rules
//!
//! - **Coordinates**: `(col, row)`, row 0 at the bottom; gravity pulls toward row 0
//! - **Runs**: three or more same-kind pieces in a line; horizontal checked first
//! - **Super match**: a run plus a perpendicular run of two or more off any member
//! - **Swaps**: adjacent pieces only; a swap that matches nothing is undone
//! - **Cascade**: remove, collapse, refill, rescan until nothing matches
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{Board, BoardConfig, PieceCatalog, SwapOutcome};
//! use tui_match3_core::types::Position;
//!
//! let mut board = Board::new(BoardConfig::new(6, 8), PieceCatalog::standard(12345)).unwrap();
//!
//! match board.try_swap(Position::new(2, 3), Position::new(3, 3)).unwrap() {
//!     SwapOutcome::Committed(report) => assert!(report.removed >= 3),
//!     SwapOutcome::Reverted | SwapOutcome::Rejected(_) => {}
//! }
//!
//! // Whatever happened, the board is stable again.
//! assert!(!board.scan_board());
//! ```

pub mod board;
pub mod error;
pub mod grid;
pub mod layout;
pub mod matcher;
pub mod resolver;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod swap;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardConfig};
pub use error::BoardError;
pub use grid::{CellView, Grid, Piece};
pub use layout::LayoutMask;
pub use matcher::{scan_run, super_match, MatchResult, ScanMarks};
pub use resolver::{CascadeReport, MatchSummary, Phase, StepOutcome};
pub use rng::{PieceCatalog, PieceSource, SequenceSource, SimpleRng};
pub use scoring::{score_in_round, score_match};
pub use session::{GameSession, TurnStatus};
pub use snapshot::{BoardSnapshot, SnapshotCell};
pub use swap::{Selection, SwapController, SwapOutcome, SwapRejection};
