//! Turn accounting for a level: a move budget and a goal score.
//!
//! The session only counts; it never touches the board. Feed it the outcome of
//! every swap and it reports whether the level is still running, won or lost.

use serde::Serialize;

use crate::swap::SwapOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStatus {
    InProgress,
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSession {
    moves_left: u32,
    goal: u32,
    points: u32,
    status: TurnStatus,
}

impl GameSession {
    pub fn new(moves: u32, goal: u32) -> Self {
        Self {
            moves_left: moves,
            goal,
            points: 0,
            status: TurnStatus::InProgress,
        }
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn status(&self) -> TurnStatus {
        self.status
    }

    pub fn is_over(&self) -> bool {
        self.status != TurnStatus::InProgress
    }

    /// Add `points`, optionally spend a move, and settle the status.
    ///
    /// Reaching the goal wins even on the last move. Turns after the level has
    /// ended are ignored.
    pub fn process_turn(&mut self, points: u32, spend_move: bool) -> TurnStatus {
        if self.is_over() {
            return self.status;
        }

        self.points = self.points.saturating_add(points);
        if spend_move {
            self.moves_left = self.moves_left.saturating_sub(1);
        }

        self.status = if self.points >= self.goal {
            TurnStatus::Won
        } else if self.moves_left == 0 {
            TurnStatus::Lost
        } else {
            TurnStatus::InProgress
        };
        if self.is_over() {
            log::info!(
                "session ended: {:?} with {} points, {} moves left",
                self.status,
                self.points,
                self.moves_left
            );
        }
        self.status
    }

    /// Account for a swap: committed swaps spend a move and score, everything else is free.
    pub fn record_swap(&mut self, outcome: &SwapOutcome) -> TurnStatus {
        match outcome {
            SwapOutcome::Committed(report) => self.process_turn(report.points, true),
            _ => self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_on_goal() {
        let mut s = GameSession::new(5, 100);
        assert_eq!(s.process_turn(60, true), TurnStatus::InProgress);
        assert_eq!(s.process_turn(40, true), TurnStatus::Won);
        assert_eq!(s.moves_left(), 3);
    }

    #[test]
    fn test_lose_when_moves_run_out() {
        let mut s = GameSession::new(2, 100);
        s.process_turn(10, true);
        assert_eq!(s.process_turn(10, true), TurnStatus::Lost);
        assert!(s.is_over());
    }

    #[test]
    fn test_goal_beats_last_move() {
        let mut s = GameSession::new(1, 30);
        assert_eq!(s.process_turn(30, true), TurnStatus::Won);
    }

    #[test]
    fn test_turns_after_end_are_ignored() {
        let mut s = GameSession::new(1, 1000);
        s.process_turn(0, true);
        assert_eq!(s.process_turn(5000, true), TurnStatus::Lost);
        assert_eq!(s.points(), 0);
    }

    #[test]
    fn test_free_turn_keeps_moves() {
        let mut s = GameSession::new(3, 100);
        s.process_turn(20, false);
        assert_eq!(s.moves_left(), 3);
        assert_eq!(s.points(), 20);
    }
}
