//! Headless simulation: plays the best hint every turn and writes JSON lines.
//!
//! Output records, one per line:
//!
//! - `start`: seed and the starting snapshot
//! - every [`BoardEvent`] the board emitted, in order
//! - `turn`: the swap played and the session status after it
//! - `reshuffle`: the board had no moves and was regenerated
//! - `summary`: final totals

use std::io::Write;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::config::GameConfig;
use crate::core::{BoardSnapshot, SwapOutcome, TurnStatus};
use crate::engine::{best_swap, HintError};
use crate::types::{BoardEvent, Position};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Start {
        seed: u32,
        board: &'a BoardSnapshot,
    },
    Reshuffle {
        turn: u32,
    },
    Turn {
        turn: u32,
        a: Position,
        b: Position,
        outcome: &'static str,
        points: u32,
        moves_left: u32,
        status: TurnStatus,
    },
    Summary(&'a SimSummary),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimSummary {
    pub turns: u32,
    pub reshuffles: u32,
    pub points: u32,
    pub moves_left: u32,
    pub status: TurnStatus,
    pub board_hash: u64,
}

fn emit<W: Write, T: Serialize>(out: &mut W, record: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, record).context("serialize record")?;
    out.write_all(b"\n").context("write record")?;
    Ok(())
}

/// Play up to `max_turns` swaps (or until the session ends) and stream the log to `out`
pub fn run_simulation<W: Write>(cfg: &GameConfig, max_turns: u32, out: &mut W) -> Result<SimSummary> {
    let mut board = cfg.build_board()?;
    let mut session = cfg.session();
    let mut reshuffles = 0;
    let mut turns = 0;

    emit(
        out,
        &Record::Start {
            seed: cfg.seed,
            board: &board.snapshot(),
        },
    )?;

    for turn in 1..=max_turns {
        if session.is_over() {
            break;
        }

        let hint = match best_swap(&board) {
            Ok(hint) => hint,
            Err(HintError::NoMoves) => {
                log::info!("turn {}: no moves left, regenerating", turn);
                board.reset().context("regenerate dead board")?;
                reshuffles += 1;
                emit(out, &Record::Reshuffle { turn })?;
                continue;
            }
            Err(e) => bail!("{}: {}", e.code(), e.message()),
        };

        let outcome = board
            .try_swap(hint.a, hint.b)
            .with_context(|| format!("turn {turn}: swap {} <-> {}", hint.a, hint.b))?;
        for event in board.drain_events() {
            emit::<W, BoardEvent>(out, &event)?;
        }

        let status = session.record_swap(&outcome);
        turns += 1;
        emit(
            out,
            &Record::Turn {
                turn,
                a: hint.a,
                b: hint.b,
                outcome: match outcome {
                    SwapOutcome::Committed(_) => "committed",
                    SwapOutcome::Reverted => "reverted",
                    SwapOutcome::Rejected(_) => "rejected",
                },
                points: session.points(),
                moves_left: session.moves_left(),
                status,
            },
        )?;
    }

    let summary = SimSummary {
        turns,
        reshuffles,
        points: session.points(),
        moves_left: session.moves_left(),
        status: session.status(),
        board_hash: board.snapshot().board_hash(),
    };
    emit(out, &Record::Summary(&summary))?;
    Ok(summary)
}
