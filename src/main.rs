//! Terminal match-3 runner (default binary).
//!
//! `play` (the default) runs the interactive game: crossterm input, the
//! framebuffer renderer, and one cascade phase per `--step-ms` tick so moves
//! can be followed on screen. `simulate` plays the best hint every turn and
//! prints the event stream as JSON lines.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event};
use env_logger::{Builder, Target};
use log::LevelFilter;

use tui_match3::core::{
    Board, GameSession, Selection, StepOutcome, SwapController, SwapOutcome, TurnStatus,
};
use tui_match3::engine::{best_swap, has_moves, SwapHint};
use tui_match3::input::{handle_key_event, should_quit, Cursor, InputAction};
use tui_match3::term::{BoardMarks, GameView, HudView, TerminalRenderer, Viewport};
use tui_match3::types::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use tui_match3::{parse_kinds, run_simulation, GameConfig};

#[derive(Debug, Parser)]
#[command(name = "tui-match3", version, about = "Match-3 puzzle in the terminal")]
struct Args {
    /// Board width in cells.
    #[arg(long, default_value_t = DEFAULT_WIDTH, value_name = "COLS")]
    width: u8,

    /// Board height in cells.
    #[arg(long, default_value_t = DEFAULT_HEIGHT, value_name = "ROWS")]
    height: u8,

    /// Enabled piece kinds: letters (RBPGW) or comma-separated names.
    #[arg(long, default_value = "RBPGW")]
    kinds: String,

    /// RNG seed; defaults to the current time.
    #[arg(long)]
    seed: Option<u32>,

    /// Layout mask file (top row first, `#` blocked, `.` usable).
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Moves available for the level.
    #[arg(long, default_value_t = 20)]
    moves: u32,

    /// Points needed to clear the level.
    #[arg(long, default_value_t = 1000)]
    goal: u32,

    /// Delay between cascade phases while playing.
    #[arg(long, default_value_t = 120, value_name = "MS")]
    step_ms: u64,

    /// Log filter, e.g. `debug` or `tui_match3_core=trace` (overrides RUST_LOG).
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Write logs to this file. Without it `play` discards logs.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play interactively (default).
    Play,
    /// Play the best hint each turn and print JSON lines to stdout.
    Simulate {
        /// Maximum number of swaps.
        #[arg(long, default_value_t = 50)]
        turns: u32,
    },
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let seed = self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as u32)
                .unwrap_or(1)
        });
        Ok(GameConfig {
            width: self.width,
            height: self.height,
            kinds: parse_kinds(&self.kinds).context("invalid --kinds")?,
            seed,
            layout: self.layout.clone(),
            moves: self.moves,
            goal: self.goal,
            step_ms: self.step_ms,
        })
    }
}

fn init_logging(filter: Option<&str>, file: Option<&Path>, interactive: bool) -> Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Warn);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    if let Some(spec) = filter {
        builder.parse_filters(spec);
    }

    match file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        // Anything written to stderr would corrupt the alternate screen.
        None if interactive => {
            builder.target(Target::Pipe(Box::new(io::sink())));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder.try_init().context("failed to initialise logging")
}

fn main() -> Result<()> {
    let args = Args::parse();
    let interactive = !matches!(args.command, Some(Command::Simulate { .. }));
    init_logging(args.log_level.as_deref(), args.log_file.as_deref(), interactive)?;

    let cfg = args.game_config()?;
    match args.command {
        Some(Command::Simulate { turns }) => {
            let stdout = io::stdout();
            let summary = run_simulation(&cfg, turns, &mut stdout.lock())?;
            log::info!("simulation finished: {:?}", summary);
            Ok(())
        }
        Some(Command::Play) | None => play(&cfg),
    }
}

fn play(cfg: &GameConfig) -> Result<()> {
    let board = cfg.build_board()?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, board, cfg);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

struct PlayState {
    board: Board,
    session: GameSession,
    controller: SwapController,
    cursor: Cursor,
    hint: Option<SwapHint>,
    message: Option<String>,
}

impl PlayState {
    fn new(board: Board, cfg: &GameConfig) -> Self {
        let cursor = Cursor::new(board.width(), board.height());
        Self {
            board,
            session: cfg.session(),
            controller: SwapController::new(),
            cursor,
            hint: None,
            message: None,
        }
    }

    fn hud(&self) -> HudView {
        HudView {
            points: self.session.points(),
            goal: self.session.goal(),
            moves_left: self.session.moves_left(),
            status: self.session.status(),
            message: self.message.clone(),
        }
    }

    fn marks(&self) -> BoardMarks {
        BoardMarks {
            cursor: Some(self.cursor.position()),
            selected: self.controller.selected(),
            hint: self.hint.map(|h| (h.a, h.b)),
        }
    }

    fn apply(&mut self, action: InputAction, cfg: &GameConfig) {
        match action {
            InputAction::Move(dir) => {
                self.cursor.step(dir);
            }
            InputAction::Select => {
                if self.session.is_over() {
                    return;
                }
                match self
                    .controller
                    .select_stepped(&mut self.board, self.cursor.position())
                {
                    Selection::SwapStarted => {
                        self.hint = None;
                        self.message = None;
                    }
                    Selection::Swapped(SwapOutcome::Rejected(reason)) => {
                        self.message = Some(reason.as_str().to_string());
                    }
                    _ => {}
                }
            }
            InputAction::Hint => match best_swap(&self.board) {
                Ok(hint) => self.hint = Some(hint),
                Err(e) => self.message = Some(e.message().to_string()),
            },
            InputAction::Restart => match self.board.reset() {
                Ok(()) => {
                    self.session = cfg.session();
                    self.controller.clear();
                    self.hint = None;
                    self.message = Some("new board".to_string());
                }
                Err(e) => {
                    log::warn!("restart failed: {}", e);
                    self.message = Some(format!("restart failed: {e}"));
                }
            },
        }
    }

    /// Advance the cascade in flight by one phase
    fn advance(&mut self) -> Result<()> {
        match self.board.step().context("cascade failed")? {
            StepOutcome::Settled(report) => {
                let status = self.session.record_swap(&SwapOutcome::Committed(report));
                if status == TurnStatus::InProgress && !has_moves(&self.board).unwrap_or(true) {
                    self.board.reset().context("regenerate dead board")?;
                    self.message = Some("no moves left, new board".to_string());
                }
            }
            StepOutcome::Reverted => {
                self.message = Some("no match".to_string());
            }
            _ => {}
        }
        for event in self.board.drain_events() {
            log::trace!("{:?}", event);
        }
        Ok(())
    }
}

fn run(term: &mut TerminalRenderer, board: Board, cfg: &GameConfig) -> Result<()> {
    let view = GameView::default();
    let mut state = PlayState::new(board, cfg);

    let step = Duration::from_millis(cfg.step_ms);
    let idle = Duration::from_millis(250);
    let mut last_step = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let fb = view.render(
            &state.board.snapshot(),
            &state.marks(),
            &state.hud(),
            Viewport::new(w, h),
        );
        term.draw(&fb)?;

        // Input with timeout until the next cascade phase.
        let timeout = if state.board.is_busy() {
            step.saturating_sub(last_step.elapsed())
        } else {
            idle
        };

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        state.apply(action, cfg);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if state.board.is_busy() && last_step.elapsed() >= step {
            last_step = Instant::now();
            state.advance()?;
        }
    }
}
