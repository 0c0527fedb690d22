//! GameView: maps a [`BoardSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{BoardSnapshot, Phase, SnapshotCell, TurnStatus};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, Position};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Cells to highlight on top of the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardMarks {
    pub cursor: Option<Position>,
    pub selected: Option<Position>,
    pub hint: Option<(Position, Position)>,
}

/// Side panel contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub points: u32,
    pub goal: u32,
    pub moves_left: u32,
    pub status: TurnStatus,
    pub message: Option<String>,
}

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const BLACK: Rgb = Rgb::new(0, 0, 0);

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Top-left corner of the board frame within `viewport`
    pub fn frame_origin(&self, snap: &BoardSnapshot, viewport: Viewport) -> (u16, u16) {
        let (frame_w, frame_h) = self.frame_size(snap);
        (
            viewport.width.saturating_sub(frame_w) / 2,
            viewport.height.saturating_sub(frame_h) / 2,
        )
    }

    fn frame_size(&self, snap: &BoardSnapshot) -> (u16, u16) {
        (
            snap.width as u16 * self.cell_w + 2,
            snap.height as u16 + 2,
        )
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        marks: &BoardMarks,
        hud: &HudView,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.reset(viewport.width, viewport.height);

        let (frame_w, frame_h) = self.frame_size(snap);
        let (start_x, start_y) = self.frame_origin(snap, viewport);

        draw_border(
            fb,
            start_x,
            start_y,
            frame_w,
            frame_h,
            CellStyle::new(Rgb::new(200, 200, 200), BLACK),
        );

        for (i, row) in snap.rows().enumerate() {
            let board_row = snap.height as i16 - 1 - i as i16;
            for (col, cell) in row.iter().enumerate() {
                let pos = Position::new(col as i16, board_row);
                let (text, mut style) = cell_look(*cell);
                if marks.hint.is_some_and(|(a, b)| a == pos || b == pos) {
                    style.bg = Rgb::new(70, 70, 20);
                }
                if marks.selected == Some(pos) {
                    style.bg = Rgb::new(90, 90, 110);
                    style = style.bold();
                }
                if marks.cursor == Some(pos) {
                    style = style.reversed();
                }

                let x = start_x + 1 + col as u16 * self.cell_w;
                let y = start_y + 1 + i as u16;
                fb.fill_rect(x, y, self.cell_w, 1, ' ', style);
                for (dx, ch) in text.chars().take(self.cell_w as usize).enumerate() {
                    fb.put_char(x + dx as u16, y, ch, style);
                }
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x + frame_w + 2, start_y);

        let banner = match hud.status {
            TurnStatus::Won => Some("LEVEL CLEAR"),
            TurnStatus::Lost => Some("OUT OF MOVES"),
            TurnStatus::InProgress => None,
        };
        if let Some(text) = banner {
            let text_w = text.chars().count() as u16;
            let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
            let y = start_y.saturating_add(frame_h / 2);
            fb.put_str(x, y, text, CellStyle::new(Rgb::new(255, 255, 255), BLACK).bold());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &BoardSnapshot,
        marks: &BoardMarks,
        hud: &HudView,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, marks, hud, viewport, &mut fb);
        fb
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &BoardSnapshot,
        hud: &HudView,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x.saturating_add(10) > viewport.width {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), BLACK);

        let rows: [(&str, String); 4] = [
            ("POINTS", hud.points.to_string()),
            ("GOAL", hud.goal.to_string()),
            ("MOVES", hud.moves_left.to_string()),
            ("PHASE", phase_label(snap.phase).to_string()),
        ];
        let mut y = start_y;
        for (name, text) in rows {
            fb.put_str(panel_x, y, name, label);
            fb.put_str(panel_x, y + 1, &text, value);
            y = y.saturating_add(3);
        }
        if let Some(msg) = &hud.message {
            fb.put_str(panel_x, y, msg, value);
        }
    }
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn cell_look(cell: SnapshotCell) -> (String, CellStyle) {
    match cell {
        SnapshotCell::Blocked => ("░░".into(), CellStyle::new(Rgb::new(60, 60, 60), BLACK)),
        SnapshotCell::Empty => ("· ".into(), CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG)),
        SnapshotCell::Piece { kind, .. } => (
            format!("{} ", kind.as_char()),
            CellStyle::new(piece_color(kind), PLAY_BG).bold(),
        ),
    }
}

pub fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::Red => Rgb::new(230, 70, 70),
        PieceKind::Blue => Rgb::new(80, 130, 230),
        PieceKind::Purple => Rgb::new(190, 110, 220),
        PieceKind::Green => Rgb::new(100, 210, 110),
        PieceKind::White => Rgb::new(240, 240, 240),
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "ready",
        Phase::Scanning => "scan",
        Phase::Removing => "match",
        Phase::Collapsing => "fall",
        Phase::Refilling => "refill",
    }
}
