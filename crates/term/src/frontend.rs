//! TermFrontend: terminal implementation of every engine collaborator.
//!
//! The frontend draws into its own [`FrameBuffer`]. It never touches the
//! terminal itself; the binary flushes the finished frame with
//! [`TerminalRenderer`](crate::renderer::TerminalRenderer). Audio cues have no
//! sound in a terminal, so they are shown as a short-lived banner in the side
//! panel instead.

use crate::core::{ActivePiece, Board, Shape};
use crate::engine::{AudioCues, Renderer, StatsSink};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Color, MusicTrack, Phase};

/// Frames a cue banner stays visible
pub const CUE_FRAMES: u16 = 45;

/// Narrowest side panel worth drawing
const MIN_PANEL_WIDTH: u16 = 12;

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

const BORDER: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
const EMPTY: CellStyle = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
const GHOST: CellStyle = CellStyle::new(Rgb::new(140, 140, 140), PLAY_BG).dim();
const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG).bold();
const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
const OVERLAY: CellStyle = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();

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

/// Sound cue, displayed as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    LineClear(u32),
    LevelUp(u32),
    Pause,
    Resume,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Layout {
    frame_x: u16,
    frame_y: u16,
    frame_w: u16,
    frame_h: u16,
    board_w: u16,
    board_h: u16,
    /// Left column of the side panel, if it fits
    panel_x: Option<u16>,
}

/// Side panel rows, relative to the top of the board frame
mod rows {
    pub const SCORE: u16 = 0;
    pub const LINES: u16 = 3;
    pub const LEVEL: u16 = 6;
    pub const NEXT: u16 = 9;
    pub const MUSIC: u16 = 15;
    pub const CUE: u16 = 18;
}

pub struct TermFrontend {
    fb: FrameBuffer,
    viewport: Viewport,
    /// Board cell width in terminal columns.
    cell_w: u16,
    layout: Layout,
    stats: (u32, u32, u32),
    track: MusicTrack,
    cue: Option<(Cue, u16)>,
}

impl TermFrontend {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            fb: FrameBuffer::new(viewport.width, viewport.height),
            viewport,
            // 2x1 helps compensate for typical terminal glyph aspect ratio.
            cell_w: 2,
            layout: Layout::default(),
            stats: (0, 0, 1),
            track: MusicTrack::Normal,
            cue: None,
        }
    }

    /// Takes effect on the next frame.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    /// Last stats received: (score, lines, level)
    pub fn stats(&self) -> (u32, u32, u32) {
        self.stats
    }

    pub fn track(&self) -> MusicTrack {
        self.track
    }

    /// Cue banner currently shown
    pub fn cue(&self) -> Option<Cue> {
        self.cue.map(|(cue, _)| cue)
    }

    /// Terminal position of the top-left board cell
    pub fn board_origin(&self) -> (u16, u16) {
        (self.layout.frame_x + 1, self.layout.frame_y + 1)
    }

    fn show_cue(&mut self, cue: Cue) {
        self.cue = Some((cue, CUE_FRAMES));
    }

    fn fill_board_cell(&mut self, x: i16, y: i16, ch: char, style: CellStyle) {
        let layout = self.layout;
        if x < 0 || y < 0 || x >= layout.board_w as i16 || y >= layout.board_h as i16 {
            return;
        }
        let px = layout.frame_x + 1 + x as u16 * self.cell_w;
        let py = layout.frame_y + 1 + y as u16;
        self.fb.fill_rect(px, py, self.cell_w, 1, ch, style);
    }

    fn draw_shape(&mut self, shape: &Shape, position: (i16, i16), ch: char, style: CellStyle) {
        for (dx, dy) in shape.offsets() {
            self.fill_board_cell(position.0 + dx, position.1 + dy, ch, style);
        }
    }

    fn draw_border(&mut self) {
        let Layout {
            frame_x: x,
            frame_y: y,
            frame_w: w,
            frame_h: h,
            ..
        } = self.layout;

        self.fb.put_char(x, y, '┌', BORDER);
        self.fb.put_char(x + w - 1, y, '┐', BORDER);
        self.fb.put_char(x, y + h - 1, '└', BORDER);
        self.fb.put_char(x + w - 1, y + h - 1, '┘', BORDER);

        for dx in 1..w - 1 {
            self.fb.put_char(x + dx, y, '─', BORDER);
            self.fb.put_char(x + dx, y + h - 1, '─', BORDER);
        }
        for dy in 1..h - 1 {
            self.fb.put_char(x, y + dy, '│', BORDER);
            self.fb.put_char(x + w - 1, y + dy, '│', BORDER);
        }
    }

    fn draw_stats(&mut self, panel_x: u16) {
        let top = self.layout.frame_y;
        let (score, lines, level) = self.stats;
        for (row, label, value) in [
            (rows::SCORE, "SCORE", score),
            (rows::LINES, "LINES", lines),
            (rows::LEVEL, "LEVEL", level),
        ] {
            self.fb.put_str(panel_x, top + row, label, LABEL);
            self.fb.put_u32(panel_x, top + row + 1, value, VALUE);
        }

        self.fb.put_str(panel_x, top + rows::MUSIC, "MUSIC", LABEL);
        let track = match self.track {
            MusicTrack::Normal => "NORMAL",
            MusicTrack::Fast => "FAST",
        };
        self.fb.put_str(panel_x, top + rows::MUSIC + 1, track, VALUE);
    }

    fn draw_cue(&mut self, panel_x: u16) {
        let y = self.layout.frame_y + rows::CUE;
        match self.cue() {
            Some(Cue::LineClear(n)) => {
                let x = self.fb.put_str(panel_x, y, "CLEAR x", OVERLAY);
                self.fb.put_u32(x, y, n, OVERLAY);
            }
            Some(Cue::LevelUp(level)) => {
                let x = self.fb.put_str(panel_x, y, "LEVEL UP ", OVERLAY);
                self.fb.put_u32(x, y, level, OVERLAY);
            }
            Some(Cue::Resume) => {
                self.fb.put_str(panel_x, y, "GO", OVERLAY);
            }
            // The overlays already say it.
            Some(Cue::Pause) | Some(Cue::GameOver) | None => {}
        }
    }

    fn draw_overlay_lines(&mut self, lines: &[String]) {
        let Layout {
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            ..
        } = self.layout;
        let first = (frame_y + frame_h / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, text) in lines.iter().enumerate() {
            let text_w = text.chars().count() as u16;
            let x = frame_x + frame_w.saturating_sub(text_w) / 2;
            self.fb.put_str(x, first + i as u16, text, OVERLAY);
        }
    }
}

impl Renderer for TermFrontend {
    /// Starts a new frame: clears the buffer, lays out the board and draws it.
    fn draw_board(&mut self, board: &Board) {
        let vp = self.viewport;
        self.fb.resize(vp.width, vp.height);
        self.fb.clear(Cell::default());

        let frame_w = board.width() * self.cell_w + 2;
        let frame_h = board.height() + 2;
        let frame_x = vp.width.saturating_sub(frame_w) / 2;
        let frame_y = vp.height.saturating_sub(frame_h) / 2;
        let panel_x = frame_x + frame_w + 2;
        self.layout = Layout {
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            board_w: board.width(),
            board_h: board.height(),
            panel_x: (panel_x < vp.width && vp.width - panel_x >= MIN_PANEL_WIDTH)
                .then_some(panel_x),
        };

        self.draw_border();
        for (y, row) in board.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Some(color) => {
                        let style = CellStyle::new(Rgb::from(*color), PLAY_BG);
                        self.fill_board_cell(x as i16, y as i16, '█', style);
                    }
                    None => self.fill_board_cell(x as i16, y as i16, '·', EMPTY),
                }
            }
        }
    }

    fn draw_ghost(&mut self, shape: &Shape, position: (i16, i16)) {
        self.draw_shape(shape, position, '░', GHOST);
    }

    fn draw_active_piece(&mut self, shape: &Shape, color: Color, position: (i16, i16)) {
        let style = CellStyle::new(Rgb::from(color), PLAY_BG).bold();
        self.draw_shape(shape, position, '█', style);
    }

    fn draw_preview(&mut self, next: Option<&ActivePiece>) {
        let Some(panel_x) = self.layout.panel_x else {
            return;
        };
        let top = self.layout.frame_y + rows::NEXT;
        self.fb.put_str(panel_x, top, "NEXT", LABEL);

        let Some(piece) = next else {
            self.fb.put_str(panel_x, top + 1, "-", VALUE);
            return;
        };
        let style = CellStyle::new(Rgb::from(piece.color), PANEL_BG);
        for (dx, dy) in piece.shape.offsets() {
            let x = panel_x + dx as u16 * self.cell_w;
            let y = top + 1 + dy as u16;
            self.fb.fill_rect(x, y, self.cell_w, 1, '█', style);
        }
    }

    fn finish_frame(&mut self, phase: Phase) {
        if let Some(panel_x) = self.layout.panel_x {
            self.draw_stats(panel_x);
            self.draw_cue(panel_x);
        }

        match phase {
            Phase::Paused => self.draw_overlay_lines(&["PAUSED".to_string()]),
            Phase::GameOver => {
                let (score, lines, level) = self.stats;
                self.draw_overlay_lines(&[
                    "GAME OVER".to_string(),
                    format!("SCORE {score}"),
                    format!("LINES {lines}"),
                    format!("LEVEL {level}"),
                    "R TO RESTART".to_string(),
                ]);
            }
            Phase::Falling | Phase::LockPending => {}
        }

        self.cue = self
            .cue
            .and_then(|(cue, frames)| (frames > 1).then_some((cue, frames - 1)));
    }
}

impl AudioCues for TermFrontend {
    fn line_clear(&mut self, lines: u32) {
        self.show_cue(Cue::LineClear(lines));
    }

    fn level_up(&mut self, level: u32) {
        self.show_cue(Cue::LevelUp(level));
    }

    fn pause(&mut self) {
        self.show_cue(Cue::Pause);
    }

    fn resume(&mut self) {
        self.show_cue(Cue::Resume);
    }

    fn game_over(&mut self) {
        self.show_cue(Cue::GameOver);
    }

    fn switch_track(&mut self, track: MusicTrack) {
        self.track = track;
    }
}

impl StatsSink for TermFrontend {
    fn update_stats(&mut self, score: u32, lines: u32, level: u32) {
        self.stats = (score, lines, level);
    }
}
