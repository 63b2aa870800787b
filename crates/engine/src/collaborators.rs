//! Collaborator interfaces the session reports to.
//!
//! Collaborators are read-only observers: they receive borrowed views of the
//! engine state after the frame's mutations are complete and cannot reach back
//! into the engine.

use crate::core::{ActivePiece, Board, Shape};
use crate::types::{Color, MusicTrack, Phase};

/// Draws one frame
pub trait Renderer {
    fn draw_board(&mut self, board: &Board);

    /// Landing preview for the active piece
    fn draw_ghost(&mut self, shape: &Shape, position: (i16, i16));

    fn draw_active_piece(&mut self, shape: &Shape, color: Color, position: (i16, i16));

    /// Next piece from the queue, if any
    fn draw_preview(&mut self, next: Option<&ActivePiece>);

    /// Called last every frame with the current phase (overlays go here).
    fn finish_frame(&mut self, _phase: Phase) {}
}

/// Fire-and-forget sound cues
pub trait AudioCues {
    fn line_clear(&mut self, _lines: u32) {}
    fn level_up(&mut self, _level: u32) {}
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn game_over(&mut self) {}
    fn switch_track(&mut self, _track: MusicTrack) {}
}

/// Score/lines/level text sync
pub trait StatsSink {
    fn update_stats(&mut self, score: u32, lines: u32, level: u32);
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_board(&mut self, _board: &Board) {}
    fn draw_ghost(&mut self, _shape: &Shape, _position: (i16, i16)) {}
    fn draw_active_piece(&mut self, _shape: &Shape, _color: Color, _position: (i16, i16)) {}
    fn draw_preview(&mut self, _next: Option<&ActivePiece>) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioCues for NullAudio {}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullStats;

impl StatsSink for NullStats {
    fn update_stats(&mut self, _score: u32, _lines: u32, _level: u32) {}
}

/// Bundles independent collaborator implementations into one observer.
#[derive(Debug, Default, Clone)]
pub struct Collaborators<R, A, S> {
    pub renderer: R,
    pub audio: A,
    pub stats: S,
}

impl<R, A, S> Collaborators<R, A, S> {
    pub fn new(renderer: R, audio: A, stats: S) -> Self {
        Self {
            renderer,
            audio,
            stats,
        }
    }
}

impl<R: Renderer, A, S> Renderer for Collaborators<R, A, S> {
    fn draw_board(&mut self, board: &Board) {
        self.renderer.draw_board(board);
    }

    fn draw_ghost(&mut self, shape: &Shape, position: (i16, i16)) {
        self.renderer.draw_ghost(shape, position);
    }

    fn draw_active_piece(&mut self, shape: &Shape, color: Color, position: (i16, i16)) {
        self.renderer.draw_active_piece(shape, color, position);
    }

    fn draw_preview(&mut self, next: Option<&ActivePiece>) {
        self.renderer.draw_preview(next);
    }

    fn finish_frame(&mut self, phase: Phase) {
        self.renderer.finish_frame(phase);
    }
}

impl<R, A: AudioCues, S> AudioCues for Collaborators<R, A, S> {
    fn line_clear(&mut self, lines: u32) {
        self.audio.line_clear(lines);
    }

    fn level_up(&mut self, level: u32) {
        self.audio.level_up(level);
    }

    fn pause(&mut self) {
        self.audio.pause();
    }

    fn resume(&mut self) {
        self.audio.resume();
    }

    fn game_over(&mut self) {
        self.audio.game_over();
    }

    fn switch_track(&mut self, track: MusicTrack) {
        self.audio.switch_track(track);
    }
}

impl<R, A, S: StatsSink> StatsSink for Collaborators<R, A, S> {
    fn update_stats(&mut self, score: u32, lines: u32, level: u32) {
        self.stats.update_stats(score, lines, level);
    }
}
