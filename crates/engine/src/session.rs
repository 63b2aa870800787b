//! Session module - the frame scheduler
//!
//! One [`Session::tick`] is one frame: read the injected clock, apply queued
//! intents, advance the simulation once, forward the frame's events to the
//! collaborators and finally draw. Nothing here blocks; the caller decides how
//! often to tick.

use std::collections::VecDeque;

use crate::clock::Clock;
use crate::collaborators::{AudioCues, Renderer, StatsSink};
use crate::core::GameState;
use crate::track::select_track;
use crate::types::{GameAction, GameEvent, MusicTrack, MAX_FRAME_DELTA_MS, TICK_MS};

/// Scheduler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on the time fed to one update. Longer gaps (a stalled
    /// terminal, a suspended process) are truncated to this.
    pub max_frame_delta_ms: u32,
    /// Target frame period for real-time drivers
    pub tick_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            tick_ms: TICK_MS,
        }
    }
}

pub struct Session<C: Clock> {
    game: GameState,
    clock: C,
    config: SessionConfig,
    last_ms: Option<u64>,
    track: MusicTrack,
    intents: VecDeque<GameAction>,
    stats_dirty: bool,
    frames: u64,
}

impl<C: Clock> Session<C> {
    pub fn new(game: GameState, clock: C) -> Self {
        Self::with_config(game, clock, SessionConfig::default())
    }

    pub fn with_config(game: GameState, clock: C, config: SessionConfig) -> Self {
        Self {
            game,
            clock,
            config,
            last_ms: None,
            track: MusicTrack::Normal,
            intents: VecDeque::new(),
            // The first frame publishes the initial stats.
            stats_dirty: true,
            frames: 0,
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Background track currently playing
    pub fn track(&self) -> MusicTrack {
        self.track
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Queue an intent for the next frame. Intents are applied in arrival order
    /// before that frame's update.
    pub fn push_intent(&mut self, action: GameAction) {
        self.intents.push_back(action);
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.len()
    }

    /// Milliseconds since the previous frame, clamped. The first frame is zero.
    fn next_delta(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let delta = match self.last_ms {
            Some(prev) => now
                .saturating_sub(prev)
                .min(self.config.max_frame_delta_ms as u64) as u32,
            None => 0,
        };
        self.last_ms = Some(now);
        delta
    }

    /// Run one frame and return the time delta that was simulated.
    pub fn tick<O>(&mut self, out: &mut O) -> u32
    where
        O: Renderer + AudioCues + StatsSink,
    {
        let delta = self.next_delta();

        while let Some(action) = self.intents.pop_front() {
            self.game.apply_action(action);
        }
        self.game.update(delta);

        self.dispatch_events(out);
        self.sync_track(out);

        if self.stats_dirty {
            out.update_stats(self.game.score(), self.game.lines(), self.game.level());
            self.stats_dirty = false;
        }

        self.render(out);
        self.frames += 1;
        delta
    }

    fn dispatch_events<A: AudioCues>(&mut self, audio: &mut A) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::LinesCleared { count, .. } => audio.line_clear(count),
                GameEvent::LevelUp { level } => audio.level_up(level),
                GameEvent::Paused => audio.pause(),
                GameEvent::Resumed => audio.resume(),
                GameEvent::GameOver => audio.game_over(),
                GameEvent::StatsChanged | GameEvent::Restarted => self.stats_dirty = true,
                GameEvent::PieceLocked { .. } => {}
            }
        }
    }

    fn sync_track<A: AudioCues>(&mut self, audio: &mut A) {
        let desired = select_track(self.game.level(), self.game.board().occupancy());
        if desired != self.track {
            self.track = desired;
            audio.switch_track(desired);
        }
    }

    fn render<R: Renderer>(&self, renderer: &mut R) {
        renderer.draw_board(self.game.board());
        if let Some(active) = self.game.active() {
            if let Some(ghost) = self.game.ghost_position() {
                renderer.draw_ghost(&active.shape, ghost);
            }
            renderer.draw_active_piece(&active.shape, active.color, (active.x, active.y));
        }
        renderer.draw_preview(self.game.next_piece());
        renderer.finish_frame(self.game.phase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core::{ActivePiece, Board, EngineConfig, Randomizer, Shape};
    use crate::types::{Color, PieceKind, Phase};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        cues: Vec<&'static str>,
        tracks: Vec<MusicTrack>,
        levels: Vec<u32>,
        stats: Vec<(u32, u32, u32)>,
        ghost: Option<(i16, i16)>,
        active: Option<(i16, i16)>,
        phase: Option<Phase>,
    }

    impl Renderer for Recorder {
        fn draw_board(&mut self, _board: &Board) {
            self.calls.clear();
            self.calls.push("board");
        }

        fn draw_ghost(&mut self, _shape: &Shape, position: (i16, i16)) {
            self.calls.push("ghost");
            self.ghost = Some(position);
        }

        fn draw_active_piece(&mut self, _shape: &Shape, _color: Color, position: (i16, i16)) {
            self.calls.push("active");
            self.active = Some(position);
        }

        fn draw_preview(&mut self, _next: Option<&ActivePiece>) {
            self.calls.push("preview");
        }

        fn finish_frame(&mut self, phase: Phase) {
            self.calls.push("finish");
            self.phase = Some(phase);
        }
    }

    impl AudioCues for Recorder {
        fn line_clear(&mut self, _lines: u32) {
            self.cues.push("line_clear");
        }

        fn level_up(&mut self, level: u32) {
            self.cues.push("level_up");
            self.levels.push(level);
        }

        fn pause(&mut self) {
            self.cues.push("pause");
        }

        fn resume(&mut self) {
            self.cues.push("resume");
        }

        fn game_over(&mut self) {
            self.cues.push("game_over");
        }

        fn switch_track(&mut self, track: MusicTrack) {
            self.tracks.push(track);
        }
    }

    impl StatsSink for Recorder {
        fn update_stats(&mut self, score: u32, lines: u32, level: u32) {
            self.stats.push((score, lines, level));
        }
    }

    fn session_with(config: EngineConfig, kinds: &[PieceKind]) -> Session<ManualClock> {
        let game =
            GameState::with_randomizer(config, Randomizer::sequence(kinds.to_vec())).unwrap();
        Session::new(game, ManualClock::new(1_000))
    }

    #[test]
    fn first_frame_has_zero_delta_and_publishes_stats() {
        let mut session = session_with(EngineConfig::default(), &[PieceKind::T]);
        let mut out = Recorder::default();

        assert_eq!(session.tick(&mut out), 0);
        assert_eq!(out.stats, vec![(0, 0, 1)]);
        assert_eq!(out.calls, vec!["board", "ghost", "active", "preview", "finish"]);
        assert_eq!(out.active, Some((3, 0)));
        assert_eq!(out.ghost, Some((3, 18)));
        assert_eq!(out.phase, Some(Phase::Falling));

        // Stats are only re-sent after a change.
        session.clock_mut().advance(16);
        session.tick(&mut out);
        assert_eq!(out.stats.len(), 1);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut session = session_with(EngineConfig::default(), &[PieceKind::O]);
        let mut out = Recorder::default();
        session.tick(&mut out);

        session.clock_mut().advance(10_000);
        assert_eq!(session.tick(&mut out), 250);
        // A clock going backwards counts as an empty frame.
        session.clock_mut().set(0);
        assert_eq!(session.tick(&mut out), 0);
    }

    #[test]
    fn gravity_follows_the_clock() {
        let mut session = session_with(EngineConfig::default(), &[PieceKind::O]);
        let mut out = Recorder::default();
        session.tick(&mut out);

        for _ in 0..42 {
            session.clock_mut().advance(16);
            session.tick(&mut out);
        }
        assert_eq!(out.active, Some((3, 0)));

        session.clock_mut().advance(16);
        session.tick(&mut out);
        assert_eq!(out.active, Some((3, 1)));
        assert_eq!(session.frames(), 44);
    }

    #[test]
    fn intents_apply_before_update() {
        let mut session = session_with(EngineConfig::default(), &[PieceKind::O]);
        let mut out = Recorder::default();

        session.push_intent(GameAction::MoveLeft);
        session.push_intent(GameAction::HardDrop);
        assert_eq!(session.pending_intents(), 2);
        session.tick(&mut out);

        assert_eq!(session.pending_intents(), 0);
        assert!(session.game().board().is_occupied(2, 19));
        assert_eq!(out.stats.last(), Some(&(36, 0, 1)));
    }

    #[test]
    fn pause_cues_and_frozen_frames() {
        let mut session = session_with(EngineConfig::default(), &[PieceKind::O]);
        let mut out = Recorder::default();
        session.tick(&mut out);

        session.push_intent(GameAction::TogglePause);
        session.tick(&mut out);
        assert_eq!(out.phase, Some(Phase::Paused));

        for _ in 0..10 {
            session.clock_mut().advance(200);
            session.tick(&mut out);
        }
        assert_eq!(out.active, Some((3, 0)));

        session.push_intent(GameAction::TogglePause);
        session.clock_mut().advance(16);
        session.tick(&mut out);
        assert_eq!(out.cues, vec!["pause", "resume"]);
        assert_eq!(out.active, Some((3, 0)));
    }

    #[test]
    fn track_switches_on_change_only_and_resets_on_restart() {
        let config = EngineConfig {
            board_width: 4,
            board_height: 4,
            spawn_x: 0,
            ..EngineConfig::default()
        };
        let mut session = session_with(config, &[PieceKind::O]);
        let mut out = Recorder::default();
        session.tick(&mut out);
        assert!(out.tracks.is_empty());

        // Two stacked O pieces fill half the board and reach the top row.
        session.push_intent(GameAction::HardDrop);
        session.push_intent(GameAction::HardDrop);
        session.tick(&mut out);

        assert_eq!(out.phase, Some(Phase::GameOver));
        assert_eq!(out.cues, vec!["game_over"]);
        assert_eq!(out.tracks, vec![MusicTrack::Fast]);
        assert_eq!(session.track(), MusicTrack::Fast);
        assert_eq!(out.calls, vec!["board", "preview", "finish"]);

        session.tick(&mut out);
        assert_eq!(out.tracks.len(), 1);

        session.push_intent(GameAction::Restart);
        session.tick(&mut out);
        assert_eq!(out.tracks, vec![MusicTrack::Fast, MusicTrack::Normal]);
        assert_eq!(out.stats.last(), Some(&(0, 0, 1)));
        assert_eq!(session.game().episode_id(), 1);
    }

    #[test]
    fn line_clear_cue() {
        let config = EngineConfig {
            board_width: 2,
            spawn_x: 0,
            ..EngineConfig::default()
        };
        let mut session = session_with(config, &[PieceKind::O]);
        let mut out = Recorder::default();

        session.push_intent(GameAction::HardDrop);
        session.tick(&mut out);
        assert_eq!(out.cues, vec!["line_clear"]);
        // 18 rows hard dropped plus a double at level 1.
        assert_eq!(out.stats.last(), Some(&(36 + 300, 2, 1)));
    }

    #[test]
    fn level_up_cue_fires_once_per_level() {
        let config = EngineConfig {
            board_width: 4,
            spawn_x: 0,
            ..EngineConfig::default()
        };
        let mut session = session_with(config, &[PieceKind::I]);
        let mut out = Recorder::default();
        session.tick(&mut out);

        for _ in 0..10 {
            session.push_intent(GameAction::HardDrop);
            session.clock_mut().advance(16);
            session.tick(&mut out);
        }

        assert_eq!(out.levels, vec![2]);
        assert_eq!(out.cues.iter().filter(|c| **c == "level_up").count(), 1);
        assert_eq!(out.cues.iter().filter(|c| **c == "line_clear").count(), 10);
        assert_eq!(out.cues.last(), Some(&"level_up"));
        assert_eq!(session.game().level(), 2);
        assert_eq!(out.stats.last(), Some(&(10 * 38 + 10 * 100, 10, 2)));
    }
}
