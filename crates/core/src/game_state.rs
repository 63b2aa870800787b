//! Game state module - the simulation engine
//!
//! Ties together the board, the piece queue and scoring. It owns the active
//! piece, the gravity and lock-delay timers and the score/level counters, and it
//! validates every player intent against the board before committing it.
//!
//! State machine:
//!
//! ```text
//! Falling --(blocked below)--> LockPending --(lock delay | hard drop)--> merge + spawn
//!    ^                              |
//!    +---(move/rotate frees it)-----+
//!
//! Falling/LockPending <--(toggle)--> Paused
//! merge --(top row filled | spawn collides)--> GameOver (until restart)
//! ```

use std::vec::Drain;

use crate::board::Board;
use crate::config::{ConfigError, EngineConfig};
use crate::pieces::{try_rotate, ActivePiece};
use crate::rng::{PieceQueue, Randomizer};
use crate::scoring::{drop_interval_ms, drop_score, level_for_lines, line_clear_score, speed_factor};
use crate::types::{GameAction, GameEvent, Phase};

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    queue: PieceQueue,
    active: Option<ActivePiece>,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Events recorded since the last drain, oldest first.
    events: Vec<GameEvent>,
    score: u32,
    lines: u32,
    level: u32,
    speed_factor: f64,
    drop_timer_ms: u32,
    lock_timer_ms: u32,
    lock_pending: bool,
    paused: bool,
    game_over: bool,
}

impl GameState {
    /// Create a new game drawing pieces uniformly from a seeded RNG
    pub fn new(config: EngineConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_randomizer(config, Randomizer::uniform(seed))
    }

    /// Create a new game with an explicit piece source.
    ///
    /// The first piece is spawned immediately.
    pub fn with_randomizer(
        config: EngineConfig,
        randomizer: Randomizer,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.board_width, config.board_height)?;
        let queue = PieceQueue::new(
            randomizer,
            config.queue_depth,
            (config.spawn_x, config.spawn_y),
        );

        let mut state = Self {
            config,
            board,
            queue,
            active: None,
            episode_id: 0,
            events: Vec::new(),
            score: 0,
            lines: 0,
            level: 1,
            speed_factor: 1.0,
            drop_timer_ms: 0,
            lock_timer_ms: 0,
            lock_pending: false,
            paused: false,
            game_over: false,
        };
        state.spawn_piece();
        Ok(state)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    /// Piece that will spawn next
    pub fn next_piece(&self) -> Option<&ActivePiece> {
        self.queue.peek()
    }

    /// Upcoming pieces, next first
    pub fn lookahead(&self) -> impl Iterator<Item = &ActivePiece> {
        self.queue.lookahead()
    }

    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    /// Current gravity interval
    pub fn drop_interval_ms(&self) -> f64 {
        drop_interval_ms(self.config.base_drop_interval_ms, self.speed_factor)
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    pub fn lock_timer_ms(&self) -> u32 {
        self.lock_timer_ms
    }

    pub fn lock_pending(&self) -> bool {
        self.lock_pending
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if self.paused {
            Phase::Paused
        } else if self.lock_pending {
            Phase::LockPending
        } else {
            Phase::Falling
        }
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every recorded event, oldest first
    pub fn drain_events(&mut self) -> Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    fn accepts_intents(&self) -> bool {
        !self.paused && !self.game_over
    }

    /// Spawn the next piece from the queue.
    ///
    /// Ends the game when the new piece collides at its spawn anchor.
    pub(crate) fn spawn_piece(&mut self) -> bool {
        self.lock_timer_ms = 0;
        self.lock_pending = false;

        let Some(piece) = self.queue.next() else {
            self.enter_game_over();
            return false;
        };

        if self.board.piece_collides(&piece) {
            self.enter_game_over();
            return false;
        }

        self.active = Some(piece);
        true
    }

    fn enter_game_over(&mut self) {
        self.active = None;
        self.lock_pending = false;
        self.game_over = true;
        self.events.push(GameEvent::GameOver);
    }

    /// Check if the active piece is resting on something
    pub fn is_grounded(&self) -> bool {
        match self.active {
            Some(piece) => self.board.piece_collides(&piece.shifted(0, 1)),
            None => false,
        }
    }

    /// Rows the piece can fall before it would collide
    fn drop_distance(&self, piece: &ActivePiece) -> u32 {
        let mut distance: u32 = 0;
        while let Ok(dy) = i16::try_from(distance + 1) {
            if self.board.piece_collides(&piece.shifted(0, dy)) {
                break;
            }
            distance += 1;
        }
        distance
    }

    /// Where the active piece would land if hard dropped now
    pub fn ghost_position(&self) -> Option<(i16, i16)> {
        let active = self.active?;
        let distance = self.drop_distance(&active) as i16;
        Some((active.x, active.y + distance))
    }

    /// Advance the simulation by `delta_ms` of real time.
    ///
    /// Returns true when the active piece moved down or was merged.
    pub fn update(&mut self, delta_ms: u32) -> bool {
        if self.paused || self.game_over {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let mut changed = false;

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(delta_ms);
        if self.drop_timer_ms as f64 > self.drop_interval_ms() {
            let below = active.shifted(0, 1);
            if self.board.piece_collides(&below) {
                self.lock_pending = true;
            } else {
                self.active = Some(below);
                self.lock_pending = false;
                changed = true;
            }
            self.drop_timer_ms = 0;
        }

        if self.lock_pending {
            self.lock_timer_ms = self.lock_timer_ms.saturating_add(delta_ms);
            if self.lock_timer_ms >= self.config.lock_delay_ms {
                self.lock_piece();
                changed = true;
            }
        } else {
            self.lock_timer_ms = 0;
        }

        changed
    }

    /// Reset the lock timer after a successful move or rotation, and resume
    /// falling if the piece is no longer supported.
    fn after_maneuver(&mut self) {
        self.lock_timer_ms = 0;
        if self.lock_pending && !self.is_grounded() {
            self.lock_pending = false;
        }
    }

    /// Shift the active piece one column in the direction of `dx`
    pub fn move_horizontal(&mut self, dx: i16) -> bool {
        if !self.accepts_intents() || dx == 0 {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let moved = active.shifted(dx.signum(), 0);
        if self.board.piece_collides(&moved) {
            return false;
        }

        self.active = Some(moved);
        self.after_maneuver();
        true
    }

    /// Rotate clockwise, trying each wall kick in order.
    ///
    /// On failure the piece keeps its original shape and position.
    pub fn rotate(&mut self) -> bool {
        if !self.accepts_intents() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match try_rotate(&active, |shape, x, y| self.board.collides(shape, x, y)) {
            Some(rotated) => {
                self.active = Some(rotated);
                self.after_maneuver();
                true
            }
            None => false,
        }
    }

    /// Move down one row for one point, or mark the piece as resting.
    pub fn soft_drop(&mut self) -> bool {
        if !self.accepts_intents() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let below = active.shifted(0, 1);
        if self.board.piece_collides(&below) {
            self.lock_pending = true;
            return false;
        }

        self.active = Some(below);
        self.lock_pending = false;
        self.score = self.score.saturating_add(drop_score(1, false));
        self.events.push(GameEvent::StatsChanged);
        true
    }

    /// Drop to the landing row, score 2 points per row and merge immediately.
    ///
    /// Returns the number of rows dropped, or `None` if no piece is in play.
    pub fn hard_drop(&mut self) -> Option<u32> {
        if !self.accepts_intents() {
            return None;
        }
        let active = self.active?;

        let distance = self.drop_distance(&active);
        self.active = Some(active.shifted(0, distance as i16));

        let points = drop_score(distance, true);
        if points > 0 {
            self.score = self.score.saturating_add(points);
            self.events.push(GameEvent::StatsChanged);
        }

        self.lock_piece();
        Some(distance)
    }

    /// Merge the active piece, clear lines, update score/level and spawn the next piece.
    fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board.merge(&active);
        let cleared = self.board.clear_full_lines() as u32;
        self.events.push(GameEvent::PieceLocked {
            lines_cleared: cleared,
        });

        if cleared > 0 {
            let points = line_clear_score(cleared as usize, self.level);
            self.score = self.score.saturating_add(points);
            self.lines = self.lines.saturating_add(cleared);
            self.events.push(GameEvent::LinesCleared {
                count: cleared,
                points,
            });

            let previous = self.level;
            self.level = level_for_lines(self.lines);
            if self.level > previous {
                self.speed_factor = speed_factor(self.level);
                self.events.push(GameEvent::LevelUp { level: self.level });
            }
            self.events.push(GameEvent::StatsChanged);
        }

        if self.board.top_row_occupied() {
            self.enter_game_over();
            return;
        }

        self.spawn_piece();
    }

    /// Toggle pause. Has no effect once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        self.events.push(if self.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
        true
    }

    /// Replace board, queue and counters with a fresh game.
    ///
    /// The piece source continues from its current state, so consecutive
    /// episodes do not repeat the same sequence.
    pub fn restart(&mut self) {
        let randomizer = self.queue.randomizer().clone();

        self.board.reset();
        self.queue = PieceQueue::new(
            randomizer,
            self.config.queue_depth,
            (self.config.spawn_x, self.config.spawn_y),
        );
        self.active = None;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.speed_factor = 1.0;
        self.drop_timer_ms = 0;
        self.lock_timer_ms = 0;
        self.lock_pending = false;
        self.paused = false;
        self.game_over = false;
        self.events.push(GameEvent::Restarted);
        self.events.push(GameEvent::StatsChanged);

        self.spawn_piece();
    }

    /// Apply a player intent.
    ///
    /// While paused only `TogglePause` and `Restart` are processed; after game
    /// over only `Restart` is. Returns whether the intent had any effect.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop().is_some(),
            GameAction::Rotate => self.rotate(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, PieceKind, LINE_SCORES};

    const GRAY: Color = Color::new(128, 128, 128);

    fn game_with(kinds: &[PieceKind]) -> GameState {
        GameState::with_randomizer(EngineConfig::default(), Randomizer::sequence(kinds.to_vec()))
            .unwrap()
    }

    fn active(state: &GameState) -> ActivePiece {
        *state.active().unwrap()
    }

    /// Soft drop until the piece rests on something, without marking it.
    fn soft_drop_to_floor(state: &mut GameState) {
        while !state.is_grounded() {
            state.soft_drop();
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(EngineConfig::default(), 12345).unwrap();

        assert_eq!(state.score(), 0);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.episode_id(), 0);
        assert_eq!(state.phase(), Phase::Falling);
        assert!((state.speed_factor() - 1.0).abs() < f64::EPSILON);
        assert_eq!(state.queue().len(), 3);

        let piece = active(&state);
        assert_eq!((piece.x, piece.y), (3, 0));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = EngineConfig {
            board_height: 0,
            ..EngineConfig::default()
        };
        assert!(GameState::new(config, 1).is_err());
    }

    #[test]
    fn test_spawn_row_far_above_board() {
        let config = EngineConfig {
            spawn_y: i16::MIN,
            ..EngineConfig::default()
        };
        assert_eq!(
            GameState::new(config, 1).err(),
            Some(ConfigError::SpawnRowOutOfRange {
                y: i16::MIN,
                height: 20
            })
        );

        let config = EngineConfig {
            spawn_y: -127,
            ..EngineConfig::default()
        };
        let mut state =
            GameState::with_randomizer(config, Randomizer::sequence(vec![PieceKind::O])).unwrap();
        assert_eq!(state.ghost_position(), Some((3, 18)));
        assert_eq!(state.hard_drop(), Some(145));
        assert!(state.board().is_occupied(3, 19));
    }

    #[test]
    fn test_spawn_takes_queue_head() {
        let mut state = game_with(&[PieceKind::T, PieceKind::I, PieceKind::S]);
        assert_eq!(active(&state).kind, PieceKind::T);
        assert_eq!(state.next_piece().unwrap().kind, PieceKind::I);

        state.hard_drop();
        assert_eq!(active(&state).kind, PieceKind::I);
        assert_eq!(state.next_piece().unwrap().kind, PieceKind::S);
        assert_eq!(state.queue().len(), 3);
    }

    #[test]
    fn test_gravity_moves_after_interval_is_exceeded() {
        let mut state = game_with(&[PieceKind::O]);
        // Strictly greater than the interval is required.
        assert!(!state.update(675));
        assert_eq!(active(&state).y, 0);
        assert!(state.update(1));
        assert_eq!(active(&state).y, 1);
        assert_eq!(state.drop_timer_ms(), 0);
    }

    #[test]
    fn test_blocked_gravity_sets_lock_pending() {
        let mut state = game_with(&[PieceKind::O]);
        soft_drop_to_floor(&mut state);
        assert_eq!(active(&state).y, 18);
        assert!(!state.lock_pending());

        state.update(676);
        assert_eq!(active(&state).y, 18);
        assert_eq!(state.phase(), Phase::LockPending);
    }

    #[test]
    fn test_lock_delay_merges_after_threshold() {
        let mut state = game_with(&[PieceKind::O]);
        soft_drop_to_floor(&mut state);
        assert_eq!(state.score(), 18);

        // Blocked soft drop marks the piece as resting without merging.
        assert!(!state.soft_drop());
        assert_eq!(state.phase(), Phase::LockPending);
        assert_eq!(state.board().filled_count(), 0);

        state.update(499);
        assert_eq!(state.board().filled_count(), 0);
        assert_eq!(state.lock_timer_ms(), 499);

        assert!(state.update(1));
        assert_eq!(state.board().filled_count(), 4);
        assert_eq!((active(&state).x, active(&state).y), (3, 0));
        assert_eq!(state.phase(), Phase::Falling);
        assert!(state
            .events()
            .contains(&GameEvent::PieceLocked { lines_cleared: 0 }));
    }

    #[test]
    fn test_move_resets_lock_timer() {
        let mut state = game_with(&[PieceKind::O]);
        soft_drop_to_floor(&mut state);
        state.soft_drop();

        state.update(400);
        assert_eq!(state.lock_timer_ms(), 400);
        assert!(state.move_horizontal(-1));
        assert_eq!(state.lock_timer_ms(), 0);
        // Still on the floor.
        assert!(state.lock_pending());

        state.update(400);
        assert_eq!(state.board().filled_count(), 0);
    }

    #[test]
    fn test_moving_off_a_ledge_resumes_falling() {
        let mut state = game_with(&[PieceKind::O]);
        state.board_mut().set(3, 2, Some(GRAY));
        state.board_mut().set(4, 2, Some(GRAY));

        assert!(!state.soft_drop());
        assert_eq!(state.phase(), Phase::LockPending);

        assert!(state.move_horizontal(1));
        assert_eq!(state.phase(), Phase::LockPending);

        assert!(state.move_horizontal(1));
        assert_eq!(state.phase(), Phase::Falling);
    }

    #[test]
    fn test_move_blocked_by_walls() {
        let mut state = game_with(&[PieceKind::O]);
        let mut moved = 0;
        for _ in 0..10 {
            if state.move_horizontal(-1) {
                moved += 1;
            }
        }
        assert_eq!(moved, 3);
        assert_eq!(active(&state).x, 0);

        let mut moved = 0;
        for _ in 0..10 {
            if state.move_horizontal(1) {
                moved += 1;
            }
        }
        assert_eq!(moved, 8);
        assert_eq!(active(&state).x, 8);
    }

    #[test]
    fn test_four_rotations_restore_shape() {
        for kind in PieceKind::ALL {
            let mut state = game_with(&[kind]);
            state.soft_drop();
            state.soft_drop();
            let before = active(&state);
            for _ in 0..4 {
                assert!(state.rotate(), "{:?}", kind);
            }
            let after = active(&state);
            assert_eq!(after.shape, before.shape, "{:?}", kind);
            assert_eq!((after.x, after.y), (before.x, before.y), "{:?}", kind);
        }
    }

    #[test]
    fn test_i_rotation_against_left_wall_kicks_right() {
        let mut state = game_with(&[PieceKind::I]);
        while state.move_horizontal(-1) {}
        assert_eq!(active(&state).x, 0);

        // Something under the left end blocks the vertical I in column 0.
        state.board_mut().set(0, 1, Some(GRAY));

        assert!(state.rotate());
        let piece = active(&state);
        assert_eq!((piece.x, piece.y), (1, 0));
        assert_eq!((piece.shape.width(), piece.shape.height()), (1, 4));
    }

    #[test]
    fn test_i_rotation_near_right_wall_kicks_left() {
        let mut state = game_with(&[PieceKind::I]);
        state.rotate();
        while state.move_horizontal(1) {}
        assert_eq!(active(&state).x, 9);

        // From x=8 only the -2 kick leaves room for the horizontal bar.
        state.move_horizontal(-1);
        assert!(state.rotate());
        assert_eq!(active(&state).x, 6);
    }

    #[test]
    fn test_failed_rotation_is_reverted() {
        let mut state = game_with(&[PieceKind::I]);
        state.rotate();
        while state.move_horizontal(1) {}
        let before = active(&state);

        // Flush against the right wall no kick fits a 4-wide bar.
        assert!(!state.rotate());
        assert_eq!(active(&state), before);
    }

    #[test]
    fn test_rotation_resets_lock_timer() {
        let mut state = game_with(&[PieceKind::T]);
        soft_drop_to_floor(&mut state);
        state.soft_drop();
        state.update(300);
        assert_eq!(state.lock_timer_ms(), 300);
        assert!(state.rotate());
        assert_eq!(state.lock_timer_ms(), 0);
    }

    #[test]
    fn test_hard_drop_scores_two_per_row() {
        let mut state = game_with(&[PieceKind::O]);
        assert_eq!(state.hard_drop(), Some(18));
        assert_eq!(state.score(), 36);
        assert_eq!(state.board().filled_count(), 4);
        assert!(state.board().is_occupied(3, 19));
    }

    #[test]
    fn test_hard_drop_line_clear_scores_by_level() {
        for (lines, level) in [(1usize, 1u32), (2, 1), (3, 2), (4, 3)] {
            let mut state = game_with(&[PieceKind::I]);
            state.lines = (level - 1) * 10;
            state.level = level_for_lines(state.lines);
            state.speed_factor = speed_factor(state.level);

            // Fill the bottom `lines` rows except column 0.
            for y in (20 - lines as i16)..20 {
                for x in 1..10 {
                    state.board_mut().set(x, y, Some(GRAY));
                }
            }

            assert!(state.rotate());
            while state.move_horizontal(-1) {}
            assert_eq!(state.hard_drop(), Some(16));

            let expected = 2 * 16 + LINE_SCORES[lines] * level;
            assert_eq!(state.score(), expected, "lines={} level={}", lines, level);
            assert_eq!(state.lines(), (level - 1) * 10 + lines as u32);
            assert!(!state.board().is_row_full(19));
        }
    }

    #[test]
    fn test_ghost_position_is_read_only() {
        let mut state = game_with(&[PieceKind::O]);
        state.board_mut().set(3, 10, Some(GRAY));
        let before = active(&state);
        assert_eq!(state.ghost_position(), Some((3, 8)));
        assert_eq!(active(&state), before);
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut state = game_with(&[PieceKind::O]);
        while state.move_horizontal(1) {}
        state.board_mut().set(3, 1, Some(GRAY));

        state.hard_drop();
        assert_eq!(state.phase(), Phase::GameOver);
        assert!(state.active().is_none());
        assert!(state.events().contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_game_over_ignores_updates_and_intents() {
        let mut state = game_with(&[PieceKind::O]);
        state.enter_game_over();
        let score = state.score();

        assert!(!state.update(10_000));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.apply_action(GameAction::TogglePause));
        assert_eq!(state.score(), score);
        assert_eq!(state.phase(), Phase::GameOver);
    }

    #[test]
    fn test_pause_freezes_timers_and_intents() {
        let mut state = game_with(&[PieceKind::O]);
        state.update(100);
        assert!(state.apply_action(GameAction::TogglePause));
        assert_eq!(state.phase(), Phase::Paused);

        assert!(!state.update(10_000));
        assert_eq!(state.drop_timer_ms(), 100);
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::HardDrop));

        assert!(state.apply_action(GameAction::TogglePause));
        assert_eq!(state.phase(), Phase::Falling);
        let events: Vec<_> = state.drain_events().collect();
        assert_eq!(events, vec![GameEvent::Paused, GameEvent::Resumed]);
    }

    #[test]
    fn test_pause_resumes_lock_pending() {
        let mut state = game_with(&[PieceKind::O]);
        soft_drop_to_floor(&mut state);
        state.soft_drop();
        state.toggle_pause();
        state.toggle_pause();
        assert_eq!(state.phase(), Phase::LockPending);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = game_with(&[PieceKind::O]);
        state.hard_drop();
        state.toggle_pause();
        state.drain_events().for_each(drop);

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.board().filled_count(), 0);
        assert_eq!(state.phase(), Phase::Falling);
        assert_eq!(state.queue().len(), 3);
        assert!(state.active().is_some());
        assert_eq!(
            state.events(),
            &[GameEvent::Restarted, GameEvent::StatsChanged]
        );
    }
}
