//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds every game rule: the grid, the piece catalog, the piece
//! queue, scoring and the simulation state machine. It performs no I/O and never
//! reads a clock; time only enters through [`GameState::update`].
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with collision queries and line clearing
//! - [`config`]: engine configuration and validation
//! - [`game_state`]: active piece, timers, scoring and the phase machine
//! - [`pieces`]: shape matrices, the catalog and clockwise rotation with kicks
//! - [`rng`]: uniform piece draws and the lookahead queue
//! - [`scoring`]: line clear points, drop points and the speed curve
//!
//! # Example
//!
//! ```
//! use blockfall_core::{EngineConfig, GameState};
//! use blockfall_core::types::GameAction;
//!
//! let mut game = GameState::new(EngineConfig::default(), 12345).unwrap();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop awards two points per row.
//! assert!(game.score() > 0);
//! ```

pub mod board;
pub mod config;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, EngineConfig};
pub use game_state::GameState;
pub use pieces::{definition, try_rotate, ActivePiece, PieceDef, Shape};
pub use rng::{PieceQueue, Randomizer, SimpleRng};
pub use scoring::{drop_interval_ms, drop_score, level_for_lines, line_clear_score, speed_factor};
