//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into discrete [`crate::types::GameAction`]
//! intents. The engine never sees raw key codes.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
