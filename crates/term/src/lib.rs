//! Terminal "game renderer" module.
//!
//! Implements the engine collaborators for a terminal. Frames are composed into
//! a simple framebuffer (no widget toolkit) and flushed through crossterm.
//!
//! - [`TermFrontend`] receives renderer calls, audio cues and stats and draws them
//! - [`TerminalRenderer`] diffs consecutive frames and writes only what changed
//! - Board cells are 2 columns wide to compensate for glyph aspect ratio

pub mod fb;
pub mod frontend;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use frontend::{Cue, TermFrontend, Viewport, CUE_FRAMES};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
