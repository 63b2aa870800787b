//! Engine runtime: the frame scheduler and the collaborator interfaces.
//!
//! `blockfall-core` is a pure state machine. This crate drives it in time: a
//! [`Session`] owns a [`GameState`](crate::core::GameState) and an injected
//! [`Clock`], and on every tick it applies queued intents, advances the
//! simulation and reports to the [`Renderer`], [`AudioCues`] and [`StatsSink`]
//! collaborators.

pub mod clock;
pub mod collaborators;
pub mod session;
pub mod track;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use collaborators::{
    AudioCues, Collaborators, NullAudio, NullRenderer, NullStats, Renderer, StatsSink,
};
pub use session::{Session, SessionConfig};
pub use track::select_track;
