//! Background music selection.

use crate::types::{MusicTrack, FAST_TRACK_LEVEL, FAST_TRACK_OCCUPANCY};

/// Fast track once the level or the stack height gets high, normal otherwise.
pub fn select_track(level: u32, occupancy: f64) -> MusicTrack {
    if level >= FAST_TRACK_LEVEL || occupancy >= FAST_TRACK_OCCUPANCY {
        MusicTrack::Fast
    } else {
        MusicTrack::Normal
    }
}
