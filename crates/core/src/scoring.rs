//! Scoring module - line clear points, drop points and the speed curve
//!
//! - Line clears pay `LINE_SCORES[rows] * level`, using the level in effect
//!   before the clear is counted.
//! - Soft drops pay 1 point per row and hard drops 2 points per row, independent
//!   of level.
//! - Level is always derived from total lines: `lines / 10 + 1`.

use crate::types::{
    HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, MIN_SPEED_FACTOR, SOFT_DROP_POINTS,
    SPEED_STEP,
};

/// Points for clearing `lines` rows in one merge at `level`.
///
/// Rows beyond four pay the four-row value.
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    let idx = lines.min(LINE_SCORES.len() - 1);
    LINE_SCORES[idx].saturating_mul(level)
}

/// Points for a drop of `distance` rows
pub fn drop_score(distance: u32, hard: bool) -> u32 {
    let per_row = if hard {
        HARD_DROP_POINTS
    } else {
        SOFT_DROP_POINTS
    };
    distance.saturating_mul(per_row)
}

/// Level reached after `total_lines` cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Drop-speed factor for a level, floored at 10%
pub fn speed_factor(level: u32) -> f64 {
    let steps = level.saturating_sub(1) as f64;
    (1.0 - SPEED_STEP * steps).max(MIN_SPEED_FACTOR)
}

/// Gravity interval for a base interval and speed factor
pub fn drop_interval_ms(base_ms: u32, factor: f64) -> f64 {
    base_ms as f64 * factor
}
