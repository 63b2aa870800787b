//! Engine configuration.
//!
//! Every field has a default matching the classic game, so a partial JSON
//! document (or none at all) yields a playable configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{
    BASE_DROP_MS, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, LOCK_DELAY_MS, MAX_BOARD_DIMENSION,
    QUEUE_DEPTH, SPAWN_X, SPAWN_Y,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub board_width: u16,
    pub board_height: u16,
    pub base_drop_interval_ms: u32,
    pub lock_delay_ms: u32,
    pub spawn_x: i16,
    pub spawn_y: i16,
    /// Minimum number of upcoming pieces kept buffered
    pub queue_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            base_drop_interval_ms: BASE_DROP_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            spawn_x: SPAWN_X,
            spawn_y: SPAWN_Y,
            queue_depth: QUEUE_DEPTH,
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.board_width, self.board_height)?;
        if self.base_drop_interval_ms == 0 {
            return Err(ConfigError::ZeroDropInterval);
        }
        if self.queue_depth == 0 {
            return Err(ConfigError::EmptyQueue);
        }
        if self.spawn_x < 0 || self.spawn_x >= self.board_width as i16 {
            return Err(ConfigError::SpawnOutsideBoard {
                x: self.spawn_x,
                width: self.board_width,
            });
        }
        let min_y = -(MAX_BOARD_DIMENSION as i16);
        if self.spawn_y < min_y || self.spawn_y >= self.board_height as i16 {
            return Err(ConfigError::SpawnRowOutOfRange {
                y: self.spawn_y,
                height: self.board_height,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_dimensions(width: u16, height: u16) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::EmptyBoard { width, height });
    }
    if width > MAX_BOARD_DIMENSION || height > MAX_BOARD_DIMENSION {
        return Err(ConfigError::BoardTooLarge { width, height });
    }
    Ok(())
}

/// Construction-time configuration error.
///
/// These are programmer errors; there is no recovery path once play starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyBoard { width: u16, height: u16 },
    BoardTooLarge { width: u16, height: u16 },
    ZeroDropInterval,
    EmptyQueue,
    SpawnOutsideBoard { x: i16, width: u16 },
    SpawnRowOutOfRange { y: i16, height: u16 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyBoard { width, height } => {
                write!(f, "board dimensions must be positive, got {}x{}", width, height)
            }
            ConfigError::BoardTooLarge { width, height } => write!(
                f,
                "board dimensions must be at most {}, got {}x{}",
                MAX_BOARD_DIMENSION, width, height
            ),
            ConfigError::ZeroDropInterval => write!(f, "base drop interval must be positive"),
            ConfigError::EmptyQueue => write!(f, "piece queue depth must be at least 1"),
            ConfigError::SpawnOutsideBoard { x, width } => {
                write!(f, "spawn column {} is outside a board {} wide", x, width)
            }
            ConfigError::SpawnRowOutOfRange { y, height } => write!(
                f,
                "spawn row {} must lie in {}..{}",
                y,
                -(MAX_BOARD_DIMENSION as i16),
                height
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
