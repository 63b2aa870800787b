//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used by
//! the simulation core, the frame scheduler and any frontend alike.
//!
//! # Board Dimensions
//!
//! The default playfield is 10 columns by 20 rows. Row 0 is the top row, and
//! pieces spawn with their anchor at (3, 0). Dimensions are configurable per game
//! but never change once a board is built.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval used by the terminal loop (~60 FPS) |
//! | `BASE_DROP_MS` | 675 | Gravity interval at level 1 |
//! | `LOCK_DELAY_MS` | 500 | Grace period before a resting piece is merged |
//! | `MAX_FRAME_DELTA_MS` | 250 | Largest delta fed to a single update |
//!
//! # Speed Curve
//!
//! The drop interval is `BASE_DROP_MS * factor` where
//! `factor = max(0.1, 1.0 - 0.08 * (level - 1))`.
//!
//! | Level | Factor | Interval |
//! |-------|--------|----------|
//! | 1 | 1.00 | 675ms |
//! | 2 | 0.92 | 621ms |
//! | 5 | 0.68 | 459ms |
//! | 10 | 0.28 | 189ms |
//! | 12 | 0.12 | 81ms |
//! | 13+ | 0.10 | 67.5ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(DEFAULT_BOARD_WIDTH, 10);
//! assert_eq!(DEFAULT_BOARD_HEIGHT, 20);
//! ```

/// Default board width in cells
pub const DEFAULT_BOARD_WIDTH: u16 = 10;

/// Default board height in cells
pub const DEFAULT_BOARD_HEIGHT: u16 = 20;

/// Largest board dimension accepted by the engine
pub const MAX_BOARD_DIMENSION: u16 = 127;

/// Spawn anchor column
pub const SPAWN_X: i16 = 3;

/// Spawn anchor row
pub const SPAWN_Y: i16 = 0;

/// Frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1
pub const BASE_DROP_MS: u32 = 675;

/// Time a resting piece waits before it is merged
pub const LOCK_DELAY_MS: u32 = 500;

/// Upper bound on the delta handed to one update, so a stalled frame
/// cannot skip several gravity steps at once.
pub const MAX_FRAME_DELTA_MS: u32 = 250;

/// Minimum number of buffered upcoming pieces
pub const QUEUE_DEPTH: usize = 3;

/// Cleared lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Speed factor lost per level gained
pub const SPEED_STEP: f64 = 0.08;

/// Lowest speed factor (10% of the base interval)
pub const MIN_SPEED_FACTOR: f64 = 0.1;

/// Line clear scoring table, indexed by rows cleared in one merge.
///
/// The value is multiplied by the level at the time of the merge.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per row for a player soft drop
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per row for a hard drop
pub const HARD_DROP_POINTS: u32 = 2;

/// Level at which the fast background track kicks in
pub const FAST_TRACK_LEVEL: u32 = 10;

/// Board occupancy at which the fast background track kicks in
pub const FAST_TRACK_OCCUPANCY: f64 = 0.5;

/// The seven tetromino piece kinds, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    O,
    I,
    S,
    Z,
    L,
    J,
    T,
}

impl PieceKind {
    /// Every kind, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::L,
        PieceKind::J,
        PieceKind::T,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "o" => Some(PieceKind::O),
            "i" => Some(PieceKind::I),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "t" => Some(PieceKind::T),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::O => "o",
            PieceKind::I => "i",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::L => "l",
            PieceKind::J => "j",
            PieceKind::T => "t",
        }
    }

    /// Position in [`PieceKind::ALL`]
    pub fn index(&self) -> usize {
        match self {
            PieceKind::O => 0,
            PieceKind::I => 1,
            PieceKind::S => 2,
            PieceKind::Z => 3,
            PieceKind::L => 4,
            PieceKind::J => 5,
            PieceKind::T => 6,
        }
    }
}

/// 24-bit RGB color identifier carried by occupied cells and pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Cell occupied by a merged block of that color
pub type Cell = Option<Color>;

/// Discrete player intents.
///
/// Raw key codes are translated into these upstream of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Shift the piece one column left
    MoveLeft,
    /// Shift the piece one column right
    MoveRight,
    /// Move one row down (1 point) or mark the piece as resting
    SoftDrop,
    /// Drop to the landing row and merge immediately
    HardDrop,
    /// Rotate 90° clockwise with wall kicks
    Rotate,
    /// Toggle pause
    TogglePause,
    /// Start a fresh game
    Restart,
}

impl GameAction {
    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("togglepause"), Some(GameAction::TogglePause));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotate" => Some(GameAction::Rotate),
            "togglepause" => Some(GameAction::TogglePause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Rotate => "rotate",
            GameAction::TogglePause => "togglePause",
            GameAction::Restart => "restart",
        }
    }
}

/// Observable state of the simulation.
///
/// `Paused` remembers nothing itself: unpausing returns to whichever of
/// `Falling`/`LockPending` the lock-pending flag says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Falling,
    LockPending,
    Paused,
    GameOver,
}

/// Background track selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MusicTrack {
    #[default]
    Normal,
    Fast,
}

/// Event recorded by the engine while mutating state.
///
/// Events are drained by the frame scheduler and forwarded to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The active piece was merged into the board
    PieceLocked { lines_cleared: u32 },
    /// One merge cleared `count` rows worth `points`
    LinesCleared { count: u32, points: u32 },
    /// Level went up
    LevelUp { level: u32 },
    Paused,
    Resumed,
    GameOver,
    Restarted,
    /// Score, total lines or level changed
    StatsChanged,
}
