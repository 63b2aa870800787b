//! Pieces module - tetromino catalog, shape matrices and rotation with wall kicks
//!
//! Shapes are small 0/1 matrices anchored at their top-left corner. A piece's
//! shape is a plain value: every [`ActivePiece`] carries its own copy, so rotating
//! one piece can never alter the catalog or another piece.

use arrayvec::ArrayVec;

use crate::types::{Color, PieceKind};

/// Largest matrix side supported by [`Shape`]
pub const MAX_SHAPE_SIDE: usize = 4;

/// Maximum number of cells in a shape matrix
pub const MAX_SHAPE_CELLS: usize = MAX_SHAPE_SIDE * MAX_SHAPE_SIDE;

/// Offsets of filled cells, relative to the shape anchor (column, row)
pub type CellOffsets = ArrayVec<(i16, i16), MAX_SHAPE_CELLS>;

/// Positional offsets tried, in order, after a rotation.
///
/// The first entry is the unshifted position.
pub const WALL_KICKS: [(i16, i16); 8] = [
    (0, 0),
    (-1, 0),
    (1, 0),
    (-2, 0),
    (2, 0),
    (0, -1),
    (-1, -1),
    (1, -1),
];

/// A rectangular 0/1 matrix of at most 4x4 cells, stored row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [bool; MAX_SHAPE_CELLS],
}

impl Shape {
    /// Build a shape from the top-left `width x height` corner of `rows`.
    pub const fn new(width: u8, height: u8, rows: [[u8; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE]) -> Self {
        let mut cells = [false; MAX_SHAPE_CELLS];
        let mut row = 0;
        while row < height as usize {
            let mut col = 0;
            while col < width as usize {
                cells[row * width as usize + col] = rows[row][col] != 0;
                col += 1;
            }
            row += 1;
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the cell at (col, row) is filled. Out of range reads are empty.
    pub fn is_filled(&self, col: u8, row: u8) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }
        self.cells[row as usize * self.width as usize + col as usize]
    }

    /// Rotate 90° clockwise.
    ///
    /// Row `i` of the result is column `i` of `self` read bottom to top, so a
    /// `w x h` shape becomes `h x w`.
    pub fn rotated_cw(&self) -> Shape {
        let mut out = Shape {
            width: self.height,
            height: self.width,
            cells: [false; MAX_SHAPE_CELLS],
        };
        for row in 0..out.height {
            for col in 0..out.width {
                let filled = self.is_filled(row, self.height - 1 - col);
                out.cells[row as usize * out.width as usize + col as usize] = filled;
            }
        }
        out
    }

    /// Offsets of every filled cell, row by row
    pub fn offsets(&self) -> CellOffsets {
        let mut out = ArrayVec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                if self.is_filled(col, row) {
                    out.push((col as i16, row as i16));
                }
            }
        }
        out
    }

    /// Rows of the matrix, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        let len = self.width as usize * self.height as usize;
        self.cells[..len].chunks(self.width.max(1) as usize)
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceDef {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Color,
}

/// The seven piece definitions, in [`PieceKind::ALL`] order.
pub const CATALOG: [PieceDef; 7] = [
    PieceDef {
        kind: PieceKind::O,
        shape: Shape::new(2, 2, [[1, 1, 0, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
        color: Color::from_hex(0xFFD700),
    },
    PieceDef {
        kind: PieceKind::I,
        shape: Shape::new(4, 1, [[1, 1, 1, 1], [0; 4], [0; 4], [0; 4]]),
        color: Color::from_hex(0x00FFFF),
    },
    PieceDef {
        kind: PieceKind::S,
        shape: Shape::new(3, 2, [[0, 1, 1, 0], [1, 1, 0, 0], [0; 4], [0; 4]]),
        color: Color::from_hex(0xFF0000),
    },
    PieceDef {
        kind: PieceKind::Z,
        shape: Shape::new(3, 2, [[1, 1, 0, 0], [0, 1, 1, 0], [0; 4], [0; 4]]),
        color: Color::from_hex(0x32CD32),
    },
    PieceDef {
        kind: PieceKind::L,
        shape: Shape::new(3, 2, [[1, 0, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
        color: Color::from_hex(0xFFA500),
    },
    PieceDef {
        kind: PieceKind::J,
        shape: Shape::new(3, 2, [[0, 0, 1, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
        color: Color::from_hex(0xFF69B4),
    },
    PieceDef {
        kind: PieceKind::T,
        shape: Shape::new(3, 2, [[0, 1, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]),
        color: Color::from_hex(0x800080),
    },
];

/// Look up the catalog entry for a kind
pub fn definition(kind: PieceKind) -> &'static PieceDef {
    &CATALOG[kind.index()]
}

/// A piece in play: its own shape copy, color and anchor on the board.
///
/// `y` may be negative while the piece is still above the visible rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Color,
    pub x: i16,
    pub y: i16,
}

impl ActivePiece {
    /// Create a fresh instance of `kind` anchored at (x, y)
    pub fn spawn(kind: PieceKind, x: i16, y: i16) -> Self {
        let def = definition(kind);
        Self {
            kind,
            shape: def.shape,
            color: def.color,
            x,
            y,
        }
    }

    /// Absolute board coordinates of every filled cell
    pub fn cells(&self) -> CellOffsets {
        self.cells_at(self.x, self.y)
    }

    /// Board coordinates of every filled cell if the anchor were at (x, y)
    pub fn cells_at(&self, x: i16, y: i16) -> CellOffsets {
        self.shape
            .offsets()
            .into_iter()
            .map(|(dx, dy)| (x + dx, y + dy))
            .collect()
    }

    /// Same piece moved by (dx, dy)
    pub fn shifted(&self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Try to rotate a piece clockwise, applying the first wall kick that fits.
///
/// `collides(shape, x, y)` reports whether `shape` anchored at (x, y) overlaps
/// a wall, the floor or an occupied cell. Returns the rotated piece with the kick
/// offset already added to its anchor, or `None` when every kick collides (the
/// caller keeps the original piece untouched).
pub fn try_rotate(
    piece: &ActivePiece,
    collides: impl Fn(&Shape, i16, i16) -> bool,
) -> Option<ActivePiece> {
    let rotated = piece.shape.rotated_cw();

    for &(dx, dy) in WALL_KICKS.iter() {
        let x = piece.x + dx;
        let y = piece.y + dy;
        if !collides(&rotated, x, y) {
            return Some(ActivePiece {
                shape: rotated,
                x,
                y,
                ..*piece
            });
        }
    }

    None
}
