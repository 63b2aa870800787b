//! Board module - manages the game grid
//!
//! The board is a `width x height` grid where each cell is empty or holds a color.
//! Cells live in one flat row-major vector sized at construction; the dimensions
//! never change afterwards.
//! Coordinates: (x, y) where x grows to the right and y grows downwards from row 0
//! at the top. Rows above the board (y < 0) are open space.

use crate::config::{check_dimensions, ConfigError};
use crate::pieces::{ActivePiece, Shape};
use crate::types::Cell;

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. Zero or oversized dimensions are rejected.
    pub fn new(width: u16, height: u16) -> Result<Self, ConfigError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Collision query for a single cell.
    ///
    /// True when the cell holds a color, or when (x, y) is left of, right of or
    /// below the grid. Positions above the top row are never occupied.
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        if x < 0 || x >= self.width as i16 || y >= self.height as i16 {
            return true;
        }
        if y < 0 {
            return false;
        }
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether `shape` anchored at (x, y) overlaps a wall, the floor or a filled cell
    pub fn collides(&self, shape: &Shape, x: i16, y: i16) -> bool {
        shape
            .offsets()
            .iter()
            .any(|&(dx, dy)| self.is_occupied(x + dx, y + dy))
    }

    /// Whether the piece at its current anchor collides
    pub fn piece_collides(&self, piece: &ActivePiece) -> bool {
        self.collides(&piece.shape, piece.x, piece.y)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of row `y`. Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = self.width as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Write the piece's filled cells into the grid with the piece color.
    ///
    /// Cells whose row is still above the board are dropped. Returns how many
    /// cells were written.
    pub fn merge(&mut self, piece: &ActivePiece) -> usize {
        let mut written = 0;
        for (x, y) in piece.cells() {
            if self.set(x, y, Some(piece.color)) {
                written += 1;
            }
        }
        written
    }

    /// Remove every full row and return how many were removed.
    ///
    /// Rows are scanned bottom to top. Surviving rows are compacted downwards in
    /// place and the freed rows at the top become empty, so contiguous and
    /// non-contiguous full rows are handled in a single pass.
    pub fn clear_full_lines(&mut self) -> usize {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut cleared = 0;
        let mut write_y = height;

        for read_y in (0..height).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    let dst_start = write_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, dst_start);
                }
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = None;
        }

        cleared
    }

    /// True iff any cell in row 0 is occupied
    pub fn top_row_occupied(&self) -> bool {
        self.row(0).iter().any(|cell| cell.is_some())
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Fraction of cells that are occupied, in `[0, 1]`
    pub fn occupancy(&self) -> f64 {
        self.filled_count() as f64 / self.cells.len() as f64
    }

    /// Empty every cell, keeping the dimensions
    pub fn reset(&mut self) {
        self.cells.fill(None);
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}
