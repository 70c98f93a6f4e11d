//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or holds the color of a
//! locked piece. Storage is a flat row-major array (no allocation on the hot
//! path). Coordinates are (x, y): x is the column 0..9 left to right, y is the
//! row 0..19 top to bottom.

use crate::error::RecordError;
use crate::piece::Piece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i16 || y < 0 || y >= BOARD_HEIGHT as i16 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// In bounds and empty
    pub fn is_empty_at(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// In bounds and filled
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Every filled cell of the piece lies inside the board (rows above the
    /// top edge included in "outside") on an empty board cell.
    pub fn is_valid_position(&self, piece: &Piece) -> bool {
        piece.cells().all(|(x, y)| self.is_empty_at(x, y))
    }

    /// Write the piece's color into every covered cell.
    ///
    /// Cells above the top edge are skipped; nothing outside the grid is ever
    /// written.
    pub fn place(&mut self, piece: &Piece) {
        for (x, y) in piece.cells() {
            if y < 0 {
                continue;
            }
            self.set(x, y, Some(piece.color));
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Remove row `y`, shifting every row above it down by one and leaving an
    /// empty row at the top.
    fn remove_row(&mut self, y: usize) {
        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * WIDTH;
            self.cells
                .copy_within(src_start..src_start + WIDTH, row * WIDTH);
        }
        for cell in &mut self.cells[..WIDTH] {
            *cell = None;
        }
    }

    /// Clear all full rows, scanning bottom to top, and return how many were
    /// removed.
    ///
    /// After a removal the same index is examined again, since the row that
    /// slid into it may be full as well.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = HEIGHT;
        while y > 0 {
            if self.is_row_full(y - 1) {
                self.remove_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Where `piece` would come to rest if dropped straight down.
    ///
    /// Works on a copy; the piece passed in is untouched.
    pub fn ghost_of(&self, piece: &Piece) -> Piece {
        let mut ghost = *piece;
        while self.is_valid_position(&ghost) {
            ghost.move_by(0, 1);
        }
        ghost.move_by(0, -1);
        ghost
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells = [None; BOARD_SIZE];
    }

    /// Row-major nested grid, the persisted form
    pub fn to_grid(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    /// Rebuild from a nested grid of exactly HEIGHT rows of WIDTH cells
    pub fn from_grid(grid: &[Vec<Cell>]) -> Result<Self, RecordError> {
        if grid.len() != HEIGHT {
            return Err(RecordError::BoardSize {
                rows: grid.len(),
                cols: grid.first().map(Vec::len).unwrap_or(0),
            });
        }
        if let Some(row) = grid.iter().find(|row| row.len() != WIDTH) {
            return Err(RecordError::BoardSize {
                rows: grid.len(),
                cols: row.len(),
            });
        }

        let mut board = Self::new();
        for (y, row) in grid.iter().enumerate() {
            board.cells[y * WIDTH..(y + 1) * WIDTH].copy_from_slice(row);
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
