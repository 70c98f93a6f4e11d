//! Shape module - boolean shape matrices and the canonical catalog
//!
//! A shape matrix is one orientation of a piece: a small row-major grid where
//! `true` marks a filled cell. Matrices live in a fixed 4x4 buffer with their
//! real dimensions tracked alongside, so a 1x4 bar and its 4x1 rotation are
//! distinct values while staying `Copy`.

use crate::error::RecordError;
use crate::types::PieceKind;

/// Largest supported matrix dimension
pub const MAX_SHAPE_DIM: usize = 4;

type Bits = [[u8; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];

/// One orientation of a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: u8,
    cols: u8,
    /// Cells outside `rows x cols` are always `false`.
    cells: [[bool; MAX_SHAPE_DIM]; MAX_SHAPE_DIM],
}

const fn build(rows: u8, cols: u8, bits: Bits) -> ShapeMatrix {
    let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
    let mut r = 0;
    while r < MAX_SHAPE_DIM {
        let mut c = 0;
        while c < MAX_SHAPE_DIM {
            cells[r][c] = bits[r][c] != 0 && r < rows as usize && c < cols as usize;
            c += 1;
        }
        r += 1;
    }
    ShapeMatrix { rows, cols, cells }
}

const I_SHAPE: ShapeMatrix = build(1, 4, [[1, 1, 1, 1], [0; 4], [0; 4], [0; 4]]);
const J_SHAPE: ShapeMatrix = build(2, 3, [[1, 0, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]);
const L_SHAPE: ShapeMatrix = build(2, 3, [[0, 0, 1, 0], [1, 1, 1, 0], [0; 4], [0; 4]]);
const O_SHAPE: ShapeMatrix = build(2, 2, [[1, 1, 0, 0], [1, 1, 0, 0], [0; 4], [0; 4]]);
const S_SHAPE: ShapeMatrix = build(2, 3, [[0, 1, 1, 0], [1, 1, 0, 0], [0; 4], [0; 4]]);
const T_SHAPE: ShapeMatrix = build(2, 3, [[0, 1, 0, 0], [1, 1, 1, 0], [0; 4], [0; 4]]);
const Z_SHAPE: ShapeMatrix = build(2, 3, [[1, 1, 0, 0], [0, 1, 1, 0], [0; 4], [0; 4]]);

impl ShapeMatrix {
    /// Spawn orientation of a canonical piece kind
    pub fn for_kind(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => I_SHAPE,
            PieceKind::J => J_SHAPE,
            PieceKind::L => L_SHAPE,
            PieceKind::O => O_SHAPE,
            PieceKind::S => S_SHAPE,
            PieceKind::T => T_SHAPE,
            PieceKind::Z => Z_SHAPE,
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Offsets `(dx, dy)` of every filled cell, row by row
    pub fn filled(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        (0..self.rows as usize).flat_map(move |r| {
            (0..self.cols as usize)
                .filter(move |&c| self.cells[r][c])
                .map(move |c| (c as i16, r as i16))
        })
    }

    /// 90° clockwise rotation: an R x C source becomes C x R with
    /// `result[j][i] = source[R-1-i][j]`.
    pub fn rotated(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (j, out_row) in cells.iter_mut().enumerate().take(cols) {
            for (i, out) in out_row.iter_mut().enumerate().take(rows) {
                *out = self.cells[rows - 1 - i][j];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Nested 0/1 rows, the persisted form
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows as usize)
            .map(|r| {
                (0..self.cols as usize)
                    .map(|c| u8::from(self.cells[r][c]))
                    .collect()
            })
            .collect()
    }

    /// Parse nested 0/1 rows, rejecting empty, ragged or oversized input
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self, RecordError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(RecordError::EmptyShape);
        }
        if rows.iter().any(|row| row.len() != cols) {
            return Err(RecordError::RaggedShape);
        }
        if rows.len() > MAX_SHAPE_DIM || cols > MAX_SHAPE_DIM {
            return Err(RecordError::ShapeTooLarge {
                rows: rows.len(),
                cols,
                max: MAX_SHAPE_DIM,
            });
        }

        let mut cells = [[false; MAX_SHAPE_DIM]; MAX_SHAPE_DIM];
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                cells[r][c] = match value {
                    0 => false,
                    1 => true,
                    other => return Err(RecordError::BadCellValue(other)),
                };
            }
        }

        Ok(Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            cells,
        })
    }
}
