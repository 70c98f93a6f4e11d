//! Piece module - a movable shape instance
//!
//! A piece is a shape matrix, a color and the board coordinates of the
//! matrix's top-left corner. It has no board reference: legality is always
//! checked by the caller against a [`Board`](crate::Board).

use rand::Rng;

use crate::error::RecordError;
use crate::record::PieceRecord;
use crate::shape::ShapeMatrix;
use crate::types::{PieceColor, PieceKind, BOARD_WIDTH};

/// Largest origin magnitude accepted from a persisted record
const MAX_RECORD_ORIGIN: i32 = 64;

/// Active or preview piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub shape: ShapeMatrix,
    pub color: PieceColor,
    /// Column of the matrix's top-left cell
    pub col: i16,
    /// Row of the matrix's top-left cell (0 = top of the board)
    pub row: i16,
}

impl Piece {
    /// Create a piece of the given kind at its spawn position
    pub fn new(kind: PieceKind) -> Self {
        let shape = ShapeMatrix::for_kind(kind);
        Self {
            shape,
            color: kind.color(),
            col: spawn_col(&shape),
            row: 0,
        }
    }

    /// Pick one of the seven kinds uniformly
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = PieceKind::ALL[rng.gen_range(0..PieceKind::ALL.len())];
        Self::new(kind)
    }

    /// Move back to the spawn column/row for the current orientation
    pub fn reset_to_spawn(&mut self) {
        self.col = spawn_col(&self.shape);
        self.row = 0;
    }

    /// Rotate the shape 90° clockwise in place. Position is unchanged.
    pub fn rotate(&mut self) {
        self.shape = self.shape.rotated();
    }

    /// Translate the origin. No validation.
    pub fn move_by(&mut self, d_col: i16, d_row: i16) {
        self.col += d_col;
        self.row += d_row;
    }

    /// Absolute `(x, y)` board coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.shape
            .filled()
            .map(move |(dx, dy)| (self.col + dx, self.row + dy))
    }

    pub fn to_record(&self) -> PieceRecord {
        PieceRecord {
            shape: self.shape.to_rows(),
            color: self.color,
            col: i32::from(self.col),
            row: i32::from(self.row),
        }
    }

    pub fn from_record(record: &PieceRecord) -> Result<Self, RecordError> {
        let shape = ShapeMatrix::from_rows(&record.shape)?;
        if record.col.abs() > MAX_RECORD_ORIGIN || record.row.abs() > MAX_RECORD_ORIGIN {
            return Err(RecordError::OriginOutOfRange {
                col: record.col,
                row: record.row,
            });
        }
        Ok(Self {
            shape,
            color: record.color,
            col: record.col as i16,
            row: record.row as i16,
        })
    }
}

/// Horizontally centered spawn column: `floor((WIDTH - shape_cols) / 2)`
pub fn spawn_col(shape: &ShapeMatrix) -> i16 {
    (BOARD_WIDTH as i16 - shape.cols() as i16).div_euclid(2)
}
