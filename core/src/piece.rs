use std::fmt;
use std::str::FromStr;

use crate::shape::{Outline, Rect};
use crate::topology::CellEdges;

/// Grid coordinate of a piece; its string form `"col-row"` is the stable id
/// used by snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    pub col: u32,
    pub row: u32,
}

impl PieceId {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    pub fn index(&self, size: u32) -> usize {
        (self.row * size + self.col) as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.col, self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceIdError;

impl fmt::Display for PieceIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("piece id must look like \"col-row\"")
    }
}

impl std::error::Error for PieceIdError {}

impl FromStr for PieceId {
    type Err = PieceIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (col, row) = value.trim().split_once('-').ok_or(PieceIdError)?;
        let col = col.parse().map_err(|_| PieceIdError)?;
        let row = row.parse().map_err(|_| PieceIdError)?;
        Ok(Self { col, row })
    }
}

#[derive(Clone, Debug)]
pub struct Piece {
    pub id: PieceId,
    pub width: f32,
    pub height: f32,
    pub correct_position: (f32, f32),
    pub current_position: (f32, f32),
    pub locked: bool,
    pub edges: CellEdges,
    pub outline: Outline,
    /// Source image region in image pixels, bleed included.
    pub sample_rect: Rect,
    /// Board-space offset of the sampled region relative to the piece's
    /// top-left corner; negative by the bleed.
    pub sample_offset: (f32, f32),
}

impl Piece {
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.current_position.0,
            self.current_position.1,
            self.width,
            self.height,
        )
    }

    pub fn center(&self) -> (f32, f32) {
        (
            self.current_position.0 + self.width * 0.5,
            self.current_position.1 + self.height * 0.5,
        )
    }

    /// Board-space rectangle the sampled image region is drawn into.
    pub fn draw_rect(&self) -> Rect {
        let bleed_x = -self.sample_offset.0;
        let bleed_y = -self.sample_offset.1;
        Rect::new(
            self.current_position.0 - bleed_x,
            self.current_position.1 - bleed_y,
            self.width + bleed_x * 2.0,
            self.height + bleed_y * 2.0,
        )
    }
}
