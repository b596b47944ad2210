use crate::codec::{decode, encode};
use crate::error::SnapshotError;

pub const SAVED_PUZZLE_VERSION: u32 = 1;

/// One piece in a persisted snapshot. `id` is the `"col-row"` grid id.
#[derive(
    Debug,
    Clone,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    rkyv::Archive,
    rkyv::Serialize,
    rkyv::Deserialize,
)]
pub struct PieceRecord {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub locked: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub applied: usize,
    pub skipped: usize,
}

pub fn records_to_json(records: &[PieceRecord]) -> String {
    serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string())
}

/// Parses a record list, dropping entries that are not well-formed records
/// instead of failing the whole list.
pub fn records_from_json(raw: &str) -> Result<Vec<PieceRecord>, SnapshotError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let total = values.len();
    let records: Vec<PieceRecord> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if records.len() != total {
        log::warn!(
            "snapshot: dropped {} malformed records",
            total - records.len()
        );
    }
    Ok(records)
}

/// Everything needed to rebuild an in-progress puzzle: the board inputs plus
/// the piece records.
#[derive(Debug, Clone, PartialEq, rkyv::Archive, rkyv::Serialize, rkyv::Deserialize)]
pub struct SavedPuzzle {
    pub version: u32,
    pub seed: u32,
    pub piece_count: u32,
    pub image_width: u32,
    pub image_height: u32,
    pub records: Vec<PieceRecord>,
}

impl SavedPuzzle {
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        encode(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let saved: SavedPuzzle = decode(bytes)?;
        if saved.version != SAVED_PUZZLE_VERSION {
            return Err(SnapshotError::Version {
                found: saved.version,
                expected: SAVED_PUZZLE_VERSION,
            });
        }
        Ok(saved)
    }

    /// Every piece locked. A finished save has nothing left to resume.
    pub fn is_finished(&self) -> bool {
        self.records.len() == self.piece_count as usize
            && self.records.iter().all(|record| record.locked)
    }
}
