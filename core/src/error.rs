#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("piece count {piece_count} is not a perfect square")]
    NotPerfectSquare { piece_count: u32 },
    #[error("puzzle has no pieces")]
    EmptyPuzzle,
    #[error("puzzle image is missing or has no pixels")]
    MissingImage,
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f32, height: f32 },
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not a record list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved puzzle could not be decoded")]
    Decode,
    #[error("saved puzzle could not be encoded")]
    Encode,
    #[error("saved puzzle version {found} does not match {expected}")]
    Version { found: u32, expected: u32 },
}
