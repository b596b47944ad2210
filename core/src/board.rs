use crate::error::ConfigError;
use crate::game::{distance, format_progress, scramble_layout, scramble_seed, SNAP_TOLERANCE};
use crate::order::PaintOrder;
use crate::piece::{Piece, PieceId};
use crate::rules::BoardConfig;
use crate::shape::{build_outline, Rect};
use crate::snapshot::{ImportReport, PieceRecord, SavedPuzzle, SAVED_PUZZLE_VERSION};
use crate::topology::Topology;

/// Pixel size of the loaded source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The piece store: pieces in grid order plus an explicit paint order.
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    image: ImageInfo,
    size: u32,
    piece_width: f32,
    piece_height: f32,
    pieces: Vec<Piece>,
    order: PaintOrder,
    scramble_nonce: u32,
}

impl Board {
    /// Builds every piece and shuffles them. Nothing is built if the
    /// configuration is rejected.
    pub fn new(image: ImageInfo, config: BoardConfig) -> Result<Self, ConfigError> {
        if image.width == 0 || image.height == 0 {
            return Err(ConfigError::MissingImage);
        }
        let size = config.grid_size()?;
        let config = BoardConfig {
            shape: config.shape.clamped(),
            rules: config.rules.clamped(),
            ..config
        };
        let piece_width = config.canvas_width / size as f32;
        let piece_height = config.canvas_height / size as f32;
        let cell_width = image.width as f32 / size as f32;
        let cell_height = image.height as f32 / size as f32;
        let scale_x = cell_width / piece_width;
        let scale_y = cell_height / piece_height;
        let bleed = config.shape.max_extent_ratio() * piece_width.min(piece_height);

        let topology = Topology::generate(size as usize, config.seed, config.shape.jitter_range);
        let mut pieces = Vec::with_capacity((size * size) as usize);
        for row in 0..size {
            for col in 0..size {
                let Some(edges) = topology.cell(col as usize, row as usize).copied() else {
                    continue;
                };
                let correct = (col as f32 * piece_width, row as f32 * piece_height);
                let sample_rect = Rect::new(
                    col as f32 * cell_width - bleed * scale_x,
                    row as f32 * cell_height - bleed * scale_y,
                    cell_width + bleed * scale_x * 2.0,
                    cell_height + bleed * scale_y * 2.0,
                );
                pieces.push(Piece {
                    id: PieceId::new(col, row),
                    width: piece_width,
                    height: piece_height,
                    correct_position: correct,
                    current_position: correct,
                    locked: false,
                    outline: build_outline(piece_width, piece_height, &edges, &config.shape),
                    edges,
                    sample_rect,
                    sample_offset: (-bleed, -bleed),
                });
            }
        }
        let total = pieces.len();
        let mut board = Self {
            config,
            image,
            size,
            piece_width,
            piece_height,
            pieces,
            order: PaintOrder::new(total),
            scramble_nonce: 0,
        };
        board.shuffle();
        log::info!(
            "board: {}x{} grid, piece {}x{}, seed {:#010x}",
            size,
            size,
            piece_width,
            piece_height,
            board.config.seed
        );
        Ok(board)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn image(&self) -> ImageInfo {
        self.image
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece_width(&self) -> f32 {
        self.piece_width
    }

    pub fn piece_height(&self) -> f32 {
        self.piece_height
    }

    pub fn canvas_size(&self) -> (f32, f32) {
        (self.config.canvas_width, self.config.canvas_height)
    }

    pub fn scramble_nonce(&self) -> u32 {
        self.scramble_nonce
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, index: usize) -> Option<&Piece> {
        self.pieces.get(index)
    }

    pub fn index_of(&self, id: PieceId) -> Option<usize> {
        if id.col >= self.size || id.row >= self.size {
            return None;
        }
        Some(id.index(self.size))
    }

    pub fn paint_order(&self) -> &PaintOrder {
        &self.order
    }

    /// Pieces bottom to top.
    pub fn pieces_in_paint_order(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.order.iter().filter_map(move |index| self.pieces.get(index))
    }

    /// Fresh-attempt scramble: random positions within the canvas, every piece
    /// unlocked, paint order permuted.
    pub fn shuffle(&mut self) {
        let nonce = self.scramble_nonce.wrapping_add(1);
        self.shuffle_with_nonce(nonce);
    }

    pub fn shuffle_with_nonce(&mut self, nonce: u32) {
        self.scramble_nonce = nonce;
        let seed = scramble_seed(self.config.seed, nonce, self.size as usize);
        let (positions, order) = scramble_layout(
            seed,
            self.pieces.len(),
            self.piece_width,
            self.piece_height,
            self.config.canvas_width,
            self.config.canvas_height,
        );
        for (piece, position) in self.pieces.iter_mut().zip(positions) {
            piece.current_position = position;
            piece.locked = false;
        }
        if let Some(order) = PaintOrder::from_order(order, self.pieces.len()) {
            self.order = order;
        }
    }

    /// One record per piece, in paint order.
    pub fn export_snapshot(&self) -> Vec<PieceRecord> {
        self.pieces_in_paint_order()
            .map(|piece| PieceRecord {
                id: piece.id.to_string(),
                x: piece.current_position.0,
                y: piece.current_position.1,
                locked: piece.locked,
            })
            .collect()
    }

    /// Applies records by id. Unknown ids and unusable positions are skipped;
    /// pieces without a record keep their state. Matched pieces take the
    /// records' relative paint order above the unmatched ones.
    pub fn import_snapshot(&mut self, records: &[PieceRecord]) -> ImportReport {
        let mut report = ImportReport::default();
        let mut rank: Vec<Option<usize>> = vec![None; self.pieces.len()];
        for (position, record) in records.iter().enumerate() {
            let Some(index) = record
                .id
                .parse::<PieceId>()
                .ok()
                .and_then(|id| self.index_of(id))
            else {
                log::warn!("snapshot: unknown piece id {:?}", record.id);
                report.skipped += 1;
                continue;
            };
            if !self.position_in_range(record.x, record.y) {
                log::warn!(
                    "snapshot: position out of range for {} ({}, {})",
                    record.id,
                    record.x,
                    record.y
                );
                report.skipped += 1;
                continue;
            }
            let piece = &mut self.pieces[index];
            piece.locked = record.locked;
            piece.current_position = if record.locked {
                piece.correct_position
            } else {
                (record.x, record.y)
            };
            rank[index] = Some(position);
            report.applied += 1;
        }
        self.order.sort_by_key(|index| rank.get(*index).copied().flatten());
        log::debug!(
            "snapshot: applied {} records, skipped {}",
            report.applied,
            report.skipped
        );
        report
    }

    fn position_in_range(&self, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let (width, height) = self.canvas_size();
        x >= -self.piece_width && x <= width && y >= -self.piece_height && y <= height
    }

    pub fn bring_to_front(&mut self, index: usize) -> bool {
        self.order.move_to_end(index)
    }

    /// Topmost unlocked piece whose grab box (bounds plus margin) contains the
    /// point.
    pub fn piece_at(&self, x: f32, y: f32) -> Option<usize> {
        let margin = self.piece_width * self.config.rules.grab_margin_ratio;
        self.order.iter().rev().find(|&index| {
            self.pieces
                .get(index)
                .is_some_and(|piece| !piece.locked && piece.bounds().expanded(margin).contains(x, y))
        })
    }

    /// Moves an unlocked piece. Locked pieces never move.
    pub fn set_position(&mut self, index: usize, position: (f32, f32)) -> bool {
        match self.pieces.get_mut(index) {
            Some(piece) if !piece.locked => {
                piece.current_position = position;
                true
            }
            _ => false,
        }
    }

    /// Places a piece at its correct position and locks it. Returns false if it
    /// was already locked.
    pub fn lock_in_place(&mut self, index: usize) -> bool {
        match self.pieces.get_mut(index) {
            Some(piece) if !piece.locked => {
                piece.current_position = piece.correct_position;
                piece.locked = true;
                true
            }
            _ => false,
        }
    }

    pub fn distance_to_target(&self, index: usize) -> Option<f32> {
        self.pieces
            .get(index)
            .map(|piece| distance(piece.current_position, piece.correct_position))
    }

    /// Exclusive snap radius. A drop locks only when strictly closer than this.
    pub fn snap_distance(&self) -> f32 {
        self.piece_width * self.config.rules.snap_distance_ratio * (1.0 - SNAP_TOLERANCE)
    }

    pub fn within_snap(&self, index: usize) -> bool {
        self.distance_to_target(index)
            .is_some_and(|distance| distance < self.snap_distance())
    }

    pub fn is_locked(&self, index: usize) -> bool {
        self.pieces.get(index).is_some_and(|piece| piece.locked)
    }

    pub fn is_solved(&self) -> bool {
        !self.pieces.is_empty() && self.pieces.iter().all(|piece| piece.locked)
    }

    pub fn locked_count(&self) -> usize {
        self.pieces.iter().filter(|piece| piece.locked).count()
    }

    pub fn unlocked(&self) -> Vec<usize> {
        self.pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| !piece.locked)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.locked_count(), self.pieces.len())
    }

    pub fn progress_label(&self) -> String {
        let (locked, total) = self.progress();
        format_progress(locked, total)
    }

    pub fn to_saved(&self) -> SavedPuzzle {
        SavedPuzzle {
            version: SAVED_PUZZLE_VERSION,
            seed: self.config.seed,
            piece_count: self.pieces.len() as u32,
            image_width: self.image.width,
            image_height: self.image.height,
            records: self.export_snapshot(),
        }
    }

    /// Whether a saved puzzle was taken from a board with the same shapes.
    pub fn matches_saved(&self, saved: &SavedPuzzle) -> bool {
        saved.seed == self.config.seed
            && saved.piece_count as usize == self.pieces.len()
            && saved.image_width == self.image.width
            && saved.image_height == self.image.height
    }
}
