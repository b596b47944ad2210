pub const PUZZLE_SEED: u32 = 0x5EED_2520;

pub const DIR_TOP: usize = 0;
pub const DIR_RIGHT: usize = 1;
pub const DIR_BOTTOM: usize = 2;
pub const DIR_LEFT: usize = 3;

pub const SNAP_DISTANCE_RATIO_DEFAULT: f32 = 0.30;
pub const SNAP_DISTANCE_RATIO_MIN: f32 = 0.05;
pub const SNAP_DISTANCE_RATIO_MAX: f32 = 0.50;
/// Relative slack taken off the snap radius so float rounding of
/// `width * ratio` never lets a drop exactly on the radius lock.
pub const SNAP_TOLERANCE: f32 = 1e-4;

pub const GRAB_MARGIN_RATIO_DEFAULT: f32 = 0.10;
pub const GRAB_MARGIN_RATIO_MIN: f32 = 0.0;
pub const GRAB_MARGIN_RATIO_MAX: f32 = 0.30;

pub const WIN_DELAY_MS_DEFAULT: u32 = 1500;
pub const WIN_DELAY_MS_MAX: u32 = 10_000;

pub const TAB_SIZE_DEFAULT: f32 = 0.20;
pub const TAB_SIZE_MIN: f32 = 0.08;
pub const TAB_SIZE_MAX: f32 = 0.28;
pub const JITTER_RANGE_DEFAULT: f32 = 0.02;
pub const JITTER_RANGE_MIN: f32 = 0.0;
pub const JITTER_RANGE_MAX: f32 = 0.05;
pub const CURVE_DETAIL_DEFAULT: u32 = 12;
pub const CURVE_DETAIL_MIN: u32 = 2;
pub const CURVE_DETAIL_MAX: u32 = 64;

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

pub fn rand_range(seed: u32, salt: u32, min: f32, max: f32) -> f32 {
    min + (max - min) * rand_unit(seed, salt)
}

pub fn cell_seed(base: u32, col: u32, row: u32) -> u32 {
    base ^ row.wrapping_mul(0x85EB_CA6B) ^ col.wrapping_mul(0xC2B2_AE35)
}

pub fn scramble_seed(base: u32, nonce: u32, size: usize) -> u32 {
    base ^ nonce.wrapping_mul(0x9E37_79B9) ^ (size as u32) ^ 0x5CA7_7EED
}

pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

/// Exact integer square root of a piece count, if it is a perfect square.
pub fn grid_size_for_count(piece_count: u32) -> Option<u32> {
    if piece_count == 0 {
        return None;
    }
    let mut root = (piece_count as f64).sqrt() as u32;
    while root.saturating_mul(root) > piece_count {
        root -= 1;
    }
    while (root + 1).saturating_mul(root + 1) <= piece_count {
        root += 1;
    }
    (root * root == piece_count).then_some(root)
}

/// Random top-left positions for `total` pieces within the given bounds, and a
/// shuffled paint order. Deterministic for a given seed.
pub fn scramble_layout(
    seed: u32,
    total: usize,
    piece_width: f32,
    piece_height: f32,
    bounds_width: f32,
    bounds_height: f32,
) -> (Vec<(f32, f32)>, Vec<usize>) {
    let max_x = (bounds_width - piece_width).max(0.0);
    let max_y = (bounds_height - piece_height).max(0.0);

    let mut positions = Vec::with_capacity(total);
    for id in 0..total {
        let salt = (id as u32) << 1;
        let x = rand_range(seed, salt, 0.0, max_x);
        let y = rand_range(seed, salt + 1, 0.0, max_y);
        positions.push((x, y));
    }

    let mut order: Vec<usize> = (0..total).collect();
    for i in (1..order.len()).rev() {
        let salt = 0xC0DE_u32 + i as u32;
        let j = ((rand_unit(seed, salt) * (i as f32 + 1.0)) as usize).min(i);
        order.swap(i, j);
    }
    (positions, order)
}

pub fn format_progress(count: usize, total: usize) -> String {
    if total == 0 {
        return "--".to_string();
    }
    let pct = (count as f32 / total as f32) * 100.0;
    format!("{:.0}%", pct)
}
