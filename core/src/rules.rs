use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::*;

/// Shape parameters for piece outlines. Ratios are relative to the shorter
/// side of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSettings {
    pub tab_size: f32,
    pub jitter_range: f32,
    pub curve_detail: u32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            tab_size: TAB_SIZE_DEFAULT,
            jitter_range: JITTER_RANGE_DEFAULT,
            curve_detail: CURVE_DETAIL_DEFAULT,
        }
    }
}

impl ShapeSettings {
    pub fn clamped(self) -> Self {
        Self {
            tab_size: self.tab_size.clamp(TAB_SIZE_MIN, TAB_SIZE_MAX),
            jitter_range: self.jitter_range.clamp(JITTER_RANGE_MIN, JITTER_RANGE_MAX),
            curve_detail: self.curve_detail.clamp(CURVE_DETAIL_MIN, CURVE_DETAIL_MAX),
        }
    }

    /// Largest distance an outline can extend past its cell, as a ratio of the
    /// shorter cell side.
    pub fn max_extent_ratio(&self) -> f32 {
        self.tab_size + self.jitter_range
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayRules {
    pub snap_distance_ratio: f32,
    pub grab_margin_ratio: f32,
    pub win_delay_ms: u32,
}

impl Default for PlayRules {
    fn default() -> Self {
        Self {
            snap_distance_ratio: SNAP_DISTANCE_RATIO_DEFAULT,
            grab_margin_ratio: GRAB_MARGIN_RATIO_DEFAULT,
            win_delay_ms: WIN_DELAY_MS_DEFAULT,
        }
    }
}

impl PlayRules {
    pub fn clamped(self) -> Self {
        Self {
            snap_distance_ratio: self
                .snap_distance_ratio
                .clamp(SNAP_DISTANCE_RATIO_MIN, SNAP_DISTANCE_RATIO_MAX),
            grab_margin_ratio: self
                .grab_margin_ratio
                .clamp(GRAB_MARGIN_RATIO_MIN, GRAB_MARGIN_RATIO_MAX),
            win_delay_ms: self.win_delay_ms.min(WIN_DELAY_MS_MAX),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub piece_count: u32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub seed: u32,
    pub shape: ShapeSettings,
    pub rules: PlayRules,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            piece_count: 9,
            canvas_width: 600.0,
            canvas_height: 600.0,
            seed: PUZZLE_SEED,
            shape: ShapeSettings::default(),
            rules: PlayRules::default(),
        }
    }
}

impl BoardConfig {
    pub fn new(piece_count: u32, canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            piece_count,
            canvas_width,
            canvas_height,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Grid dimension for this configuration. Fails on anything that is not a
    /// positive perfect square or on a degenerate canvas.
    pub fn grid_size(&self) -> Result<u32, ConfigError> {
        if self.piece_count == 0 {
            return Err(ConfigError::EmptyPuzzle);
        }
        let size = grid_size_for_count(self.piece_count).ok_or(ConfigError::NotPerfectSquare {
            piece_count: self.piece_count,
        })?;
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(self.canvas_width) || !valid(self.canvas_height) {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config = BoardConfig::from_json(r#"{"piece_count": 16, "rules": {"win_delay_ms": 10}}"#)
            .expect("config");
        assert_eq!(config.piece_count, 16);
        assert_eq!(config.rules.win_delay_ms, 10);
        assert_eq!(config.rules.snap_distance_ratio, SNAP_DISTANCE_RATIO_DEFAULT);
        assert_eq!(config.shape, ShapeSettings::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = BoardConfig::from_json("{piece_count").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSettings(_)));
    }

    #[test]
    fn grid_size_rejects_bad_counts_and_canvas() {
        assert!(matches!(
            BoardConfig::new(10, 100.0, 100.0).grid_size(),
            Err(ConfigError::NotPerfectSquare { piece_count: 10 })
        ));
        assert!(matches!(
            BoardConfig::new(0, 100.0, 100.0).grid_size(),
            Err(ConfigError::EmptyPuzzle)
        ));
        assert!(matches!(
            BoardConfig::new(4, 0.0, 100.0).grid_size(),
            Err(ConfigError::InvalidCanvas { .. })
        ));
        assert_eq!(BoardConfig::new(25, 100.0, 100.0).grid_size().unwrap(), 5);
    }

    #[test]
    fn clamping_keeps_values_in_range() {
        let rules = PlayRules {
            snap_distance_ratio: 5.0,
            grab_margin_ratio: -1.0,
            win_delay_ms: 99_999,
        }
        .clamped();
        assert_eq!(rules.snap_distance_ratio, SNAP_DISTANCE_RATIO_MAX);
        assert_eq!(rules.grab_margin_ratio, GRAB_MARGIN_RATIO_MIN);
        assert_eq!(rules.win_delay_ms, WIN_DELAY_MS_MAX);
    }
}
