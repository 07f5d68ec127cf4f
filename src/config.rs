//! Startup configuration, read once from JSON.

use serde::Deserialize;

use crate::error::{EditorError, Result};
use crate::geometry::{TileMetrics, WorldLayout};
use crate::model::{Block, GridSize, default_blocks};
use crate::render::{DEFAULT_HIGHLIGHT, Rgb};
use crate::state::camera::ViewportOptions;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// `[width, height]` in tiles.
    pub grid_size: [u32; 2],
    /// `[screenWidth, screenHeight]` of the canvas in CSS pixels.
    pub viewport: [u32; 2],
    /// Draw hitbox outlines on top of the sprites.
    pub debug: bool,
    pub log_level: Option<String>,
    pub tile_width: f64,
    pub tile_height: f64,
    pub max_scale: f64,
    pub min_scale: f64,
    pub wheel_percent: f64,
    /// Velocity kept per 16 ms frame after a drag is released.
    pub friction: f64,
    /// Release speed (px/ms) below which the camera stops.
    pub min_speed: f64,
    /// `#rrggbb` multiplied into the hovered/selected tile's sprite.
    pub highlight_tint: String,
    pub blocks: Vec<Block>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: [10, 10],
            viewport: [1280, 720],
            debug: false,
            log_level: None,
            tile_width: 93.0,
            tile_height: 112.0,
            max_scale: 1.5,
            min_scale: 0.1,
            wheel_percent: 0.1,
            friction: 0.95,
            min_speed: 0.01,
            highlight_tint: DEFAULT_HIGHLIGHT.to_string(),
            blocks: default_blocks(),
        }
    }
}

impl EditorConfig {
    /// Deserializes without validating; missing keys take their defaults.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config = Self::parse(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let [w, h] = self.grid_size;
        if w == 0 || h == 0 {
            return Err(EditorError::Configuration {
                what: "grid size",
                width: w as f64,
                height: h as f64,
            });
        }
        let [sw, sh] = self.viewport;
        if sw == 0 || sh == 0 {
            return Err(EditorError::Configuration {
                what: "viewport",
                width: sw as f64,
                height: sh as f64,
            });
        }
        TileMetrics::new(self.tile_width, self.tile_height)?;
        if self.blocks.is_empty() {
            return Err(EditorError::Config("block catalog is empty".into()));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= self.max_scale) {
            return Err(EditorError::Config(format!(
                "zoom range {}..{} is empty",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(EditorError::Config(format!(
                "friction {} must be in (0, 1)",
                self.friction
            )));
        }
        if !(self.min_speed > 0.0) {
            return Err(EditorError::Config(format!(
                "minSpeed {} must be positive",
                self.min_speed
            )));
        }
        self.highlight()?;
        Ok(())
    }

    pub fn grid(&self) -> GridSize {
        GridSize {
            width: self.grid_size[0],
            height: self.grid_size[1],
        }
    }

    pub fn metrics(&self) -> Result<TileMetrics> {
        TileMetrics::new(self.tile_width, self.tile_height)
    }

    pub fn layout(&self) -> Result<WorldLayout> {
        Ok(WorldLayout::new(self.grid(), self.metrics()?))
    }

    pub fn highlight(&self) -> Result<Rgb> {
        Rgb::parse_hex(&self.highlight_tint)
    }

    pub fn max_log_level(&self) -> log::LevelFilter {
        let fallback = if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        self.log_level
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(fallback)
    }

    pub fn viewport_options(&self, layout: &WorldLayout) -> ViewportOptions {
        ViewportOptions {
            screen_width: self.viewport[0] as f64,
            screen_height: self.viewport[1] as f64,
            world_width: layout.world_width(),
            world_height: layout.world_height(),
            max_scale: self.max_scale,
            min_scale: self.min_scale,
            wheel_percent: self.wheel_percent,
            friction: self.friction,
            min_speed: self.min_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = EditorConfig::from_json("{}").unwrap();
        assert_eq!(cfg, EditorConfig::default());
        assert_eq!(cfg.blocks.len(), 14);
        assert_eq!(cfg.blocks[1].offset, -37.0);
        assert_eq!(cfg.blocks[1].hitbox_offset, 17.0);
    }

    #[test]
    fn default_grid_is_ten_by_ten() {
        let cfg = EditorConfig::default();
        assert_eq!(cfg.grid(), GridSize { width: 10, height: 10 });
        assert_eq!(cfg.highlight().unwrap(), Rgb { r: 0xcc, g: 0xcc, b: 0xcc });
    }

    #[test]
    fn reads_highlight_tint() {
        let cfg = EditorConfig::from_json(r##"{ "highlightTint": "#ff0000" }"##).unwrap();
        assert_eq!(cfg.highlight().unwrap(), Rgb { r: 0xff, g: 0, b: 0 });
        assert!(matches!(
            EditorConfig::from_json(r#"{ "highlightTint": "red" }"#),
            Err(EditorError::Config(_))
        ));
    }

    #[test]
    fn min_speed_must_be_positive() {
        for raw in [r#"{ "minSpeed": 0 }"#, r#"{ "minSpeed": -0.5 }"#] {
            assert!(matches!(EditorConfig::from_json(raw), Err(EditorError::Config(_))));
        }
    }

    #[test]
    fn reads_camel_case_keys() {
        let cfg = EditorConfig::from_json(
            r#"{
                "gridSize": [3, 4],
                "viewport": [800, 600],
                "debug": true,
                "maxScale": 2.0,
                "blocks": [{ "url": "/a.png" }, { "url": "/b.png", "offset": -5, "hitboxOffset": 3 }]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.grid(), GridSize { width: 3, height: 4 });
        assert_eq!(cfg.viewport, [800, 600]);
        assert_eq!(cfg.max_scale, 2.0);
        assert_eq!(cfg.blocks[1], Block::new("/b.png", -5.0, 3.0));
        assert_eq!(cfg.max_log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            EditorConfig::from_json(r#"{ "gridSize": [0, 4] }"#),
            Err(EditorError::Configuration { .. })
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "gridSize": [-1, 4] }"#),
            Err(EditorError::Config(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "tileWidth": 0 }"#),
            Err(EditorError::Configuration { .. })
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "blocks": [] }"#),
            Err(EditorError::Config(_))
        ));
        assert!(EditorConfig::from_json("not json").is_err());
    }

    #[test]
    fn parse_defers_validation() {
        let cfg = EditorConfig::parse(r#"{ "gridSize": [0, 4] }"#).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bundled_config_is_valid() {
        let cfg = EditorConfig::from_json(include_str!("../config.json")).unwrap();
        assert_eq!(cfg.grid_size, [20, 20]);
        assert_eq!(cfg.blocks, default_blocks());
    }

    #[test]
    fn explicit_log_level_wins() {
        let cfg = EditorConfig::from_json(r#"{ "debug": true, "logLevel": "warn" }"#).unwrap();
        assert_eq!(cfg.max_log_level(), log::LevelFilter::Warn);
    }
}
