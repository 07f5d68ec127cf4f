//! Diamond-grid isometric projection and its inverse.

use crate::error::{EditorError, Result};
use crate::model::{GridSize, TileCoord};

/// Sprite cell size of one tile, in world pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileMetrics {
    pub width: f64,
    pub height: f64,
}

impl TileMetrics {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(EditorError::Configuration {
                what: "tile size",
                width,
                height,
            });
        }
        Ok(Self { width, height })
    }
}

/// Maps grid `(x, y)` to the screen position of the tile's sprite origin.
pub fn project(x: u32, y: u32, tile_width: f64, tile_height: f64) -> (f64, f64) {
    let (x, y) = (x as f64, y as f64);
    ((x - y) * (tile_width / 2.0), (x + y) * (tile_height / 2.0))
}

/// Inverse of [`project`], in continuous grid units.
pub fn screen_to_grid(screen_x: f64, screen_y: f64, tile_width: f64, tile_height: f64) -> (f64, f64) {
    let diff = screen_x / (tile_width / 2.0);
    let sum = screen_y / (tile_height / 2.0);
    ((sum + diff) / 2.0, (sum - diff) / 2.0)
}

/// Nearest grid cell for a projected position, if it lies on the grid.
pub fn grid_cell_at(
    screen_x: f64,
    screen_y: f64,
    metrics: TileMetrics,
    size: GridSize,
) -> Option<TileCoord> {
    let (gx, gy) = screen_to_grid(screen_x, screen_y, metrics.width, metrics.height);
    let (gx, gy) = (gx.round(), gy.round());
    if gx < 0.0 || gy < 0.0 {
        return None;
    }
    let coord = TileCoord::new(gx as u32, gy as u32);
    size.contains(coord).then_some(coord)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_diamond_grid() {
        assert_eq!(project(0, 0, 93.0, 112.0), (0.0, 0.0));
        assert_eq!(project(1, 1, 93.0, 112.0), (0.0, 112.0));
        assert_eq!(project(2, 0, 93.0, 112.0), (93.0, 112.0));
        assert_eq!(project(0, 2, 93.0, 112.0), (-93.0, 112.0));
        assert_eq!(project(1, 0, 93.0, 112.0), (46.5, 56.0));
    }

    #[test]
    fn inverse_recovers_grid_coordinates() {
        let metrics = TileMetrics::new(93.0, 112.0).unwrap();
        let size = GridSize {
            width: 7,
            height: 5,
        };
        for y in 0..size.height {
            for x in 0..size.width {
                let (sx, sy) = project(x, y, metrics.width, metrics.height);
                assert_eq!(
                    grid_cell_at(sx, sy, metrics, size),
                    Some(TileCoord::new(x, y))
                );
                // Anywhere within a fraction of a tile still rounds back.
                assert_eq!(
                    grid_cell_at(sx + 10.0, sy - 12.0, metrics, size),
                    Some(TileCoord::new(x, y))
                );
            }
        }
    }

    #[test]
    fn off_grid_positions_have_no_cell() {
        let metrics = TileMetrics::new(93.0, 112.0).unwrap();
        let size = GridSize {
            width: 3,
            height: 3,
        };
        assert_eq!(grid_cell_at(0.0, -200.0, metrics, size), None);
        let (sx, sy) = project(3, 0, metrics.width, metrics.height);
        assert_eq!(grid_cell_at(sx, sy, metrics, size), None);
    }

    #[test]
    fn rejects_degenerate_tiles() {
        assert!(TileMetrics::new(0.0, 112.0).is_err());
        assert!(TileMetrics::new(93.0, -1.0).is_err());
        assert!(TileMetrics::new(f64::NAN, 1.0).is_err());
    }
}
