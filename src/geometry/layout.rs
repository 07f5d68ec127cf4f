//! World sizing and per-tile placement on top of the projection.

use crate::geometry::hitbox::{Hitbox, build_hitbox};
use crate::geometry::projection::{TileMetrics, project};
use crate::model::{Grid, GridSize, Tile, TileCoord};

/// Placement rules for one grid size and tile size.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldLayout {
    metrics: TileMetrics,
    size: GridSize,
    padding_x: f64,
    padding_y: f64,
    hitbox: Hitbox,
}

impl WorldLayout {
    pub fn new(size: GridSize, metrics: TileMetrics) -> Self {
        Self {
            metrics,
            size,
            // The leftmost projected column sits at negative x.
            padding_x: metrics.width * (size.width as f64 - 1.0),
            // Keeps the top row inside the world.
            padding_y: metrics.height,
            hitbox: build_hitbox(metrics.width, metrics.height),
        }
    }

    pub fn metrics(&self) -> TileMetrics {
        self.metrics
    }

    pub fn grid_size(&self) -> GridSize {
        self.size
    }

    pub fn world_width(&self) -> f64 {
        self.size.width as f64 * self.metrics.width
    }

    pub fn world_height(&self) -> f64 {
        self.size.height as f64 * (self.metrics.height / 2.0) + self.padding_y
    }

    pub fn center(&self) -> (f64, f64) {
        (self.world_width() / 2.0, self.world_height() / 2.0)
    }

    /// Projected position shifted by half the padding, before block offsets.
    pub fn tile_origin(&self, coord: TileCoord) -> (f64, f64) {
        let (iso_x, iso_y) = project(coord.x, coord.y, self.metrics.width, self.metrics.height);
        (iso_x + self.padding_x / 2.0, iso_y + self.padding_y / 2.0)
    }

    pub fn sprite_position(&self, tile: &Tile) -> (f64, f64) {
        let (x, y) = self.tile_origin(tile.coord());
        (x, y + tile.block.offset)
    }

    pub fn hitbox_position(&self, tile: &Tile) -> (f64, f64) {
        let (x, y) = self.sprite_position(tile);
        (x, y + tile.block.hitbox_offset)
    }

    pub fn placed_hitbox(&self, tile: &Tile) -> Hitbox {
        let (x, y) = self.hitbox_position(tile);
        self.hitbox.translated(x, y)
    }

    /// Topmost tile whose hit polygon contains the world point.
    pub fn pick(&self, grid: &Grid, world_x: f64, world_y: f64) -> Option<TileCoord> {
        grid.draw_order()
            .into_iter()
            .rev()
            .find(|tile| self.placed_hitbox(tile).contains(world_x, world_y))
            .map(Tile::coord)
    }
}
