//! Core data model for the isometric editor: blocks, tiles and the grid.
//!
//! The grid is an immutable snapshot. Edits produce a new `Grid`, so the
//! renderer and the hit-tester can keep reading the previous one.

use serde::Deserialize;
use std::rc::Rc;

use crate::error::{EditorError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Grid coordinate of a tile. Also the tile's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Painter's order key: larger keys are drawn later, i.e. in front.
    pub fn depth(&self) -> (u32, u32) {
        (self.x + self.y, self.x)
    }
}

/// A placeable tile type.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Sprite asset reference, passed through to the renderer untouched.
    pub url: String,
    /// Vertical shift of the sprite, negative for tall sprites.
    #[serde(default)]
    pub offset: f64,
    /// Vertical shift of the hit polygon, applied on top of `offset`.
    #[serde(default)]
    pub hitbox_offset: f64,
}

impl Block {
    pub fn new(url: impl Into<String>, offset: f64, hitbox_offset: f64) -> Self {
        Self {
            url: url.into(),
            offset,
            hitbox_offset,
        }
    }
}

/// The catalog shipped with the editor.
pub fn default_blocks() -> Vec<Block> {
    vec![
        Block::new("/img/iso/block.png", 0.0, 0.0),
        Block::new("/img/iso/tree-point.png", -37.0, 17.0),
        Block::new("/img/iso/tree-block.png", -37.0, 21.0),
        Block::new("/img/iso/bush.png", 0.0, 21.0),
        Block::new("/img/iso/water-3.png", 0.0, 21.0),
        Block::new("/img/iso/house.png", -22.0, 21.0),
        Block::new("/img/iso/mansion-1.png", -19.0, 19.0),
        Block::new("/img/iso/mansion-2.png", -28.0, 21.0),
        Block::new("/img/iso/road-l.png", 0.0, 0.0),
        Block::new("/img/iso/road-r.png", 0.0, 0.0),
        Block::new("/img/iso/road-corner-ru.png", 0.0, 0.0),
        Block::new("/img/iso/road-corner-rd.png", 0.0, 0.0),
        Block::new("/img/iso/road-corner-lu.png", 0.0, 0.0),
        Block::new("/img/iso/road-corner-ld.png", 0.0, 0.0),
    ]
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub block: Rc<Block>,
}

impl Tile {
    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: GridSize,
    /// Row-major tiles; length = width * height.
    tiles: Rc<[Tile]>,
}

/// Builds a `width` x `height` grid with every tile set to `default_block`.
pub fn generate_grid(width: u32, height: u32, default_block: Rc<Block>) -> Result<Grid> {
    if width == 0 || height == 0 {
        return Err(EditorError::Configuration {
            what: "grid size",
            width: width as f64,
            height: height as f64,
        });
    }
    let size = GridSize { width, height };
    let mut tiles = Vec::with_capacity(size.tile_count());
    for y in 0..height {
        for x in 0..width {
            tiles.push(Tile {
                x,
                y,
                block: default_block.clone(),
            });
        }
    }
    log::info!("generated {}x{} grid ({} tiles)", width, height, tiles.len());
    Ok(Grid {
        size,
        tiles: tiles.into(),
    })
}

impl Grid {
    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        self.size.contains(coord)
    }

    fn index_of(&self, coord: TileCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| (coord.y * self.size.width + coord.x) as usize)
    }

    pub fn get(&self, coord: TileCoord) -> Option<&Tile> {
        self.index_of(coord).map(|i| &self.tiles[i])
    }

    /// Tiles in back-to-front order.
    pub fn draw_order(&self) -> Vec<&Tile> {
        let mut ordered: Vec<&Tile> = self.tiles.iter().collect();
        ordered.sort_by_key(|t| t.coord().depth());
        ordered
    }

    /// Returns a new grid where the tile at `(x, y)` carries `block`.
    ///
    /// Every other tile is shared with `self`; `self` is left untouched.
    pub fn set_block(&self, x: u32, y: u32, block: Rc<Block>) -> Result<Grid> {
        let coord = TileCoord::new(x, y);
        let Some(idx) = self.index_of(coord) else {
            return Err(EditorError::OutOfRange {
                x,
                y,
                width: self.size.width,
                height: self.size.height,
            });
        };
        let tiles: Vec<Tile> = self
            .tiles
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i == idx {
                    Tile {
                        block: block.clone(),
                        ..t.clone()
                    }
                } else {
                    t.clone()
                }
            })
            .collect();
        Ok(Grid {
            size: self.size,
            tiles: tiles.into(),
        })
    }
}
