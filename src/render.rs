//! Per-frame draw requests. The canvas layer rasterizes these verbatim.

use std::fmt;

use crate::error::{EditorError, Result};
use crate::geometry::WorldLayout;
use crate::state::EditorState;

/// Highlight colour; multiplied into a sprite's pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Light grey; dims a sprite to 80%.
pub const DEFAULT_HIGHLIGHT: Rgb = Rgb {
    r: 0xcc,
    g: 0xcc,
    b: 0xcc,
};

impl Rgb {
    /// Parses `#rrggbb`.
    pub fn parse_hex(raw: &str) -> Result<Self> {
        let bad = || EditorError::Config(format!("highlight tint {raw:?} is not #rrggbb"));
        let hex = raw.strip_prefix('#').ok_or_else(bad)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(bad());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Default,
    Highlighted,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A tile sprite at its world position (top-left corner).
    Sprite {
        url: String,
        x: f64,
        y: f64,
        tint: Tint,
    },
    /// Debug outline of a placed hit polygon.
    HitboxOutline { points: Vec<(f64, f64)> },
}

/// Back-to-front draw list for the current state.
pub fn frame_commands(state: &EditorState, layout: &WorldLayout, debug: bool) -> Vec<DrawCommand> {
    let tiles = state.grid.draw_order();
    let mut out = Vec::with_capacity(tiles.len() * if debug { 2 } else { 1 });
    for tile in &tiles {
        let (x, y) = layout.sprite_position(tile);
        let tint = if state.is_highlighted(tile.coord()) {
            Tint::Highlighted
        } else {
            Tint::Default
        };
        out.push(DrawCommand::Sprite {
            url: tile.block.url.clone(),
            x,
            y,
            tint,
        });
    }
    // Outlines go on top so tall sprites cannot hide them.
    if debug {
        out.extend(tiles.iter().map(|tile| DrawCommand::HitboxOutline {
            points: layout.placed_hitbox(tile).points().to_vec(),
        }));
    }
    out
}
