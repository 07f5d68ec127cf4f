//! Pointer hit polygons.
//!
//! Every tile shares one outline: the silhouette of an isometric block
//! filling the sprite cell. It is placed per tile by translation, so sprite
//! transparency never affects picking.

/// A six-point polygon in world pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Hitbox {
    points: [(f64, f64); 6],
}

/// Outline for a `tile_width` x `tile_height` cell, relative to its origin.
///
/// Clockwise from the top: upper face diamond plus the two vertical sides.
pub fn build_hitbox(tile_width: f64, tile_height: f64) -> Hitbox {
    let (w, h) = (tile_width, tile_height);
    Hitbox {
        points: [
            (w / 2.0, 0.0),
            (w, h / 4.0),
            (w, h * 3.0 / 4.0),
            (w / 2.0, h),
            (0.0, h * 3.0 / 4.0),
            (0.0, h / 4.0),
        ],
    }
}

impl Hitbox {
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Hitbox {
        Hitbox {
            points: self.points.map(|(x, y)| (x + dx, y + dy)),
        }
    }

    /// Even-odd rule; points exactly on an edge may go either way.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let (xi, yi) = self.points[i];
            let (xj, yj) = self.points[j];
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.points.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        )
    }
}
