// Touch gesture state: one finger pans, two fingers pinch-zoom.
use crate::state::camera::Camera;

/// Snapshot taken when the second finger lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchGesture {
    pub start_dist: f64,
    pub start_zoom: f64,
    pub world_center_x: f64,
    pub world_center_y: f64,
}

#[derive(Default, Debug, Clone)]
pub struct TouchState {
    pub single_active: bool,
    pub pinch: Option<PinchGesture>,
}

/// Distance and midpoint of two touch points, in canvas pixels.
pub fn span(a: (f64, f64), b: (f64, f64)) -> (f64, (f64, f64)) {
    let dist = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt().max(1.0);
    (dist, ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5))
}

impl TouchState {
    pub fn start_pinch(&mut self, cam: &Camera, a: (f64, f64), b: (f64, f64)) {
        let (dist, (mx, my)) = span(a, b);
        let (wx, wy) = cam.screen_to_world(mx, my);
        self.single_active = false;
        self.pinch = Some(PinchGesture {
            start_dist: dist,
            start_zoom: cam.zoom(),
            world_center_x: wx,
            world_center_y: wy,
        });
    }

    /// Scales by the finger-distance ratio, keeping the pinched world point
    /// under the current midpoint.
    pub fn update_pinch(&self, cam: &mut Camera, a: (f64, f64), b: (f64, f64)) -> bool {
        let Some(p) = self.pinch else {
            return false;
        };
        let (dist, (mx, my)) = span(a, b);
        let zoom = p.start_zoom * dist / p.start_dist;
        cam.pin_world_point(p.world_center_x, p.world_center_y, zoom, mx, my);
        true
    }

    pub fn end(&mut self, remaining: u32) {
        match remaining {
            0 => {
                self.single_active = false;
                self.pinch = None;
            }
            1 => {
                self.pinch = None;
                self.single_active = true;
            }
            _ => {}
        }
    }
}
