//! Viewport camera: pan, wheel/pinch zoom, clamping and post-drag glide.
//!
//! Screen and world are related by `screen = world * zoom + offset`.

use std::collections::VecDeque;

/// Drag samples older than this (ms) do not contribute to release velocity.
const RELEASE_WINDOW_MS: f64 = 100.0;
/// `friction` is expressed per frame of this length (ms).
const FRAME_MS: f64 = 16.0;
/// Longest step (ms) a single tick integrates.
const MAX_TICK_MS: f64 = 4.0 * FRAME_MS;
/// Pixels per line for `WheelEvent.deltaMode == DOM_DELTA_LINE`.
const WHEEL_LINE_HEIGHT: f64 = 20.0;
const WHEEL_STEP_DIVISOR: f64 = 500.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportOptions {
    pub screen_width: f64,
    pub screen_height: f64,
    pub world_width: f64,
    pub world_height: f64,
    pub max_scale: f64,
    pub min_scale: f64,
    pub wheel_percent: f64,
    pub friction: f64,
    pub min_speed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragSample {
    offset_x: f64,
    offset_y: f64,
    time: f64,
}

#[derive(Debug, Clone)]
pub struct Camera {
    zoom: f64,
    offset_x: f64,
    offset_y: f64,
    panning: bool,
    last_x: f64,
    last_y: f64,
    initialized: bool,
    velocity_x: f64,
    velocity_y: f64,
    samples: VecDeque<DragSample>,
    pending_center: bool,
    destroyed: bool,
    options: ViewportOptions,
}

impl Camera {
    pub fn new(options: ViewportOptions) -> Self {
        let mut cam = Self {
            zoom: 1.0_f64.clamp(options.min_scale, options.max_scale),
            offset_x: 0.0,
            offset_y: 0.0,
            panning: false,
            last_x: 0.0,
            last_y: 0.0,
            initialized: false,
            velocity_x: 0.0,
            velocity_y: 0.0,
            samples: VecDeque::new(),
            pending_center: false,
            destroyed: false,
            options,
        };
        cam.clamp();
        cam
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.velocity_x, self.velocity_y)
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.offset_x) / self.zoom, (sy - self.offset_y) / self.zoom)
    }

    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (wx * self.zoom + self.offset_x, wy * self.zoom + self.offset_y)
    }

    /// Visible world rectangle as `(x, y, width, height)`.
    pub fn visible_rect(&self) -> (f64, f64, f64, f64) {
        let (x, y) = self.screen_to_world(0.0, 0.0);
        (
            x,
            y,
            self.options.screen_width / self.zoom,
            self.options.screen_height / self.zoom,
        )
    }

    pub fn begin_drag(&mut self, sx: f64, sy: f64, now: f64) {
        if self.destroyed {
            return;
        }
        self.panning = true;
        self.last_x = sx;
        self.last_y = sy;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
        self.samples.clear();
        self.record_sample(now);
    }

    pub fn drag_to(&mut self, sx: f64, sy: f64, now: f64) {
        if !self.panning {
            return;
        }
        self.offset_x += sx - self.last_x;
        self.offset_y += sy - self.last_y;
        self.last_x = sx;
        self.last_y = sy;
        self.clamp();
        self.record_sample(now);
    }

    /// Ends the drag and derives the glide velocity (px/ms) from recent samples.
    pub fn end_drag(&mut self, now: f64) {
        if !self.panning {
            return;
        }
        self.panning = false;
        if let Some(s) = self
            .samples
            .iter()
            .find(|s| s.time >= now - RELEASE_WINDOW_MS)
            .copied()
        {
            let dt = now - s.time;
            if dt > 0.0 {
                self.velocity_x = (self.offset_x - s.offset_x) / dt;
                self.velocity_y = (self.offset_y - s.offset_y) / dt;
            }
        }
        self.samples.clear();
        log::debug!(
            "drag released at velocity ({:.3}, {:.3}) px/ms",
            self.velocity_x,
            self.velocity_y
        );
    }

    fn record_sample(&mut self, now: f64) {
        self.samples.push_back(DragSample {
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            time: now,
        });
        while self
            .samples
            .front()
            .is_some_and(|s| s.time < now - RELEASE_WINDOW_MS)
        {
            self.samples.pop_front();
        }
    }

    /// Applies a wheel (or trackpad pinch) event at screen point `(sx, sy)`.
    pub fn wheel(&mut self, delta_y: f64, delta_mode: u32, sx: f64, sy: f64) {
        let unit = if delta_mode == 1 { WHEEL_LINE_HEIGHT } else { 1.0 };
        let step = -delta_y * unit / WHEEL_STEP_DIVISOR;
        let factor = 2f64.powf((1.0 + self.options.wheel_percent) * step);
        self.zoom_at(factor, sx, sy);
    }

    pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) {
        self.set_zoom_at(self.zoom * factor, sx, sy);
    }

    /// Zooms about the screen center.
    pub fn zoom_by(&mut self, factor: f64) {
        let (cx, cy) = (self.options.screen_width / 2.0, self.options.screen_height / 2.0);
        self.zoom_at(factor, cx, cy);
    }

    /// Sets the zoom while keeping the world point under `(sx, sy)` in place.
    pub fn set_zoom_at(&mut self, zoom: f64, sx: f64, sy: f64) {
        let (wx, wy) = self.screen_to_world(sx, sy);
        self.pin_world_point(wx, wy, zoom, sx, sy);
    }

    /// Sets the zoom and places world `(wx, wy)` at screen `(sx, sy)`.
    pub fn pin_world_point(&mut self, wx: f64, wy: f64, zoom: f64, sx: f64, sy: f64) {
        if self.destroyed {
            return;
        }
        self.zoom = self.clamp_zoom(zoom);
        self.offset_x = sx - wx * self.zoom;
        self.offset_y = sy - wy * self.zoom;
        self.clamp();
    }

    fn clamp_zoom(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.zoom;
        }
        zoom.clamp(self.options.min_scale, self.options.max_scale)
    }

    pub fn move_center(&mut self, wx: f64, wy: f64) {
        if self.destroyed {
            return;
        }
        self.offset_x = self.options.screen_width / 2.0 - wx * self.zoom;
        self.offset_y = self.options.screen_height / 2.0 - wy * self.zoom;
        self.clamp();
    }

    /// Shifts the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if self.destroyed {
            return;
        }
        self.offset_x += dx;
        self.offset_y += dy;
        self.clamp();
    }

    /// Keeps the visible rect inside the world on both axes.
    ///
    /// An axis where the scaled world is narrower than the screen is
    /// centered instead. Returns which axes had to be corrected.
    pub fn clamp(&mut self) -> (bool, bool) {
        let ViewportOptions {
            screen_width,
            screen_height,
            world_width,
            world_height,
            ..
        } = self.options;
        let x = clamp_axis(self.offset_x, screen_width, world_width * self.zoom);
        let y = clamp_axis(self.offset_y, screen_height, world_height * self.zoom);
        let moved = (x != self.offset_x, y != self.offset_y);
        self.offset_x = x;
        self.offset_y = y;
        moved
    }

    /// Advances the post-drag glide by `elapsed` ms. Returns whether the camera moved.
    pub fn tick(&mut self, elapsed: f64) -> bool {
        if self.destroyed || self.panning || elapsed <= 0.0 {
            return false;
        }
        if self.velocity_x == 0.0 && self.velocity_y == 0.0 {
            return false;
        }
        let elapsed = elapsed.min(MAX_TICK_MS);
        self.offset_x += self.velocity_x * elapsed;
        self.offset_y += self.velocity_y * elapsed;
        let decay = self.options.friction.powf(elapsed / FRAME_MS);
        self.velocity_x *= decay;
        self.velocity_y *= decay;
        if self.velocity_x.abs() < self.options.min_speed {
            self.velocity_x = 0.0;
        }
        if self.velocity_y.abs() < self.options.min_speed {
            self.velocity_y = 0.0;
        }
        let (hit_x, hit_y) = self.clamp();
        if hit_x {
            self.velocity_x = 0.0;
        }
        if hit_y {
            self.velocity_y = 0.0;
        }
        true
    }

    /// Queues the one-shot centering on the world midpoint.
    pub fn request_initial_center(&mut self) {
        if !self.initialized && !self.destroyed {
            self.pending_center = true;
        }
    }

    /// Runs queued work. Must be called after the first frame has been drawn.
    pub fn run_deferred(&mut self) -> bool {
        if self.destroyed || !self.pending_center {
            return false;
        }
        self.pending_center = false;
        let (wx, wy) = (self.options.world_width / 2.0, self.options.world_height / 2.0);
        self.move_center(wx, wy);
        self.initialized = true;
        log::debug!("camera centered on world ({wx}, {wy})");
        true
    }

    /// Releases the camera. Later calls are no-ops.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.pending_center = false;
        self.panning = false;
        self.velocity_x = 0.0;
        self.velocity_y = 0.0;
        self.samples.clear();
        log::debug!("viewport destroyed");
        true
    }
}

fn clamp_axis(offset: f64, screen: f64, scaled_world: f64) -> f64 {
    if scaled_world < screen {
        (screen - scaled_world) / 2.0
    } else {
        offset.clamp(screen - scaled_world, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ViewportOptions {
        ViewportOptions {
            screen_width: 800.0,
            screen_height: 600.0,
            world_width: 2000.0,
            world_height: 1500.0,
            max_scale: 1.5,
            min_scale: 0.1,
            wheel_percent: 0.1,
            friction: 0.95,
            min_speed: 0.01,
        }
    }

    #[test]
    fn screen_world_round_trip() {
        let mut cam = Camera::new(options());
        cam.set_zoom_at(1.25, 0.0, 0.0);
        cam.move_center(1000.0, 700.0);
        let (wx, wy) = cam.screen_to_world(123.0, 456.0);
        let (sx, sy) = cam.world_to_screen(wx, wy);
        assert!((sx - 123.0).abs() < 1e-9 && (sy - 456.0).abs() < 1e-9);
    }

    #[test]
    fn drag_is_clamped_to_world() {
        let mut cam = Camera::new(options());
        cam.begin_drag(0.0, 0.0, 0.0);
        cam.drag_to(500.0, 500.0, 16.0);
        assert_eq!(cam.offset(), (0.0, 0.0));
        cam.drag_to(-5000.0, -5000.0, 32.0);
        assert_eq!(cam.offset(), (800.0 - 2000.0, 600.0 - 1500.0));
        cam.end_drag(48.0);
    }

    #[test]
    fn wheel_zooms_about_pointer_and_respects_max() {
        let mut cam = Camera::new(options());
        cam.move_center(1000.0, 750.0);
        let before = cam.screen_to_world(400.0, 300.0);
        cam.wheel(-100.0, 0, 400.0, 300.0);
        assert!(cam.zoom() > 1.0);
        let after = cam.screen_to_world(400.0, 300.0);
        assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
        for _ in 0..50 {
            cam.wheel(-10_000.0, 0, 400.0, 300.0);
        }
        assert_eq!(cam.zoom(), 1.5);
    }

    #[test]
    fn line_mode_wheel_steps_further() {
        let mut pixel = Camera::new(options());
        let mut line = Camera::new(options());
        pixel.wheel(3.0, 0, 0.0, 0.0);
        line.wheel(3.0, 1, 0.0, 0.0);
        assert!(line.zoom() < pixel.zoom());
        assert!(pixel.zoom() < 1.0);
    }

    #[test]
    fn pan_by_stops_at_world_edge() {
        let mut cam = Camera::new(options());
        cam.move_center(1000.0, 750.0);
        cam.pan_by(-64.0, 0.0);
        assert_eq!(cam.offset(), (-600.0 - 64.0, -450.0));
        cam.pan_by(10_000.0, 10_000.0);
        assert_eq!(cam.offset(), (0.0, 0.0));
    }

    #[test]
    fn under_filled_axis_is_centered() {
        let mut cam = Camera::new(options());
        cam.set_zoom_at(0.2, 0.0, 0.0);
        // 2000 * 0.2 = 400 < 800, 1500 * 0.2 = 300 < 600.
        assert_eq!(cam.offset(), (200.0, 150.0));
        cam.begin_drag(0.0, 0.0, 0.0);
        cam.drag_to(90.0, -40.0, 10.0);
        assert_eq!(cam.offset(), (200.0, 150.0));
    }

    #[test]
    fn release_glides_and_stops() {
        let mut cam = Camera::new(options());
        cam.move_center(1000.0, 750.0);
        let start = cam.offset();
        cam.begin_drag(100.0, 100.0, 0.0);
        cam.drag_to(80.0, 100.0, 10.0);
        cam.drag_to(60.0, 100.0, 20.0);
        cam.end_drag(20.0);
        let (vx, vy) = cam.velocity();
        assert_eq!(vy, 0.0);
        assert!((vx - (-2.0)).abs() < 1e-9, "vx = {vx}");
        assert!(cam.tick(16.0));
        let glided = cam.offset().0;
        assert!(glided < start.0 - 40.0);
        let mut frames = 0;
        while cam.tick(16.0) {
            frames += 1;
            assert!(frames < 1000, "glide never stopped");
        }
        assert_eq!(cam.velocity(), (0.0, 0.0));
    }

    #[test]
    fn glide_stops_dead_at_world_edge() {
        let mut cam = Camera::new(options());
        cam.move_center(1000.0, 750.0);
        cam.begin_drag(100.0, 100.0, 0.0);
        cam.drag_to(150.0, 100.0, 10.0);
        cam.drag_to(200.0, 100.0, 20.0);
        cam.end_drag(20.0);
        assert_eq!(cam.velocity(), (5.0, 0.0));
        let mut frames = 0;
        while cam.tick(16.0) {
            frames += 1;
            assert!(frames < 100, "glide never stopped");
        }
        assert!(frames < 10, "took {frames} frames");
        assert_eq!(cam.offset(), (0.0, -450.0));
        assert_eq!(cam.velocity(), (0.0, 0.0));
    }

    #[test]
    fn long_frame_is_capped() {
        let mut cam = Camera::new(options());
        cam.move_center(1000.0, 750.0);
        cam.begin_drag(100.0, 100.0, 0.0);
        cam.drag_to(80.0, 100.0, 10.0);
        cam.drag_to(60.0, 100.0, 20.0);
        cam.end_drag(20.0);
        let before = cam.offset().0;
        let (vx, _) = cam.velocity();
        assert!(cam.tick(10_000.0));
        assert!((cam.offset().0 - (before + vx * MAX_TICK_MS)).abs() < 1e-9);
    }

    #[test]
    fn stale_samples_give_no_velocity() {
        let mut cam = Camera::new(options());
        cam.move_center(1000.0, 750.0);
        cam.begin_drag(100.0, 100.0, 0.0);
        cam.drag_to(50.0, 100.0, 10.0);
        cam.end_drag(500.0);
        assert_eq!(cam.velocity(), (0.0, 0.0));
        assert!(!cam.tick(16.0));
    }

    #[test]
    fn initial_center_runs_once() {
        let mut cam = Camera::new(options());
        assert!(!cam.run_deferred());
        cam.request_initial_center();
        assert!(cam.run_deferred());
        assert_eq!(cam.offset(), (400.0 - 1000.0, 300.0 - 750.0));
        assert!(cam.is_initialized());
        cam.request_initial_center();
        assert!(!cam.run_deferred());
    }

    #[test]
    fn destroy_cancels_pending_center() {
        let mut cam = Camera::new(options());
        cam.request_initial_center();
        assert!(cam.destroy());
        assert!(!cam.destroy());
        assert!(!cam.run_deferred());
        assert!(!cam.is_initialized());
        assert_eq!(cam.offset(), (0.0, 0.0));
    }
}
