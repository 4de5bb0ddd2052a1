//! Pan/zoom camera: the bidirectional mapping between world and screen
//! coordinates.
//!
//! The zoom level is an integer inverse-scale factor: 1 shows the most
//! detail, [`MAX_ZOOM`] the most world area. The offset is stored in screen
//! pixels and applied after scaling:
//!
//! ```text
//! screen = world / zoom - offset
//! world  = (screen + offset) * zoom
//! ```
//!
//! The two legs are exact algebraic inverses of each other; round trips hold
//! to f64 rounding.

use crate::geom::{ScreenBox, ScreenPoint, WorldBox, WorldPoint, screen_point, world_point};
use serde::{Deserialize, Serialize};

/// Most zoomed-in level (most detail).
pub const MIN_ZOOM: u32 = 1;

/// Most zoomed-out level (most world area).
pub const MAX_ZOOM: u32 = 100;

const FAST_STEP: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen-space translation, applied post-scale. Unbounded.
    pub x: i32,
    pub y: i32,
    /// Clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: u32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            zoom: MIN_ZOOM,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    fn scale(&self) -> f64 {
        1.0 / f64::from(self.zoom)
    }

    pub fn world_to_screen(&self, p: WorldPoint) -> ScreenPoint {
        screen_point(
            p.x * self.scale() - f64::from(self.x),
            p.y * self.scale() - f64::from(self.y),
        )
    }

    pub fn screen_to_world(&self, p: ScreenPoint) -> WorldPoint {
        world_point(
            (p.x + f64::from(self.x)) * f64::from(self.zoom),
            (p.y + f64::from(self.y)) * f64::from(self.zoom),
        )
    }

    /// Projects a world-space box to its screen-space bounding box.
    pub fn project_box(&self, b: &WorldBox) -> ScreenBox {
        ScreenBox::new(self.world_to_screen(b.min), self.world_to_screen(b.max))
    }

    /// Incremental drag pan: subtracts a pixel delta from the offset.
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.x -= dx;
        self.y -= dy;
    }

    /// Keyboard pan: moves the viewport by a pixel step.
    pub fn step_by(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Decrements the zoom level (more detail), clamped at [`MIN_ZOOM`].
    pub fn zoom_in(&mut self, fast: bool) {
        let step = if fast { FAST_STEP } else { 1 };
        self.zoom = self.zoom.saturating_sub(step).max(MIN_ZOOM);
    }

    /// Increments the zoom level (more world area), clamped at [`MAX_ZOOM`].
    pub fn zoom_out(&mut self, fast: bool) {
        let step = if fast { FAST_STEP } else { 1 };
        self.zoom = self.zoom.saturating_add(step).min(MAX_ZOOM);
    }

    /// Heuristic zoom-to-cursor: re-anchors the offset so the world point
    /// under the cursor stays roughly put across a zoom step. Not an exact
    /// point-anchored zoom; the drift is inherited behavior.
    pub fn recenter_on(&mut self, cursor_world: WorldPoint, cursor_screen: ScreenPoint) {
        self.x = (cursor_world.x - cursor_screen.x) as i32;
        self.y = (cursor_world.y - cursor_screen.y) as i32;
    }

    /// Returns the offset to the origin; the zoom level is untouched.
    pub fn reset_pan(&mut self) {
        self.x = 0;
        self.y = 0;
    }
}
