//! Typed world/screen geometry.
//!
//! Entities live in an unbounded world coordinate system; the camera projects
//! them into viewport pixels. Keeping the two spaces as distinct `euclid`
//! units makes it a compile error to mix them up.

/// Unit of the unbounded coordinate system entities are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSpace;

/// Unit of viewport pixel coordinates after camera projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSpace;

pub type WorldPoint = euclid::Point2D<f64, WorldSpace>;
pub type WorldVector = euclid::Vector2D<f64, WorldSpace>;
pub type WorldSize = euclid::Size2D<f64, WorldSpace>;
pub type WorldBox = euclid::Box2D<f64, WorldSpace>;

pub type ScreenPoint = euclid::Point2D<f64, ScreenSpace>;
pub type ScreenVector = euclid::Vector2D<f64, ScreenSpace>;
pub type ScreenBox = euclid::Box2D<f64, ScreenSpace>;

/// Integer pixel position as delivered by the event source.
pub type ScreenPixel = euclid::Point2D<i32, ScreenSpace>;
pub type PixelVector = euclid::Vector2D<i32, ScreenSpace>;

pub fn world_point(x: f64, y: f64) -> WorldPoint {
    euclid::point2(x, y)
}

pub fn screen_point(x: f64, y: f64) -> ScreenPoint {
    euclid::point2(x, y)
}

pub fn screen_pixel(x: i32, y: i32) -> ScreenPixel {
    euclid::point2(x, y)
}
