//! The draw surface consumed by the frame renderer.
//!
//! Mirrors the primitive set the renderer actually needs: clear the back
//! buffer, stroke an open polyline, fill a polygon, place a single line of
//! text, present. Backends own pen/brush/font state; the renderer only picks
//! a [`FontSize`] tier per label.

use crate::error::Result;
use crate::text::FontSize;
use forestmap_core::geom::ScreenPoint;

pub trait Surface {
    fn clear(&mut self);
    /// Strokes an open polyline through `points` (closed shapes repeat the
    /// first point).
    fn draw_polyline(&mut self, points: &[ScreenPoint]);
    /// Fills a closed polygon.
    fn draw_polygon(&mut self, points: &[ScreenPoint]);
    /// Draws one line of text with its top-left corner at `position`.
    fn draw_text(&mut self, position: ScreenPoint, text: &str, font: FontSize);
    fn present(&mut self) -> Result<()>;
}

/// Captures draw calls verbatim; the test double for renderer assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Polyline(Vec<(f64, f64)>),
    Polygon(Vec<(f64, f64)>),
    Text {
        x: f64,
        y: f64,
        text: String,
        font: FontSize,
    },
    Present,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
    }

    pub fn shape_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Polyline(_) | DrawCommand::Polygon(_)))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_polyline(&mut self, points: &[ScreenPoint]) {
        self.commands.push(DrawCommand::Polyline(
            points.iter().map(|p| (p.x, p.y)).collect(),
        ));
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint]) {
        self.commands.push(DrawCommand::Polygon(
            points.iter().map(|p| (p.x, p.y)).collect(),
        ));
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, font: FontSize) {
        self.commands.push(DrawCommand::Text {
            x: position.x,
            y: position.y,
            text: text.to_string(),
            font,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }
}
