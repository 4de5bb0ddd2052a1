//! Headless SVG surface: the same draw calls a windowed back buffer would
//! receive, composed into an SVG document. Used by the CLI and by golden
//! inspection during development.

use crate::error::Result;
use crate::surface::Surface;
use crate::text::FontSize;
use forestmap_core::Resolution;
use forestmap_core::geom::ScreenPoint;
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgSurface {
    resolution: Resolution,
    font_face: String,
    body: String,
}

impl SvgSurface {
    pub fn new(resolution: Resolution, font_face: &str) -> Self {
        Self {
            resolution,
            font_face: font_face.to_string(),
            body: String::new(),
        }
    }

    /// The finished document for whatever was drawn since the last clear.
    pub fn document(&self) -> String {
        let w = self.resolution.width();
        let h = self.resolution.height();
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        let _ = write!(out, r##"<rect width="{w}" height="{h}" fill="#000000"/>"##);
        out.push_str(&self.body);
        out.push_str("</svg>");
        out
    }
}

fn fmt_coord(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let r = (v * 100.0).round() / 100.0;
    let mut s = format!("{r:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn fmt_points(points: &[ScreenPoint]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{},{}", fmt_coord(p.x), fmt_coord(p.y));
    }
    out
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Surface for SvgSurface {
    fn clear(&mut self) {
        self.body.clear();
    }

    fn draw_polyline(&mut self, points: &[ScreenPoint]) {
        let _ = write!(
            self.body,
            r##"<polyline points="{}" fill="none" stroke="#ffffff" stroke-width="2"/>"##,
            fmt_points(points)
        );
    }

    fn draw_polygon(&mut self, points: &[ScreenPoint]) {
        let _ = write!(
            self.body,
            r##"<polygon points="{}" fill="#ffffff"/>"##,
            fmt_points(points)
        );
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, font: FontSize) {
        let _ = write!(
            self.body,
            r##"<text x="{}" y="{}" font-family="{}" font-size="{}" fill="#ffffff" dominant-baseline="hanging">{}</text>"##,
            fmt_coord(position.x),
            fmt_coord(position.y),
            xml_escape(&self.font_face),
            fmt_coord(font.px()),
            xml_escape(text)
        );
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestmap_core::geom::screen_point;

    fn surface() -> SvgSurface {
        SvgSurface::new(
            Resolution::new(640, 480).expect("valid test resolution"),
            "Consolas",
        )
    }

    #[test]
    fn document_wraps_body_with_background() {
        let mut s = surface();
        s.clear();
        s.draw_polyline(&[screen_point(0.0, 0.0), screen_point(10.5, 20.25)]);
        let doc = s.document();
        assert!(doc.starts_with("<svg "));
        assert!(doc.contains(r#"viewBox="0 0 640 480""#));
        assert!(doc.contains(r#"points="0,0 10.5,20.25""#));
        assert!(doc.ends_with("</svg>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut s = surface();
        s.draw_text(screen_point(1.0, 2.0), "a<b&c>d", FontSize::Small);
        let doc = s.document();
        assert!(doc.contains("a&lt;b&amp;c&gt;d"));
        assert!(doc.contains(r#"font-size="18""#));
    }

    #[test]
    fn clear_discards_prior_draws() {
        let mut s = surface();
        s.draw_text(screen_point(0.0, 0.0), "stale", FontSize::Big);
        s.clear();
        assert!(!s.document().contains("stale"));
    }
}
