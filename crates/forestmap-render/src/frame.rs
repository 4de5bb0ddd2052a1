//! Per-frame entity pass: projection, culling, level-of-detail labels,
//! overlays.
//!
//! The whole back buffer is cleared and redrawn every frame; the cheap-reject
//! cull against the viewport is what keeps the entity pass fast in practice.

use crate::surface::Surface;
use crate::text::{FontSize, TextMeasurer};
use forestmap_core::geom::{ScreenBox, screen_point, world_point};
use forestmap_core::{Camera, EntityKind, EntityStore, Resolution, ViewerControls};

pub const DISCOVERY_IN_PROGRESS_TEXT: &str = "Topology discovery in progress...";

/// FPS averages recompute every this many frames.
pub const STATS_WINDOW_FRAMES: u64 = 120;

const HELP_LINES: &[&str] = &[
    "Mouse drag   pan",
    "Mouse wheel  zoom (Ctrl: fast)",
    "Arrow keys   pan (Ctrl: fast)",
    "Home         reset camera",
    "F11          debug readout",
    "H            this help",
    "F            toggle fullscreen",
    "Esc          quit",
];

/// Frame timing collected by the embedding loop. `raw` is the time spent
/// rendering, `cooked` includes the pacing sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub total_frames: u64,
    pub raw_fps: f32,
    pub cooked_fps: f32,
    pub entities_on_screen: usize,
    raw_accumulator_us: u64,
    cooked_accumulator_us: u64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one frame's timings; averages roll over once per window.
    pub fn record_frame(&mut self, raw_us: u64, cooked_us: u64) {
        self.raw_accumulator_us += raw_us;
        self.cooked_accumulator_us += cooked_us;
        if self.total_frames > 0 && self.total_frames % STATS_WINDOW_FRAMES == 0 {
            let window = STATS_WINDOW_FRAMES as f32;
            self.raw_fps = 1.0 / ((self.raw_accumulator_us as f32 / window) * 0.000_001);
            self.cooked_fps = 1.0 / ((self.cooked_accumulator_us as f32 / window) * 0.000_001);
            self.raw_accumulator_us = 0;
            self.cooked_accumulator_us = 0;
        }
    }
}

/// Cheap-reject cull: false only when the rectangle lies entirely outside
/// the viewport.
pub fn is_visible(rect: &ScreenBox, viewport: Resolution) -> bool {
    !(rect.min.x > f64::from(viewport.width())
        || rect.min.y > f64::from(viewport.height())
        || rect.max.x < 0.0
        || rect.max.y < 0.0)
}

/// Site label tier per zoom level; `None` suppresses the label.
pub fn site_label_font(zoom: u32) -> Option<FontSize> {
    match zoom {
        1 => Some(FontSize::Huge),
        2 | 3 => Some(FontSize::Big),
        4 | 5 => Some(FontSize::Small),
        _ => None,
    }
}

/// DC label tier per zoom level; DCs drop their labels earlier than sites.
pub fn dc_label_font(zoom: u32) -> Option<FontSize> {
    match zoom {
        1 => Some(FontSize::Huge),
        2 => Some(FontSize::Big),
        3 => Some(FontSize::Small),
        _ => None,
    }
}

/// Draws every placed entity that survives the cull. Returns how many were
/// drawn.
pub fn draw_world(
    surface: &mut dyn Surface,
    measurer: &dyn TextMeasurer,
    store: &EntityStore,
    camera: &Camera,
    viewport: Resolution,
) -> usize {
    let mut on_screen = 0;
    for (_, entity) in store.iter() {
        if !entity.is_placed() {
            // Trusts and orphaned DCs carry no geometry.
            continue;
        }
        let rect = camera.project_box(&entity.world_box());
        if !is_visible(&rect, viewport) {
            continue;
        }

        match entity.kind {
            EntityKind::Site => {
                surface.draw_polyline(&[
                    screen_point(rect.min.x, rect.min.y),
                    screen_point(rect.max.x, rect.min.y),
                    screen_point(rect.max.x, rect.max.y),
                    screen_point(rect.min.x, rect.max.y),
                    screen_point(rect.min.x, rect.min.y),
                ]);
                if let Some(font) = site_label_font(camera.zoom) {
                    let metrics = measurer.measure(&entity.display_name, font);
                    let center_x = rect.min.x + (rect.max.x - rect.min.x) / 2.0;
                    // Name below the bottom edge and mirrored above the top.
                    surface.draw_text(
                        screen_point(center_x - metrics.width / 2.0, rect.max.y),
                        &entity.display_name,
                        font,
                    );
                    surface.draw_text(
                        screen_point(center_x - metrics.width / 2.0, rect.min.y - metrics.height),
                        &entity.display_name,
                        font,
                    );
                }
            }
            EntityKind::DomainController => {
                surface.draw_polygon(&[
                    screen_point(rect.min.x, rect.max.y),
                    screen_point(rect.max.x, rect.max.y),
                    screen_point(rect.max.x - (rect.max.x - rect.min.x) / 2.0, rect.min.y),
                ]);
                if let Some(font) = dc_label_font(camera.zoom) {
                    let metrics = measurer.measure(&entity.fully_qualified_name, font);
                    // FQDN to the right of the triangle, vertically centered
                    // on the icon.
                    let label_y = camera
                        .world_to_screen(world_point(
                            f64::from(entity.x),
                            f64::from(entity.y) + f64::from(entity.height) / 2.0
                                - metrics.height / 2.0,
                        ))
                        .y;
                    surface.draw_text(
                        screen_point(rect.max.x, label_y),
                        &entity.fully_qualified_name,
                        font,
                    );
                }
            }
            EntityKind::Trust | EntityKind::SiteLink => {}
        }

        on_screen += 1;
    }
    on_screen
}

/// Placeholder frame while the discovery thread is still running: a framed
/// banner with a trailing-ellipsis animation driven by the frame counter.
pub fn draw_discovery_placeholder(
    surface: &mut dyn Surface,
    measurer: &dyn TextMeasurer,
    viewport: Resolution,
    total_frames: u64,
) {
    let w = f64::from(viewport.width());
    let h = f64::from(viewport.height());
    surface.draw_polyline(&[
        screen_point(64.0, h / 2.0 - 32.0),
        screen_point(w - 64.0, h / 2.0 - 32.0),
        screen_point(w - 64.0, h / 2.0 + 32.0),
        screen_point(64.0, h / 2.0 + 32.0),
        screen_point(64.0, h / 2.0 - 32.0),
    ]);

    let trim = (3 - (total_frames / 30) % 4) as usize;
    let shown = &DISCOVERY_IN_PROGRESS_TEXT[..DISCOVERY_IN_PROGRESS_TEXT.len() - trim];
    let metrics = measurer.measure(DISCOVERY_IN_PROGRESS_TEXT, FontSize::Big);
    surface.draw_text(
        screen_point(w / 2.0 - metrics.width / 2.0, h / 2.0 - metrics.height / 2.0),
        shown,
        FontSize::Big,
    );
}

/// Fixed-position diagnostic readout, bottom-left, small font.
pub fn draw_debug_overlay(
    surface: &mut dyn Surface,
    controls: &ViewerControls,
    stats: &FrameStats,
    viewport: Resolution,
) {
    let line = format!(
        "FPS:{:.1}/{:.1} CameraXYZ:{},{},{} Res:{}x{} EntitiesOnScreen:{} Mouse:({},{}) ({},{})",
        stats.raw_fps,
        stats.cooked_fps,
        controls.camera.x,
        controls.camera.y,
        controls.camera.zoom,
        viewport.width(),
        viewport.height(),
        stats.entities_on_screen,
        controls.cursor_screen.x,
        controls.cursor_screen.y,
        controls.cursor_world.x as i64,
        controls.cursor_world.y as i64,
    );
    let h = f64::from(viewport.height());
    surface.draw_text(screen_point(0.0, h - 36.0), &line, FontSize::Small);
    surface.draw_text(
        screen_point(0.0, h - 18.0),
        concat!("forestmap v", env!("CARGO_PKG_VERSION")),
        FontSize::Small,
    );
}

/// Static key-binding overlay, top-left.
pub fn draw_help_overlay(surface: &mut dyn Surface) {
    for (i, line) in HELP_LINES.iter().enumerate() {
        surface.draw_text(
            screen_point(0.0, i as f64 * FontSize::Small.px()),
            line,
            FontSize::Small,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forestmap_core::geom::ScreenBox;

    fn viewport() -> Resolution {
        Resolution::new(1280, 720).expect("valid test viewport")
    }

    fn rect(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> ScreenBox {
        ScreenBox::new(screen_point(min_x, min_y), screen_point(max_x, max_y))
    }

    #[test]
    fn rect_fully_outside_any_edge_is_culled() {
        let vp = viewport();
        assert!(!is_visible(&rect(-200.0, 0.0, -10.0, 100.0), vp));
        assert!(!is_visible(&rect(1290.0, 0.0, 1400.0, 100.0), vp));
        assert!(!is_visible(&rect(0.0, -50.0, 100.0, -1.0), vp));
        assert!(!is_visible(&rect(0.0, 730.0, 100.0, 800.0), vp));
    }

    #[test]
    fn rect_with_any_overlap_is_visible() {
        let vp = viewport();
        assert!(is_visible(&rect(-50.0, -50.0, 10.0, 10.0), vp));
        assert!(is_visible(&rect(1270.0, 700.0, 1400.0, 800.0), vp));
        assert!(is_visible(&rect(0.0, 0.0, 1280.0, 720.0), vp));
        // Touching an edge still counts as overlap.
        assert!(is_visible(&rect(1280.0, 0.0, 1300.0, 10.0), vp));
    }

    #[test]
    fn label_tiers_shrink_with_zoom_and_then_disappear() {
        assert_eq!(site_label_font(1), Some(FontSize::Huge));
        assert_eq!(site_label_font(3), Some(FontSize::Big));
        assert_eq!(site_label_font(5), Some(FontSize::Small));
        assert_eq!(site_label_font(6), None);

        assert_eq!(dc_label_font(1), Some(FontSize::Huge));
        assert_eq!(dc_label_font(2), Some(FontSize::Big));
        assert_eq!(dc_label_font(3), Some(FontSize::Small));
        assert_eq!(dc_label_font(4), None);
        assert_eq!(dc_label_font(100), None);
    }

    #[test]
    fn fps_averages_roll_over_once_per_window() {
        let mut stats = FrameStats::new();
        // 16ms raw / 16.667ms cooked per frame.
        for _ in 0..STATS_WINDOW_FRAMES {
            stats.total_frames += 1;
            stats.record_frame(16_000, 16_667);
        }
        assert!((stats.raw_fps - 62.5).abs() < 0.1, "{}", stats.raw_fps);
        assert!((stats.cooked_fps - 60.0).abs() < 0.1, "{}", stats.cooked_fps);
    }

    #[test]
    fn placeholder_ellipsis_animation_cycles() {
        fn shown_len(frames: u64) -> usize {
            DISCOVERY_IN_PROGRESS_TEXT.len() - ((3 - (frames / 30) % 4) as usize)
        }
        let full = DISCOVERY_IN_PROGRESS_TEXT.len();
        assert_eq!(shown_len(0), full - 3);
        assert_eq!(shown_len(30), full - 2);
        assert_eq!(shown_len(60), full - 1);
        assert_eq!(shown_len(90), full);
        assert_eq!(shown_len(120), full - 3);
    }
}
