//! Input events and the camera-facing state transitions they drive.
//!
//! Every handler is a pure transition on [`ViewerControls`]; none performs
//! I/O. World-aware input (drag pan, zoom, keyboard pan) is gated on
//! discovery completion so the camera cannot interact with a world that is
//! mid-construction. View-only toggles and quit are always accepted.

use crate::camera::{Camera, MIN_ZOOM};
use crate::geom::{ScreenPixel, WorldPoint, world_point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    /// Towards more detail (lower zoom level).
    In,
    /// Towards more world area (higher zoom level).
    Out,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pan {
        direction: PanDirection,
        fast: bool,
    },
    Zoom {
        direction: ZoomDirection,
        fast: bool,
    },
    ResetCamera,
    ToggleDebugOverlay,
    ToggleHelpOverlay,
    ToggleFullscreen,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    PointerMove {
        position: ScreenPixel,
        primary_held: bool,
    },
    PointerDown {
        position: ScreenPixel,
    },
    Scroll {
        direction: ZoomDirection,
        fast: bool,
    },
    Key(KeyAction),
}

const PAN_STEP: i32 = 1;
const PAN_STEP_FAST: i32 = 10;

/// Camera plus the process-level view flags, owned by the render thread.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerControls {
    pub camera: Camera,
    pub cursor_screen: ScreenPixel,
    pub cursor_world: WorldPoint,
    pub show_debug_overlay: bool,
    pub show_help_overlay: bool,
    pub fullscreen: bool,
    pub quit_requested: bool,
    drag_anchor: Option<ScreenPixel>,
}

impl Default for ViewerControls {
    fn default() -> Self {
        Self {
            camera: Camera::new(),
            cursor_screen: ScreenPixel::zero(),
            cursor_world: world_point(0.0, 0.0),
            show_debug_overlay: false,
            show_help_overlay: false,
            fullscreen: false,
            quit_requested: false,
            drag_anchor: None,
        }
    }
}

impl ViewerControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one input event. `world_ready` is the discovery-completion
    /// gate, checked on every event.
    pub fn handle_event(&mut self, event: InputEvent, world_ready: bool) {
        match event {
            InputEvent::PointerMove {
                position,
                primary_held,
            } => {
                if !world_ready {
                    return;
                }
                self.track_cursor(position);
                if primary_held {
                    if let Some(anchor) = self.drag_anchor {
                        let delta = position - anchor;
                        self.camera.pan_by(delta.x, delta.y);
                    }
                    self.drag_anchor = Some(position);
                } else {
                    self.drag_anchor = None;
                }
            }
            InputEvent::PointerDown { position } => {
                if !world_ready {
                    return;
                }
                self.track_cursor(position);
                self.drag_anchor = Some(position);
            }
            InputEvent::Scroll { direction, fast } => {
                if !world_ready {
                    return;
                }
                if self.camera.zoom > MIN_ZOOM {
                    self.camera
                        .recenter_on(self.cursor_world, self.cursor_screen.to_f64());
                }
                self.apply_zoom(direction, fast);
            }
            InputEvent::Key(action) => self.handle_key(action, world_ready),
        }
    }

    fn handle_key(&mut self, action: KeyAction, world_ready: bool) {
        match action {
            KeyAction::Pan { direction, fast } => {
                if !world_ready {
                    return;
                }
                let step = if fast { PAN_STEP_FAST } else { PAN_STEP };
                let (dx, dy) = match direction {
                    PanDirection::Left => (-step, 0),
                    PanDirection::Right => (step, 0),
                    PanDirection::Up => (0, -step),
                    PanDirection::Down => (0, step),
                };
                self.camera.step_by(dx, dy);
            }
            KeyAction::Zoom { direction, fast } => {
                if !world_ready {
                    return;
                }
                self.apply_zoom(direction, fast);
            }
            KeyAction::ResetCamera => self.camera.reset_pan(),
            KeyAction::ToggleDebugOverlay => self.show_debug_overlay = !self.show_debug_overlay,
            KeyAction::ToggleHelpOverlay => self.show_help_overlay = !self.show_help_overlay,
            KeyAction::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            KeyAction::Quit => self.quit_requested = true,
        }
    }

    fn apply_zoom(&mut self, direction: ZoomDirection, fast: bool) {
        match direction {
            ZoomDirection::In => self.camera.zoom_in(fast),
            ZoomDirection::Out => self.camera.zoom_out(fast),
        }
    }

    fn track_cursor(&mut self, position: ScreenPixel) {
        self.cursor_screen = position;
        self.cursor_world = self.camera.screen_to_world(position.to_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::screen_pixel;

    fn move_held(position: ScreenPixel) -> InputEvent {
        InputEvent::PointerMove {
            position,
            primary_held: true,
        }
    }

    #[test]
    fn drag_pans_by_incremental_deltas() {
        let mut controls = ViewerControls::new();
        controls.handle_event(InputEvent::PointerDown { position: screen_pixel(100, 100) }, true);
        controls.handle_event(move_held(screen_pixel(110, 95)), true);
        controls.handle_event(move_held(screen_pixel(130, 95)), true);
        // Total drag (+30, -5); offset moves the opposite way.
        assert_eq!((controls.camera.x, controls.camera.y), (-30, 5));
    }

    #[test]
    fn drag_reanchors_after_button_release() {
        let mut controls = ViewerControls::new();
        controls.handle_event(InputEvent::PointerDown { position: screen_pixel(0, 0) }, true);
        controls.handle_event(move_held(screen_pixel(10, 0)), true);
        controls.handle_event(
            InputEvent::PointerMove {
                position: screen_pixel(500, 500),
                primary_held: false,
            },
            true,
        );
        // A new drag far away must not produce a jump back to the old anchor.
        controls.handle_event(move_held(screen_pixel(505, 500)), true);
        controls.handle_event(move_held(screen_pixel(510, 500)), true);
        assert_eq!((controls.camera.x, controls.camera.y), (-15, 0));
    }

    #[test]
    fn world_aware_input_is_gated_until_discovery_completes() {
        let mut controls = ViewerControls::new();
        controls.handle_event(move_held(screen_pixel(50, 50)), false);
        controls.handle_event(move_held(screen_pixel(90, 50)), false);
        controls.handle_event(
            InputEvent::Scroll {
                direction: ZoomDirection::Out,
                fast: false,
            },
            false,
        );
        controls.handle_event(
            InputEvent::Key(KeyAction::Pan {
                direction: PanDirection::Right,
                fast: true,
            }),
            false,
        );
        assert_eq!(controls.camera, Camera::new());
    }

    #[test]
    fn toggles_and_quit_work_while_discovery_is_pending() {
        let mut controls = ViewerControls::new();
        controls.handle_event(InputEvent::Key(KeyAction::ToggleHelpOverlay), false);
        controls.handle_event(InputEvent::Key(KeyAction::ToggleDebugOverlay), false);
        controls.handle_event(InputEvent::Key(KeyAction::Quit), false);
        assert!(controls.show_help_overlay);
        assert!(controls.show_debug_overlay);
        assert!(controls.quit_requested);
    }

    #[test]
    fn keyboard_pan_steps_and_fast_steps() {
        let mut controls = ViewerControls::new();
        controls.handle_event(
            InputEvent::Key(KeyAction::Pan {
                direction: PanDirection::Right,
                fast: false,
            }),
            true,
        );
        controls.handle_event(
            InputEvent::Key(KeyAction::Pan {
                direction: PanDirection::Up,
                fast: true,
            }),
            true,
        );
        assert_eq!((controls.camera.x, controls.camera.y), (1, -10));
    }

    #[test]
    fn scroll_zoom_recenters_only_when_zoomed_in_past_minimum() {
        let mut controls = ViewerControls::new();
        controls.handle_event(move_held(screen_pixel(200, 100)), true);

        // At MIN_ZOOM the offset is left alone by the recentering rule.
        controls.handle_event(
            InputEvent::Scroll {
                direction: ZoomDirection::Out,
                fast: false,
            },
            true,
        );
        assert_eq!(controls.camera.zoom, 2);
        assert_eq!((controls.camera.x, controls.camera.y), (0, 0));

        // Past minimum, the offset re-anchors to cursor_world - cursor_screen.
        controls.handle_event(
            InputEvent::PointerMove {
                position: screen_pixel(200, 100),
                primary_held: false,
            },
            true,
        );
        let world = controls.cursor_world;
        controls.handle_event(
            InputEvent::Scroll {
                direction: ZoomDirection::Out,
                fast: false,
            },
            true,
        );
        assert_eq!(controls.camera.zoom, 3);
        assert_eq!(controls.camera.x, (world.x - 200.0) as i32);
        assert_eq!(controls.camera.y, (world.y - 100.0) as i32);
    }

    #[test]
    fn camera_reset_after_pan_preserves_zoom() {
        let mut controls = ViewerControls::new();
        controls.camera.zoom = 7;
        controls.handle_event(InputEvent::PointerDown { position: screen_pixel(0, 0) }, true);
        controls.handle_event(move_held(screen_pixel(40, 40)), true);
        assert_ne!((controls.camera.x, controls.camera.y), (0, 0));

        controls.handle_event(InputEvent::Key(KeyAction::ResetCamera), true);
        assert_eq!((controls.camera.x, controls.camera.y), (0, 0));
        assert_eq!(controls.camera.zoom, 7);
    }
}
