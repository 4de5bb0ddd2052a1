//! Frame-loop orchestration: discovery gate, one-shot layout, rendering.
//!
//! The embedding loop owns the window and the pacing; the [`Viewer`] owns
//! everything else. Per frame: `poll_discovery`, `render_frame`, then
//! `record_frame_time` with the measured timings. Input events go through
//! `handle_input` at any time.

use crate::error::Result;
use crate::frame::{
    FrameStats, draw_debug_overlay, draw_discovery_placeholder, draw_help_overlay, draw_world,
};
use crate::layout::{LayoutParams, LayoutSummary, layout_topology};
use crate::surface::Surface;
use crate::text::TextMeasurer;
use forestmap_core::{
    DiscoveryTask, EntityStore, InputEvent, TopologyProvider, ViewerConfig, ViewerControls,
};
use tracing::{error, info};

/// The laid-out world, available once discovery has succeeded.
pub struct World {
    pub store: EntityStore,
    pub summary: LayoutSummary,
}

pub enum ViewerPhase {
    /// Discovery thread still running; the placeholder renders.
    Discovering(DiscoveryTask),
    /// Discovery succeeded and layout ran; entities render.
    Ready(World),
    /// Terminal: discovery or layout failed. Nothing renders; the embedder
    /// should surface the failure and await user exit.
    Stopped,
}

pub struct Viewer {
    config: ViewerConfig,
    pub controls: ViewerControls,
    stats: FrameStats,
    phase: ViewerPhase,
}

impl Viewer {
    /// Spawns the discovery thread immediately; discovery is never restarted.
    pub fn new<P>(config: ViewerConfig, provider: P) -> Result<Self>
    where
        P: TopologyProvider + Send + 'static,
    {
        let task = DiscoveryTask::spawn(provider)?;
        Ok(Self {
            config,
            controls: ViewerControls::new(),
            stats: FrameStats::new(),
            phase: ViewerPhase::Discovering(task),
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn phase(&self) -> &ViewerPhase {
        &self.phase
    }

    pub fn world(&self) -> Option<&World> {
        match &self.phase {
            ViewerPhase::Ready(world) => Some(world),
            _ => None,
        }
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, ViewerPhase::Stopped)
    }

    pub fn quit_requested(&self) -> bool {
        self.controls.quit_requested
    }

    /// Non-blocking discovery poll; called once per frame. On success the
    /// layout engine runs exactly once, before the first interactive frame.
    /// A layout precondition failure is fatal and also stops the viewer.
    pub fn poll_discovery(&mut self, measurer: &dyn TextMeasurer) -> Result<()> {
        let ViewerPhase::Discovering(task) = &mut self.phase else {
            return Ok(());
        };
        let Some(outcome) = task.try_complete() else {
            return Ok(());
        };
        match outcome {
            Ok(mut store) => {
                match layout_topology(&mut store, measurer, &LayoutParams::default()) {
                    Ok(summary) => {
                        info!(entities = store.len(), "discovery complete; world ready");
                        self.phase = ViewerPhase::Ready(World { store, summary });
                    }
                    Err(err) => {
                        error!("layout failed: {err}; stopping");
                        self.phase = ViewerPhase::Stopped;
                        return Err(err);
                    }
                }
            }
            Err(err) => {
                // Surfaced once; discovery is not retried.
                error!(
                    "topology discovery failed: {err}. The viewer must be able to reach a \
                     domain controller of the forest it is mapping."
                );
                self.phase = ViewerPhase::Stopped;
            }
        }
        Ok(())
    }

    /// Routes one input event through the discovery-completion gate.
    pub fn handle_input(&mut self, event: InputEvent) {
        let world_ready = matches!(self.phase, ViewerPhase::Ready(_));
        self.controls.handle_event(event, world_ready);
    }

    pub fn render_frame(
        &mut self,
        surface: &mut dyn Surface,
        measurer: &dyn TextMeasurer,
    ) -> Result<()> {
        if self.is_stopped() {
            return Ok(());
        }
        surface.clear();

        let viewport = self.config.resolution;
        match &self.phase {
            ViewerPhase::Discovering(_) => {
                draw_discovery_placeholder(surface, measurer, viewport, self.stats.total_frames);
                self.stats.entities_on_screen = 0;
            }
            ViewerPhase::Ready(world) => {
                self.stats.entities_on_screen = draw_world(
                    surface,
                    measurer,
                    &world.store,
                    &self.controls.camera,
                    viewport,
                );
            }
            ViewerPhase::Stopped => unreachable!("checked above"),
        }

        if self.controls.show_debug_overlay {
            draw_debug_overlay(surface, &self.controls, &self.stats, viewport);
        }
        if self.controls.show_help_overlay {
            draw_help_overlay(surface);
        }

        surface.present()?;
        self.stats.total_frames += 1;
        Ok(())
    }

    /// Feeds the embedding loop's frame timings into the FPS window.
    pub fn record_frame_time(&mut self, raw_us: u64, cooked_us: u64) {
        self.stats.record_frame(raw_us, cooked_us);
    }
}
