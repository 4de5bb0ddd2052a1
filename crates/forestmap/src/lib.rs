#![forbid(unsafe_code)]

//! `forestmap` maps the site/domain-controller topology of a directory
//! forest onto an interactive 2D world: rectangles for sites, triangles for
//! domain controllers, pan/zoom camera on top. Everything here is headless;
//! window creation and the live directory RPC stack are the embedder's.
//!
//! # Features
//!
//! - `render`: enable the layout engine and frame renderer
//!   (`forestmap::render`)

pub use forestmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use forestmap_render::surface::{DrawCommand, RecordingSurface, Surface};
    pub use forestmap_render::svg::SvgSurface;
    pub use forestmap_render::text::{
        DeterministicTextMeasurer, FontSize, TextMeasurer, TextMetrics,
    };
    pub use forestmap_render::viewer::{Viewer, ViewerPhase, World};
    pub use forestmap_render::{
        DISCOVERY_IN_PROGRESS_TEXT, Error, FrameStats, LayoutParams, LayoutSummary, Result,
        layout_topology,
    };
}
