#![forbid(unsafe_code)]

//! Topology layout engine and frame renderer for forestmap (headless).
//!
//! The layout engine runs exactly once, after discovery completes, and is a
//! pure function of the entity sequence plus text measurements. The frame
//! renderer projects entities through the camera, culls against the
//! viewport, and issues primitive draw calls to a [`surface::Surface`]
//! backend; the only backend shipped here is SVG.

pub mod error;
pub mod frame;
pub mod layout;
pub mod surface;
pub mod svg;
pub mod text;
pub mod viewer;

pub use error::{Error, Result};
pub use frame::{
    DISCOVERY_IN_PROGRESS_TEXT, FrameStats, STATS_WINDOW_FRAMES, dc_label_font, is_visible,
    site_label_font,
};
pub use layout::{DC_SIZE, LayoutParams, LayoutSummary, layout_topology};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use svg::SvgSurface;
pub use text::{DeterministicTextMeasurer, FontSize, TextMeasurer, TextMetrics};
pub use viewer::{Viewer, ViewerPhase, World};
