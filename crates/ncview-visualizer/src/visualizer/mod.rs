//! Consumer-side helpers
//!
//! This module provides:
//! - Bounding boxes and the model-to-screen projector
//! - Zoom-dependent arc tessellation
//! - SVG path caching
//! - The viewing session that owns a loaded toolpath

pub mod tessellation;
pub mod toolpath_cache;
pub mod viewport;
#[allow(clippy::module_inception)]
pub mod visualizer;

pub use tessellation::{arc_step_count, flatten_segment, flatten_toolpath, tessellate_arc};
pub use toolpath_cache::ToolpathCache;
pub use viewport::{
    compute_bounds, compute_cutting_bounds, depth_range, BoundingBox, ViewTransform,
};
pub use visualizer::{ParseJob, ParseOutcome, Visualizer};
