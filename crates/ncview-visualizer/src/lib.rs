//! # NCView Visualizer
//!
//! G-code interpretation and toolpath geometry for NCView.
//! Includes the tokenizer, modal state tracker, arc resolver and segment
//! generator, plus bounds, projection, tessellation and the viewing session.

pub mod gcode;
pub mod visualizer;

pub use gcode::{
    parse_gcode, parse_toolpath, resolve_arc, tokenize_line, ArcGeometry, ArcSpec, ArgLetter,
    Diagnostic, DisplayClass, LineCommand, MachineState, RawArgs, Segment, SegmentGenerator,
    SegmentKind, Severity, Toolpath, TokenizedLine,
};

pub use visualizer::{
    arc_step_count, compute_bounds, compute_cutting_bounds, depth_range, flatten_segment,
    flatten_toolpath, tessellate_arc, BoundingBox, ParseJob, ParseOutcome, ToolpathCache,
    ViewTransform, Visualizer,
};
