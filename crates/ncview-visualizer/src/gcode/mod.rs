//! G-Code interpretation
//!
//! This module provides:
//! - Line tokenizing
//! - Command classification
//! - Modal state tracking
//! - Arc resolution (I/J and R forms)
//! - Segment generation with per-line diagnostics

pub mod arc;
pub mod command;
pub mod pipeline;
pub mod segment;
pub mod state;
pub mod tokenizer;

pub use arc::{
    candidate_centers, center_from_radius, cross_z, matches_direction, normalize_end_angle,
    resolve_arc, ArcGeometry, ArcSpec,
};
pub use command::{extract_gcode_num, LineCommand};
pub use pipeline::{
    parse_gcode, parse_toolpath, Diagnostic, SegmentGenerator, Severity, Toolpath,
};
pub use segment::{DisplayClass, Segment, SegmentKind};
pub use state::MachineState;
pub use tokenizer::{parse_number, tokenize_line, ArgLetter, RawArgs, TokenizedLine};
