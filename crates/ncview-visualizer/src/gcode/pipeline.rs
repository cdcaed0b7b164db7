//! Text-to-toolpath pipeline
//!
//! Drives tokenizer, command classification, modal state and arc resolution
//! over a whole program and accumulates typed segments. A parse never fails:
//! problems on individual lines become [`Diagnostic`]s and the line is
//! skipped.

use ncview_core::{ArcError, GcodeError, MotionKind, ParseOptions, Point3};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace, warn};

use super::arc::{resolve_arc, ArcSpec};
use super::command::LineCommand;
use super::segment::Segment;
use super::state::MachineState;
use super::tokenizer::{tokenize_line, ArgLetter, RawArgs, TokenizedLine};
use crate::visualizer::viewport::{compute_bounds, BoundingBox};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The line was interpreted, possibly with a value dropped or a
    /// convention applied
    Warning,
    /// The line produced no geometry
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A non-fatal problem tied to one source line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub source_line: usize,
    pub severity: Severity,
    pub error: GcodeError,
}

impl Diagnostic {
    pub fn warning(error: GcodeError) -> Self {
        Self {
            source_line: error.line_number(),
            severity: Severity::Warning,
            error,
        }
    }

    pub fn error(error: GcodeError) -> Self {
        Self {
            source_line: error.line_number(),
            severity: Severity::Error,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.error)
    }
}

/// Everything one parse produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toolpath {
    pub segments: Vec<Segment>,
    pub bounds: BoundingBox,
    pub diagnostics: Vec<Diagnostic>,
    /// Machine state after the last line
    pub final_state: MachineState,
}

impl Toolpath {
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
            bounds: BoundingBox::EMPTY,
            diagnostics: Vec::new(),
            final_state: MachineState::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// Segments originating from a 1-based source line
    pub fn segments_for_line(&self, source_line: usize) -> impl Iterator<Item = &Segment> + '_ {
        self.segments
            .iter()
            .filter(move |s| s.source_line == source_line)
    }

    /// First error-severity diagnostic as a hard failure
    pub fn check(&self) -> ncview_core::Result<()> {
        match self.diagnostics.iter().find(|d| d.is_error()) {
            Some(diagnostic) => Err(diagnostic.error.clone().into()),
            None => Ok(()),
        }
    }

    /// Total XY path length
    pub fn path_length(&self) -> f64 {
        self.segments.iter().map(Segment::length_xy).sum()
    }

    /// Pretty JSON of segments, bounds and diagnostics
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Toolpath {
    fn default() -> Self {
        Self::empty()
    }
}

/// Incremental segment generator
///
/// Feed it lines in order; it threads one [`MachineState`] through them.
#[derive(Debug, Clone)]
pub struct SegmentGenerator {
    state: MachineState,
    options: ParseOptions,
    segments: Vec<Segment>,
    diagnostics: Vec<Diagnostic>,
}

impl SegmentGenerator {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            state: MachineState::new(),
            options,
            segments: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Interpret one line of text; `line_number` is 1-based
    pub fn feed_line(&mut self, line_number: usize, text: &str) {
        let Some(tokenized) = tokenize_line(text, self.options.strip_line_numbers) else {
            return;
        };
        self.feed_tokens(line_number, tokenized);
    }

    fn feed_tokens(&mut self, line_number: usize, tokenized: TokenizedLine) {
        for token in tokenized.malformed {
            self.push(Diagnostic::warning(GcodeError::MalformedToken {
                line_number,
                token,
            }));
        }

        let command = LineCommand::classify(tokenized.command.as_deref());
        let args = tokenized.args;

        let motion = match (&command, self.state.resolve_motion(&command)) {
            (LineCommand::Other(word), _) => {
                trace!("Line {}: skipping '{}'", line_number, word);
                return;
            }
            (_, Some(motion)) => motion,
            (_, None) => {
                if !args.is_empty() {
                    self.push(Diagnostic::error(GcodeError::MissingMotionMode {
                        line_number,
                    }));
                }
                return;
            }
        };

        let arc_words = motion.is_arc() && args.has_arc_words();
        if !args.has_axis() && !arc_words {
            // Bare motion word: selects the mode for following lines
            self.state = self.state.with_motion(motion);
            return;
        }

        let start = self.state.position;
        let target = self.state.resolve_target(&args);

        if !args.has_xy() && !arc_words {
            self.vertical_move(line_number, motion, start, target);
        } else {
            match motion {
                MotionKind::Rapid | MotionKind::Feed => {
                    self.segments.push(Segment::line(motion, start, target, line_number));
                }
                MotionKind::ClockwiseArc | MotionKind::CounterClockwiseArc => {
                    self.arc_move(line_number, motion, start, target, &args)
                }
            }
        }

        self.state = self.state.advance(target, motion);
    }

    /// Z-only move in any motion mode
    fn vertical_move(
        &mut self,
        line_number: usize,
        motion: MotionKind,
        start: Point3,
        target: Point3,
    ) {
        if !self.options.emit_plunge_segments {
            trace!(
                "Line {}: depth change {:.3} -> {:.3}",
                line_number,
                start.z,
                target.z
            );
            return;
        }
        // A plunge under G2/G3 is a straight feed
        let motion = if motion.is_arc() { MotionKind::Feed } else { motion };
        self.segments.push(Segment::line(motion, start, target, line_number));
    }

    fn arc_move(
        &mut self,
        line_number: usize,
        motion: MotionKind,
        start: Point3,
        target: Point3,
        args: &RawArgs,
    ) {
        let Some(spec) = self.arc_spec(line_number, args) else {
            self.push(Diagnostic::error(GcodeError::UnresolvableArc {
                line_number,
                source: ArcError::MissingArcParameters,
            }));
            return;
        };

        let clockwise = motion == MotionKind::ClockwiseArc;
        match resolve_arc(start.xy(), target.xy(), clockwise, spec, &self.options) {
            Ok(geometry) => {
                self.segments.push(Segment::arc(motion, start, target, geometry, line_number));
            }
            Err(source) => {
                self.push(Diagnostic::error(GcodeError::UnresolvableArc {
                    line_number,
                    source,
                }));
            }
        }
    }

    /// Pick the arc form from the line's words
    ///
    /// I/J wins over R; an omitted I or J counts as zero.
    fn arc_spec(&mut self, line_number: usize, args: &RawArgs) -> Option<ArcSpec> {
        let has_offsets = args.contains(ArgLetter::I) || args.contains(ArgLetter::J);
        let radius = args.get(ArgLetter::R);

        if has_offsets {
            if radius.is_some() {
                self.push(Diagnostic::warning(GcodeError::ConflictingArcForm {
                    line_number,
                }));
            }
            return Some(ArcSpec::CenterOffset {
                i: args.get(ArgLetter::I).unwrap_or(0.0),
                j: args.get(ArgLetter::J).unwrap_or(0.0),
            });
        }

        let radius = radius?;
        if radius < 0.0 {
            self.push(Diagnostic::warning(GcodeError::NegativeRadius {
                line_number,
                mode: self.options.negative_radius.to_string(),
            }));
        }
        Some(ArcSpec::Radius(radius))
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Consume the generator and compute bounds
    pub fn finish(self) -> Toolpath {
        let bounds = compute_bounds(&self.segments);
        Toolpath {
            segments: self.segments,
            bounds,
            diagnostics: self.diagnostics,
            final_state: self.state,
        }
    }
}

impl Default for SegmentGenerator {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Parse a whole program with the given options
pub fn parse_toolpath(text: &str, options: &ParseOptions) -> Toolpath {
    debug!("Starting G-code parse, input size: {} bytes", text.len());

    let mut generator = SegmentGenerator::new(*options);
    for (index, line) in text.lines().enumerate() {
        generator.feed_line(index + 1, line);
    }
    let toolpath = generator.finish();

    debug!(
        "Parse complete: {} segments, {} errors, {} warnings",
        toolpath.segments.len(),
        toolpath.error_count(),
        toolpath.warning_count()
    );
    toolpath
}

/// Parse a whole program with default options
pub fn parse_gcode(text: &str) -> Toolpath {
    parse_toolpath(text, &ParseOptions::default())
}
