//! Error handling for NCView
//!
//! Provides error types for all layers of the library:
//! - Arc errors (geometric infeasibility of a G2/G3 move)
//! - G-Code errors (per-line problems, reported as diagnostics)
//! - View errors (projection and fit-to-view)
//!
//! All error types use `thiserror` for ergonomic error handling.

use serde::Serialize;
use thiserror::Error;

/// Arc resolution error type
///
/// Represents the reasons a G2/G3 move cannot be turned into a circle.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArcError {
    /// Centre coincides with the start point
    #[error("Arc radius is zero")]
    ZeroRadius,

    /// Start and end do not lie on the same circle around the I/J centre
    #[error(
        "Arc radius mismatch: start radius {start_radius:.4}, end radius {end_radius:.4} (tolerance {tolerance:.4})"
    )]
    RadiusMismatch {
        /// Distance from the start point to the centre.
        start_radius: f64,
        /// Distance from the end point to the centre.
        end_radius: f64,
        /// Absolute tolerance that was exceeded.
        tolerance: f64,
    },

    /// Radius form where the endpoints are further apart than the diameter
    #[error("Arc chord {chord:.4} is longer than the diameter for radius {radius:.4}")]
    ChordTooLong {
        /// Distance between start and end.
        chord: f64,
        /// Absolute radius requested.
        radius: f64,
    },

    /// Neither I/J nor R were given
    #[error("Arc needs I/J centre offsets or an R radius")]
    MissingArcParameters,

    /// Radius form with start equal to end has infinitely many solutions
    #[error("Full circle cannot be specified with R; use I/J")]
    AmbiguousFullCircle,

    /// A computed quantity was NaN or infinite
    #[error("Arc geometry is not finite")]
    NonFinite,
}

/// G-Code error type
///
/// Represents per-line problems found while interpreting a program. None of
/// these abort a parse; they are collected as diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GcodeError {
    /// Axis word with an unparseable numeric value
    #[error("Malformed token '{token}' at line {line_number}")]
    MalformedToken {
        /// The 1-based source line.
        line_number: usize,
        /// The raw token text.
        token: String,
    },

    /// G2/G3 move whose geometry could not be resolved
    #[error("Unresolvable arc at line {line_number}: {source}")]
    UnresolvableArc {
        /// The 1-based source line.
        line_number: usize,
        /// Why the arc failed.
        source: ArcError,
    },

    /// Both I/J and R on one arc line; the centre offsets are used
    #[error("Both I/J and R given at line {line_number}; using I/J")]
    ConflictingArcForm {
        /// The 1-based source line.
        line_number: usize,
    },

    /// Negative R interpreted under a fixed convention
    #[error("Negative R at line {line_number} interpreted as {mode} arc")]
    NegativeRadius {
        /// The 1-based source line.
        line_number: usize,
        /// Convention applied.
        mode: String,
    },

    /// Axis words on a line with no active motion mode
    #[error("Axis words without an active motion mode at line {line_number}")]
    MissingMotionMode {
        /// The 1-based source line.
        line_number: usize,
    },
}

impl GcodeError {
    /// Source line the error refers to
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedToken { line_number, .. }
            | Self::UnresolvableArc { line_number, .. }
            | Self::ConflictingArcForm { line_number }
            | Self::NegativeRadius { line_number, .. }
            | Self::MissingMotionMode { line_number } => *line_number,
        }
    }
}

/// View transform error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// Scale must be finite and strictly positive
    #[error("Invalid view scale: {scale}")]
    InvalidScale {
        /// The rejected scale.
        scale: f64,
    },

    /// Nothing to fit
    #[error("Cannot fit an empty bounding box")]
    EmptyBounds,

    /// Viewport dimensions must be finite and strictly positive
    #[error("Invalid viewport size {width}x{height}")]
    InvalidViewport {
        /// Viewport width in screen units.
        width: f64,
        /// Viewport height in screen units.
        height: f64,
    },
}

/// Main error type for NCView
///
/// Used where a caller wants a parse or view problem as a hard failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// G-Code error
    #[error(transparent)]
    Gcode(#[from] GcodeError),

    /// Arc error
    #[error(transparent)]
    Arc(#[from] ArcError),

    /// View error
    #[error(transparent)]
    View(#[from] ViewError),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
