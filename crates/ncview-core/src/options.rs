//! Parser and tessellation options
//!
//! These are plain data; the settings crate persists them and the visualizer
//! crate consumes them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ARC_PIXELS_PER_STEP, ARC_RADIUS_TOLERANCE, MAX_ARC_STEPS, MAX_VIEW_SCALE, MIN_ARC_STEPS,
    MIN_VIEW_SCALE, PAN_FRACTION, VIEW_PADDING, ZOOM_STEP,
};

/// Which of the two radius-form arc solutions a negative R selects
///
/// Dialects disagree here. `FarSide` (the arc sweeping more than 180 degrees)
/// is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeRadiusMode {
    #[default]
    FarSide,
    NearSide,
}

impl fmt::Display for NegativeRadiusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FarSide => write!(f, "far_side"),
            Self::NearSide => write!(f, "near_side"),
        }
    }
}

/// Options controlling how text is turned into segments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Allowed relative difference between start and end radius of an I/J arc
    pub arc_radius_tolerance: f64,
    /// Interpretation of a negative R word
    pub negative_radius: NegativeRadiusMode,
    /// Emit a straight segment for Z-only moves instead of only updating depth
    pub emit_plunge_segments: bool,
    /// Skip a leading `N<digits>` word before the command
    pub strip_line_numbers: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            arc_radius_tolerance: ARC_RADIUS_TOLERANCE,
            negative_radius: NegativeRadiusMode::FarSide,
            emit_plunge_segments: false,
            strip_line_numbers: true,
        }
    }
}

/// Arc flattening density for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TessellationOptions {
    /// Screen length covered by one step
    pub pixels_per_step: f64,
    pub min_steps: usize,
    pub max_steps: usize,
}

impl Default for TessellationOptions {
    fn default() -> Self {
        Self {
            pixels_per_step: ARC_PIXELS_PER_STEP,
            min_steps: MIN_ARC_STEPS,
            max_steps: MAX_ARC_STEPS,
        }
    }
}

/// Interactive view limits and arc density
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Fraction of the viewport left free on each side by fit-to-view
    pub fit_margin: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
    pub pan_fraction: f64,
    pub arc_pixels_per_step: f64,
    pub min_arc_steps: usize,
    pub max_arc_steps: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            fit_margin: VIEW_PADDING,
            min_scale: MIN_VIEW_SCALE,
            max_scale: MAX_VIEW_SCALE,
            zoom_step: ZOOM_STEP,
            pan_fraction: PAN_FRACTION,
            arc_pixels_per_step: ARC_PIXELS_PER_STEP,
            min_arc_steps: MIN_ARC_STEPS,
            max_arc_steps: MAX_ARC_STEPS,
        }
    }
}

impl ViewSettings {
    pub fn tessellation(&self) -> TessellationOptions {
        TessellationOptions {
            pixels_per_step: self.arc_pixels_per_step,
            min_steps: self.min_arc_steps,
            max_steps: self.max_arc_steps,
        }
    }
}
