//! Data models for positions and motion classification
//!
//! This module provides:
//! - 2D and 3D points in model units
//! - The closed set of motion kinds recognized by the parser

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::POINT_EPSILON;

/// A point in the XY plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Midpoint between this point and another
    pub fn midpoint(&self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// True when both coordinates are within [`POINT_EPSILON`]
    pub fn approx_eq(&self, other: Point2) -> bool {
        (self.x - other.x).abs() <= POINT_EPSILON && (self.y - other.y).abs() <= POINT_EPSILON
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A point in machine space; Z is the tool depth
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Projection onto the XY plane
    pub fn xy(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn approx_eq(&self, other: Point3) -> bool {
        self.xy().approx_eq(other.xy()) && (self.z - other.z).abs() <= POINT_EPSILON
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

/// Motion mode of a G-code line (modal group 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    /// G0 rapid positioning
    Rapid,
    /// G1 linear feed
    Feed,
    /// G2 clockwise arc
    ClockwiseArc,
    /// G3 counter-clockwise arc
    CounterClockwiseArc,
}

impl MotionKind {
    /// Map a G-code number to its motion kind
    pub fn from_gcode_number(number: u32) -> Option<Self> {
        match number {
            0 => Some(Self::Rapid),
            1 => Some(Self::Feed),
            2 => Some(Self::ClockwiseArc),
            3 => Some(Self::CounterClockwiseArc),
            _ => None,
        }
    }

    /// Canonical short G word, e.g. `G2`
    pub fn gcode(&self) -> &'static str {
        match self {
            Self::Rapid => "G0",
            Self::Feed => "G1",
            Self::ClockwiseArc => "G2",
            Self::CounterClockwiseArc => "G3",
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self, Self::ClockwiseArc | Self::CounterClockwiseArc)
    }

    /// `Some(true)` for G2, `Some(false)` for G3, `None` for straight moves
    pub fn clockwise(&self) -> Option<bool> {
        match self {
            Self::ClockwiseArc => Some(true),
            Self::CounterClockwiseArc => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rapid => write!(f, "Rapid positioning (G0)"),
            Self::Feed => write!(f, "Linear interpolation (G1)"),
            Self::ClockwiseArc => write!(f, "Clockwise arc (G2)"),
            Self::CounterClockwiseArc => write!(f, "Counter-clockwise arc (G3)"),
        }
    }
}
