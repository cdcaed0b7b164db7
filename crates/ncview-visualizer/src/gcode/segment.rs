//! Typed motion segments
//!
//! The renderer-agnostic output of a parse: straight moves and parametric
//! arcs with absolute endpoints, depth, and the originating source line.

use ncview_core::{MotionKind, Point2, Point3};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::arc::ArcGeometry;

/// Geometry of a segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    Line,
    Arc(ArcGeometry),
}

/// Colour class used by viewers
///
/// Feed moves are split by the sign of their depth: below zero the tool is
/// cutting, at or above zero it is travelling safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayClass {
    Rapid,
    Safe,
    Cut,
    Arc,
}

impl DisplayClass {
    pub const ALL: [DisplayClass; 4] = [
        DisplayClass::Rapid,
        DisplayClass::Safe,
        DisplayClass::Cut,
        DisplayClass::Arc,
    ];
}

impl fmt::Display for DisplayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rapid => write!(f, "rapid"),
            Self::Safe => write!(f, "safe"),
            Self::Cut => write!(f, "cut"),
            Self::Arc => write!(f, "arc"),
        }
    }
}

/// One straight or circular move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub motion: MotionKind,
    pub start: Point3,
    pub end: Point3,
    /// 1-based line in the source text
    pub source_line: usize,
    /// Tool depth the move ends at
    pub z_depth: f64,
}

impl Segment {
    pub fn line(motion: MotionKind, start: Point3, end: Point3, source_line: usize) -> Self {
        Self {
            kind: SegmentKind::Line,
            motion,
            start,
            end,
            source_line,
            z_depth: end.z,
        }
    }

    pub fn arc(
        motion: MotionKind,
        start: Point3,
        end: Point3,
        geometry: ArcGeometry,
        source_line: usize,
    ) -> Self {
        Self {
            kind: SegmentKind::Arc(geometry),
            motion,
            start,
            end,
            source_line,
            z_depth: end.z,
        }
    }

    pub fn is_arc(&self) -> bool {
        matches!(self.kind, SegmentKind::Arc(_))
    }

    pub fn is_rapid(&self) -> bool {
        self.motion == MotionKind::Rapid
    }

    pub fn arc_geometry(&self) -> Option<&ArcGeometry> {
        match &self.kind {
            SegmentKind::Arc(geometry) => Some(geometry),
            SegmentKind::Line => None,
        }
    }

    /// Arc centre; `None` for straight segments
    pub fn center(&self) -> Option<Point2> {
        self.arc_geometry().map(|g| g.center)
    }

    /// Arc direction; `None` for straight segments
    pub fn clockwise(&self) -> Option<bool> {
        self.arc_geometry().map(|g| g.clockwise)
    }

    pub fn display_class(&self) -> DisplayClass {
        match self.motion {
            MotionKind::Rapid => DisplayClass::Rapid,
            MotionKind::ClockwiseArc | MotionKind::CounterClockwiseArc => DisplayClass::Arc,
            MotionKind::Feed if self.z_depth < 0.0 => DisplayClass::Cut,
            MotionKind::Feed => DisplayClass::Safe,
        }
    }

    /// Point at parameter `t` in `[0, 1]`; Z is linear along the move
    pub fn point_at(&self, t: f64) -> Point3 {
        let z = self.start.z + (self.end.z - self.start.z) * t;
        match &self.kind {
            SegmentKind::Line => Point3::new(
                self.start.x + (self.end.x - self.start.x) * t,
                self.start.y + (self.end.y - self.start.y) * t,
                z,
            ),
            SegmentKind::Arc(geometry) => {
                if t >= 1.0 {
                    return self.end;
                }
                let p = geometry.point_at(t);
                Point3::new(p.x, p.y, z)
            }
        }
    }

    /// Path length in the XY plane
    pub fn length_xy(&self) -> f64 {
        match &self.kind {
            SegmentKind::Line => self.start.xy().distance_to(self.end.xy()),
            SegmentKind::Arc(geometry) => geometry.length(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.motion.gcode(), self.end)?;
        if let Some(center) = self.center() {
            write!(f, " around {}", center)?;
        }
        Ok(())
    }
}
