//! Zoom-dependent arc flattening
//!
//! Segments keep arcs parametric; renderers that only draw polylines call
//! into here with their current scale so the step count follows the
//! on-screen arc length.

use ncview_core::{Point2, Point3, TessellationOptions};

use crate::gcode::arc::ArcGeometry;
use crate::gcode::segment::{Segment, SegmentKind};

/// Number of straight steps for an arc drawn at `scale` pixels per unit
pub fn arc_step_count(geometry: &ArcGeometry, scale: f64, options: &TessellationOptions) -> usize {
    let min_steps = options.min_steps.max(1);
    let max_steps = options.max_steps.max(min_steps);
    let screen_length = geometry.length() * scale;
    if !screen_length.is_finite() || options.pixels_per_step <= 0.0 {
        return min_steps;
    }
    let steps = (screen_length / options.pixels_per_step).ceil() as usize;
    steps.clamp(min_steps, max_steps)
}

/// Points along an arc, both ends included
pub fn tessellate_arc(
    geometry: &ArcGeometry,
    scale: f64,
    options: &TessellationOptions,
) -> Vec<Point2> {
    let steps = arc_step_count(geometry, scale, options);
    (0..=steps)
        .map(|i| geometry.point_at(i as f64 / steps as f64))
        .collect()
}

/// Polyline for any segment; Z is interpolated linearly along arcs
///
/// The last point is always exactly `segment.end`.
pub fn flatten_segment(
    segment: &Segment,
    scale: f64,
    options: &TessellationOptions,
) -> Vec<Point3> {
    match &segment.kind {
        SegmentKind::Line => vec![segment.start, segment.end],
        SegmentKind::Arc(geometry) => {
            let steps = arc_step_count(geometry, scale, options);
            let mut points: Vec<Point3> = (0..steps)
                .map(|i| segment.point_at(i as f64 / steps as f64))
                .collect();
            points.push(segment.end);
            points
        }
    }
}

/// Flatten a whole segment list into one polyline per segment
pub fn flatten_toolpath(
    segments: &[Segment],
    scale: f64,
    options: &TessellationOptions,
) -> Vec<Vec<Point3>> {
    segments
        .iter()
        .map(|segment| flatten_segment(segment, scale, options))
        .collect()
}
