//! Arc resolution for G2/G3 moves
//!
//! Reconstructs the circle behind an arc move from either centre offsets
//! (I/J, relative to the start point) or a signed radius (R). Arcs are kept
//! parametric; renderers tessellate them at whatever density they need.
//!
//! Angles follow the usual mathematical convention in the XY plane: positive
//! is counter-clockwise, so G2 sweeps negative and G3 sweeps positive.

use ncview_core::constants::{MIN_ARC_RADIUS, POINT_EPSILON};
use ncview_core::{ArcError, NegativeRadiusMode, ParseOptions, Point2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::trace;

/// How an arc line describes its circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcSpec {
    /// Centre offset from the start point
    CenterOffset { i: f64, j: f64 },
    /// Signed radius; negative selects the other solution
    Radius(f64),
}

/// A fully resolved circular arc
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub center: Point2,
    pub radius: f64,
    /// Angle of the start point around the centre, in radians
    pub start_angle: f64,
    /// Signed angular span; negative for clockwise
    pub sweep: f64,
    pub clockwise: bool,
}

impl ArcGeometry {
    /// Angle of the end point, possibly outside `(-PI, PI]`
    pub fn end_angle(&self) -> f64 {
        self.start_angle + self.sweep
    }

    pub fn is_full_circle(&self) -> bool {
        (self.sweep.abs() - TAU).abs() <= POINT_EPSILON
    }

    /// Length along the arc
    pub fn length(&self) -> f64 {
        self.sweep.abs() * self.radius
    }

    /// Point at parameter `t` in `[0, 1]` along the sweep
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.sweep * t;
        Point2::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
        )
    }

    /// Whether the swept range passes through `angle`
    pub fn contains_angle(&self, angle: f64) -> bool {
        if self.sweep.abs() >= TAU - POINT_EPSILON {
            return true;
        }
        let offset = if self.sweep >= 0.0 {
            (angle - self.start_angle).rem_euclid(TAU)
        } else {
            (self.start_angle - angle).rem_euclid(TAU)
        };
        offset <= self.sweep.abs() + POINT_EPSILON
    }

    /// Points where the arc crosses 0, 90, 180 or 270 degrees
    ///
    /// These are the axis-aligned extremes that endpoint-only bounds miss.
    pub fn extremal_points(&self) -> Vec<Point2> {
        [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2]
            .into_iter()
            .filter(|angle| self.contains_angle(*angle))
            .map(|angle| {
                Point2::new(
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                )
            })
            .collect()
    }
}

/// Resolve an arc from its start, end, direction and circle description
///
/// # Errors
///
/// Returns an [`ArcError`] when the circle does not exist (chord longer than
/// the diameter), is degenerate (zero radius), or when the I/J centre is not
/// equidistant from both endpoints within `options.arc_radius_tolerance`.
pub fn resolve_arc(
    start: Point2,
    end: Point2,
    clockwise: bool,
    spec: ArcSpec,
    options: &ParseOptions,
) -> Result<ArcGeometry, ArcError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ArcError::NonFinite);
    }

    let (center, full_circle) = match spec {
        ArcSpec::CenterOffset { i, j } => {
            let center = Point2::new(start.x + i, start.y + j);
            let start_radius = start.distance_to(center);
            if start_radius <= MIN_ARC_RADIUS {
                return Err(ArcError::ZeroRadius);
            }
            let end_radius = end.distance_to(center);
            let tolerance = start_radius * options.arc_radius_tolerance;
            if (end_radius - start_radius).abs() > tolerance {
                return Err(ArcError::RadiusMismatch {
                    start_radius,
                    end_radius,
                    tolerance,
                });
            }
            (center, start.approx_eq(end))
        }
        ArcSpec::Radius(radius) => {
            if start.approx_eq(end) {
                return Err(ArcError::AmbiguousFullCircle);
            }
            let center = center_from_radius(
                start,
                end,
                radius,
                clockwise,
                options.negative_radius,
                options.arc_radius_tolerance,
            )?;
            (center, false)
        }
    };

    let radius = start.distance_to(center);
    let start_angle = (start.y - center.y).atan2(start.x - center.x);
    let sweep = if full_circle {
        if clockwise {
            -TAU
        } else {
            TAU
        }
    } else {
        let end_angle = (end.y - center.y).atan2(end.x - center.x);
        normalize_end_angle(start_angle, end_angle, clockwise) - start_angle
    };

    if !radius.is_finite() || !sweep.is_finite() {
        return Err(ArcError::NonFinite);
    }

    trace!(
        "Arc: from=({:.3},{:.3}) to=({:.3},{:.3}) center=({:.3},{:.3}) r={:.4} sweep={:.4} cw={}",
        start.x,
        start.y,
        end.x,
        end.y,
        center.x,
        center.y,
        radius,
        sweep,
        clockwise
    );

    Ok(ArcGeometry {
        center,
        radius,
        start_angle,
        sweep,
        clockwise,
    })
}

/// Adjust `end_angle` so the sweep from `start_angle` runs in the commanded
/// direction
///
/// Clockwise motion needs `end < start`; counter-clockwise needs
/// `end > start`. Otherwise one full turn is added or removed.
pub fn normalize_end_angle(start_angle: f64, end_angle: f64, clockwise: bool) -> f64 {
    if clockwise {
        if end_angle >= start_angle {
            end_angle - TAU
        } else {
            end_angle
        }
    } else if end_angle <= start_angle {
        end_angle + TAU
    } else {
        end_angle
    }
}

/// Z component of `(start - center) x (end - center)`
///
/// Positive when travelling from start to end the short way around `center`
/// is counter-clockwise, negative when it is clockwise.
pub fn cross_z(start: Point2, end: Point2, center: Point2) -> f64 {
    let (v1x, v1y) = (start.x - center.x, start.y - center.y);
    let (v2x, v2y) = (end.x - center.x, end.y - center.y);
    v1x * v2y - v1y * v2x
}

/// The two centres of radius `|radius|` through `start` and `end`
///
/// The first candidate lies to the left of the start->end chord, the second
/// to the right. They coincide for a half circle.
pub fn candidate_centers(
    start: Point2,
    end: Point2,
    radius: f64,
    tolerance: f64,
) -> Result<(Point2, Point2), ArcError> {
    let r = radius.abs();
    if !r.is_finite() {
        return Err(ArcError::NonFinite);
    }
    if r <= MIN_ARC_RADIUS {
        return Err(ArcError::ZeroRadius);
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let chord = dx.hypot(dy);
    if chord <= POINT_EPSILON {
        return Err(ArcError::AmbiguousFullCircle);
    }

    let half = chord / 2.0;
    let h_squared = r * r - half * half;
    let h = if h_squared >= 0.0 {
        h_squared.sqrt()
    } else if chord - 2.0 * r <= r * tolerance {
        // Half circle written with rounded coordinates
        0.0
    } else {
        return Err(ArcError::ChordTooLong { chord, radius: r });
    };

    let mid = start.midpoint(end);
    let (ux, uy) = (-dy / chord, dx / chord);
    Ok((
        Point2::new(mid.x + h * ux, mid.y + h * uy),
        Point2::new(mid.x - h * ux, mid.y - h * uy),
    ))
}

/// Pick the radius-form centre matching the commanded direction
///
/// A positive radius selects the arc of at most 180 degrees, whose centre
/// gives a cross product of the requested sign (negative for clockwise). A
/// negative radius selects the other centre under
/// [`NegativeRadiusMode::FarSide`] and is treated as positive under
/// [`NegativeRadiusMode::NearSide`].
pub fn center_from_radius(
    start: Point2,
    end: Point2,
    radius: f64,
    clockwise: bool,
    mode: NegativeRadiusMode,
    tolerance: f64,
) -> Result<Point2, ArcError> {
    let (left, right) = candidate_centers(start, end, radius, tolerance)?;
    let near = if matches_direction(start, end, left, clockwise) {
        left
    } else {
        right
    };
    let far = if near == left { right } else { left };

    if radius < 0.0 && mode == NegativeRadiusMode::FarSide {
        Ok(far)
    } else {
        Ok(near)
    }
}

/// Whether the short arc around `center` runs in the commanded direction
pub fn matches_direction(start: Point2, end: Point2, center: Point2, clockwise: bool) -> bool {
    let cross = cross_z(start, end, center);
    if clockwise {
        cross < 0.0
    } else {
        cross > 0.0
    }
}
