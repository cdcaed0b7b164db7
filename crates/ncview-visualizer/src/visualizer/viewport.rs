//! Bounds and model-to-screen projection for 2D toolpath rendering.

use ncview_core::constants::POINT_EPSILON;
use ncview_core::{Point2, ViewError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::gcode::segment::Segment;

/// Axis-aligned extent of a toolpath in model units.
///
/// The empty box has `min = +inf` and `max = -inf`, so any point included
/// into it becomes its only member. It serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point2,
    pub max: Point2,
}

/// Serialized form of a non-empty box
#[derive(Serialize, Deserialize)]
struct Extent {
    min: Point2,
    max: Point2,
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extent = (!self.is_empty()).then_some(Extent {
            min: self.min,
            max: self.max,
        });
        extent.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BoundingBox {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let extent = Option::<Extent>::deserialize(deserializer)?;
        Ok(extent.map_or(Self::EMPTY, |e| Self::new(e.min, e.max)))
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        min: Point2 {
            x: f64::INFINITY,
            y: f64::INFINITY,
        },
        max: Point2 {
            x: f64::NEG_INFINITY,
            y: f64::NEG_INFINITY,
        },
    };

    pub fn new(min: Point2, max: Point2) -> Self {
        Self {
            min: Point2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Point2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    pub fn from_point(p: Point2) -> Self {
        Self { min: p, max: p }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y)
    }

    pub fn include(&mut self, p: Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        if other.is_empty() {
            return *self;
        }
        let mut merged = *self;
        merged.include(other.min);
        merged.include(other.max);
        merged
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.x - self.min.x
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.max.y - self.min.y
        }
    }

    pub fn center(&self) -> Option<Point2> {
        (!self.is_empty()).then(|| self.min.midpoint(self.max))
    }

    pub fn contains(&self, p: Point2) -> bool {
        !self.is_empty()
            && p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
    }

    /// Grow every side by `amount` model units.
    pub fn expanded(&self, amount: f64) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        BoundingBox {
            min: Point2::new(self.min.x - amount, self.min.y - amount),
            max: Point2::new(self.max.x + amount, self.max.y + amount),
        }
    }

    fn include_segment(&mut self, segment: &Segment) {
        self.include(segment.start.xy());
        self.include(segment.end.xy());
        if let Some(geometry) = segment.arc_geometry() {
            for p in geometry.extremal_points() {
                self.include(p);
            }
        }
    }
}

/// Extent of every segment, arcs included up to their cardinal extremes.
pub fn compute_bounds(segments: &[Segment]) -> BoundingBox {
    let mut bounds = BoundingBox::EMPTY;
    for segment in segments {
        bounds.include_segment(segment);
    }
    bounds
}

/// Extent of the material-affecting moves only (rapids skipped).
pub fn compute_cutting_bounds(segments: &[Segment]) -> BoundingBox {
    let mut bounds = BoundingBox::EMPTY;
    for segment in segments.iter().filter(|s| !s.is_rapid()) {
        bounds.include_segment(segment);
    }
    bounds
}

/// Lowest and highest Z over all segment endpoints.
pub fn depth_range(segments: &[Segment]) -> Option<(f64, f64)> {
    segments
        .iter()
        .flat_map(|s| [s.start.z, s.end.z])
        .fold(None, |acc, z| match acc {
            None => Some((z, z)),
            Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
        })
}

/// Uniform scale plus translation from model space to screen space.
///
/// Screen Y grows downward, so model Y is negated:
/// `sx = x * scale + tx`, `sy = -y * scale + ty`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    scale: f64,
    translate: Point2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn new(scale: f64, translate: Point2) -> Result<Self, ViewError> {
        validate_scale(scale)?;
        Ok(Self { scale, translate })
    }

    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            translate: Point2::ORIGIN,
        }
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn translate(&self) -> Point2 {
        self.translate
    }

    pub fn project(&self, p: Point2) -> Point2 {
        Point2::new(
            p.x * self.scale + self.translate.x,
            -p.y * self.scale + self.translate.y,
        )
    }

    pub fn unproject(&self, screen: Point2) -> Point2 {
        Point2::new(
            (screen.x - self.translate.x) / self.scale,
            -(screen.y - self.translate.y) / self.scale,
        )
    }

    /// Shift by a screen-space delta.
    pub fn pan_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            scale: self.scale,
            translate: Point2::new(self.translate.x + dx, self.translate.y + dy),
        }
    }

    /// Multiply the scale by `factor` keeping the model point under
    /// `anchor` (screen space) fixed.
    pub fn zoom_about(&self, factor: f64, anchor: Point2) -> Result<Self, ViewError> {
        let scale = self.scale * factor;
        validate_scale(scale)?;
        Ok(self.rescaled_about(scale, anchor))
    }

    /// Clamp the scale into `[min, max]`, keeping `anchor` fixed.
    pub fn clamped(&self, min: f64, max: f64, anchor: Point2) -> Self {
        if !(min <= max) {
            return *self;
        }
        let target = self.scale.clamp(min, max);
        if target == self.scale || validate_scale(target).is_err() {
            return *self;
        }
        self.rescaled_about(target, anchor)
    }

    fn rescaled_about(&self, scale: f64, anchor: Point2) -> Self {
        let model = self.unproject(anchor);
        Self {
            scale,
            translate: Point2::new(anchor.x - model.x * scale, anchor.y + model.y * scale),
        }
    }

    /// Transform that centres `bounds` in a `width` x `height` viewport.
    ///
    /// `margin` is the fraction of each viewport dimension left free on
    /// every side. A box that is flat along one axis is fitted on the other
    /// axis only; a single point keeps scale 1.
    pub fn fit(
        bounds: &BoundingBox,
        width: f64,
        height: f64,
        margin: f64,
    ) -> Result<Self, ViewError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ViewError::InvalidViewport { width, height });
        }
        let center = bounds.center().ok_or(ViewError::EmptyBounds)?;

        let fill = (1.0 - 2.0 * margin).clamp(POINT_EPSILON, 1.0);
        let bw = bounds.width();
        let bh = bounds.height();
        let flat_x = bw <= POINT_EPSILON;
        let flat_y = bh <= POINT_EPSILON;

        let scale = match (flat_x, flat_y) {
            (true, true) => 1.0,
            (true, false) => height * fill / bh,
            (false, true) => width * fill / bw,
            (false, false) => (width * fill / bw).min(height * fill / bh),
        };
        validate_scale(scale)?;

        Ok(Self {
            scale,
            translate: Point2::new(
                width / 2.0 - center.x * scale,
                height / 2.0 + center.y * scale,
            ),
        })
    }
}

fn validate_scale(scale: f64) -> Result<(), ViewError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(ViewError::InvalidScale { scale })
    }
}
