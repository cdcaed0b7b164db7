use ncview_core::Point2;
use std::fmt::Write;
use tracing::{debug, trace};

use super::viewport::BoundingBox;
use crate::gcode::segment::{DisplayClass, Segment, SegmentKind};

/// SVG path strings for a segment list, rebuilt only when the content changes
#[derive(Debug, Default, Clone)]
pub struct ToolpathCache {
    content_hash: Option<u64>,
    segments: Vec<Segment>,
    bounds: Option<BoundingBox>,
    cached_path: String,
    cached_rapid_path: String,
    cached_safe_path: String,
    cached_cut_path: String,
    cached_arc_path: String,
}

/// Writes one SVG path, starting a new subpath on discontinuities
struct PathWriter<'a> {
    out: &'a mut String,
    last: Option<Point2>,
}

impl<'a> PathWriter<'a> {
    fn new(out: &'a mut String) -> Self {
        Self { out, last: None }
    }

    fn move_to_if_needed(&mut self, from: Point2) {
        if !self.last.is_some_and(|last| last.approx_eq(from)) {
            let _ = write!(self.out, "M {:.3} {:.3} ", from.x, flip_y(from.y));
        }
    }

    fn segment(&mut self, segment: &Segment) {
        let from = segment.start.xy();
        let to = segment.end.xy();
        self.move_to_if_needed(from);

        match &segment.kind {
            SegmentKind::Line => {
                let _ = write!(self.out, "L {:.3} {:.3} ", to.x, flip_y(to.y));
            }
            SegmentKind::Arc(geometry) => {
                // Y is negated on output, which turns model clockwise into
                // the positive-angle SVG direction
                let sweep_flag = u8::from(geometry.clockwise);
                if geometry.is_full_circle() {
                    let half = geometry.point_at(0.5);
                    for p in [half, to] {
                        let _ = write!(
                            self.out,
                            "A {:.3} {:.3} 0 0 {} {:.3} {:.3} ",
                            geometry.radius, geometry.radius, sweep_flag, p.x, flip_y(p.y)
                        );
                    }
                } else {
                    let large_arc = u8::from(geometry.sweep.abs() > std::f64::consts::PI);
                    let _ = write!(
                        self.out,
                        "A {:.3} {:.3} 0 {} {} {:.3} {:.3} ",
                        geometry.radius, geometry.radius, large_arc, sweep_flag, to.x, flip_y(to.y)
                    );
                }
            }
        }
        self.last = Some(to);
    }
}

/// SVG Y grows downward; also keeps `0` from printing as `-0.000`
fn flip_y(y: f64) -> f64 {
    if y == 0.0 {
        0.0
    } else {
        -y
    }
}

impl ToolpathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True unless the paths were built from text with this hash
    pub fn needs_update(&self, new_hash: u64) -> bool {
        self.content_hash != Some(new_hash)
    }

    /// Forget the content hash so the next `needs_update` is true
    pub fn invalidate(&mut self) {
        self.content_hash = None;
    }

    pub fn update(&mut self, new_hash: u64, segments: Vec<Segment>, bounds: BoundingBox) {
        self.content_hash = Some(new_hash);
        self.segments = segments;
        self.bounds = (!bounds.is_empty()).then_some(bounds);
        self.rebuild_paths();
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All non-rapid moves as one path
    pub fn toolpath_svg(&self) -> &str {
        &self.cached_path
    }

    pub fn class_svg(&self, class: DisplayClass) -> &str {
        match class {
            DisplayClass::Rapid => &self.cached_rapid_path,
            DisplayClass::Safe => &self.cached_safe_path,
            DisplayClass::Cut => &self.cached_cut_path,
            DisplayClass::Arc => &self.cached_arc_path,
        }
    }

    /// Standalone SVG document with one stroked path per display class
    ///
    /// The view box is the model bounds (Y flipped) grown by `margin` of
    /// the larger dimension.
    pub fn svg_document(
        &self,
        width: f64,
        height: f64,
        margin: f64,
        colour_for: impl Fn(DisplayClass) -> String,
    ) -> String {
        let mut doc = String::with_capacity(self.cached_path.len() * 2 + 256);

        let (min_x, min_y, view_w, view_h) = match self.bounds {
            Some(bounds) => {
                let pad = bounds.width().max(bounds.height()).max(1.0) * margin;
                let padded = bounds.expanded(pad);
                (
                    padded.min.x,
                    flip_y(padded.max.y),
                    padded.width(),
                    padded.height(),
                )
            }
            None => (0.0, 0.0, width, height),
        };

        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{:.3} {:.3} {:.3} {:.3}">"#,
            width, height, min_x, min_y, view_w, view_h
        );
        for class in DisplayClass::ALL {
            let path = self.class_svg(class);
            if path.is_empty() {
                continue;
            }
            let _ = writeln!(
                doc,
                r#"  <path class="{}" d="{}" fill="none" stroke="{}" stroke-width="1" vector-effect="non-scaling-stroke"/>"#,
                class,
                path.trim_end(),
                colour_for(class)
            );
        }
        doc.push_str("</svg>\n");
        doc
    }

    fn rebuild_paths(&mut self) {
        debug!("Rebuilding SVG paths from {} segments", self.segments.len());

        self.cached_path.clear();
        self.cached_rapid_path.clear();
        self.cached_safe_path.clear();
        self.cached_cut_path.clear();
        self.cached_arc_path.clear();

        if self.segments.is_empty() {
            debug!("No segments to render");
            return;
        }

        self.cached_path.reserve(self.segments.len() * 25);

        let mut all = PathWriter::new(&mut self.cached_path);
        let mut rapid = PathWriter::new(&mut self.cached_rapid_path);
        let mut safe = PathWriter::new(&mut self.cached_safe_path);
        let mut cut = PathWriter::new(&mut self.cached_cut_path);
        let mut arc = PathWriter::new(&mut self.cached_arc_path);
        let mut arc_count = 0;

        for segment in &self.segments {
            let class = segment.display_class();
            trace!("Segment line {}: {} ({})", segment.source_line, segment, class);
            match class {
                DisplayClass::Rapid => {
                    rapid.segment(segment);
                    all.last = None;
                    continue;
                }
                DisplayClass::Safe => safe.segment(segment),
                DisplayClass::Cut => cut.segment(segment),
                DisplayClass::Arc => {
                    arc_count += 1;
                    arc.segment(segment);
                }
            }
            all.segment(segment);
        }

        debug!(
            "Paths rebuilt: {} arcs - total path sizes: toolpath={}, rapid={}, safe={}, cut={}, arc={}",
            arc_count,
            self.cached_path.len(),
            self.cached_rapid_path.len(),
            self.cached_safe_path.len(),
            self.cached_cut_path.len(),
            self.cached_arc_path.len()
        );
    }
}
