//! Toolpath viewing session
//!
//! Owns the segment list of the currently loaded program together with its
//! SVG cache and view transform. Replacing the program always re-parses in
//! full. Parses can run off the session lock: [`Visualizer::begin_parse`]
//! hands out a generation-tagged job, and [`Visualizer::commit`] drops any
//! result that a newer job has superseded.

use ncview_core::{ParseOptions, Point2, ViewError, ViewSettings};
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::toolpath_cache::ToolpathCache;
use super::viewport::{BoundingBox, ViewTransform};
use crate::gcode::pipeline::{parse_toolpath, Toolpath};
use crate::gcode::segment::DisplayClass;

/// A parse request detached from the session
#[derive(Debug, Clone)]
pub struct ParseJob {
    generation: u64,
    content_hash: u64,
    text: String,
    options: ParseOptions,
}

impl ParseJob {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the parse; needs no access to the session
    pub fn run(self) -> ParseOutcome {
        let toolpath = parse_toolpath(&self.text, &self.options);
        ParseOutcome {
            generation: self.generation,
            content_hash: self.content_hash,
            toolpath,
        }
    }
}

/// Result of a [`ParseJob`], ready to commit
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    generation: u64,
    content_hash: u64,
    toolpath: Toolpath,
}

impl ParseOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn toolpath(&self) -> &Toolpath {
        &self.toolpath
    }
}

#[derive(Debug)]
struct SessionState {
    options: ParseOptions,
    settings: ViewSettings,
    toolpath: Arc<Toolpath>,
    cache: ToolpathCache,
    committed_generation: u64,
    view: ViewTransform,
    viewport: (f64, f64),
}

/// Shared handle to one viewing session
///
/// Clones share the same state.
#[derive(Debug, Clone)]
pub struct Visualizer {
    state: Arc<RwLock<SessionState>>,
    latest_generation: Arc<AtomicU64>,
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new(ParseOptions::default(), ViewSettings::default())
    }
}

impl Visualizer {
    pub fn new(options: ParseOptions, settings: ViewSettings) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                options,
                settings,
                toolpath: Arc::new(Toolpath::empty()),
                cache: ToolpathCache::new(),
                committed_generation: 0,
                view: ViewTransform::identity(),
                viewport: (0.0, 0.0),
            })),
            latest_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Parse and install `text` unless it is already loaded
    ///
    /// Returns `true` when a new toolpath was installed.
    pub fn load(&self, text: &str) -> bool {
        let new_hash = content_hash(text);
        if !self.state.read().cache.needs_update(new_hash) {
            debug!("G-code hash unchanged, skipping parse");
            return false;
        }
        debug!("Parsing new G-code (hash: {})", new_hash);
        let job = self.begin_parse(text);
        self.commit(job.run())
    }

    /// Start a parse that supersedes every earlier one
    pub fn begin_parse(&self, text: &str) -> ParseJob {
        let generation = self.latest_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let options = self.state.read().options;
        ParseJob {
            generation,
            content_hash: content_hash(text),
            text: text.to_string(),
            options,
        }
    }

    /// Install a finished parse unless a newer one was started since
    pub fn commit(&self, outcome: ParseOutcome) -> bool {
        let latest = self.latest_generation.load(Ordering::SeqCst);
        let mut state = self.state.write();
        if outcome.generation != latest || outcome.generation <= state.committed_generation {
            debug!(
                "Discarding stale parse (generation {}, latest {})",
                outcome.generation, latest
            );
            return false;
        }

        let toolpath = outcome.toolpath;
        state
            .cache
            .update(outcome.content_hash, toolpath.segments.clone(), toolpath.bounds);
        let bounds = toolpath.bounds;
        debug!(
            "Bounds: x=[{:.2}, {:.2}], y=[{:.2}, {:.2}]",
            bounds.min.x, bounds.max.x, bounds.min.y, bounds.max.y
        );
        state.toolpath = Arc::new(toolpath);
        state.committed_generation = outcome.generation;
        true
    }

    /// Drop the loaded program
    pub fn clear(&self) {
        self.latest_generation.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.write();
        state.toolpath = Arc::new(Toolpath::empty());
        state.cache = ToolpathCache::new();
    }

    pub fn toolpath(&self) -> Arc<Toolpath> {
        Arc::clone(&self.state.read().toolpath)
    }

    pub fn bounds(&self) -> BoundingBox {
        self.state.read().toolpath.bounds
    }

    pub fn options(&self) -> ParseOptions {
        self.state.read().options
    }

    /// Change parse options; the next `load` re-parses even identical text
    pub fn set_options(&self, options: ParseOptions) {
        let mut state = self.state.write();
        state.options = options;
        state.cache.invalidate();
    }

    pub fn settings(&self) -> ViewSettings {
        self.state.read().settings
    }

    pub fn view(&self) -> ViewTransform {
        self.state.read().view
    }

    /// Fit the loaded toolpath into a `width` x `height` viewport
    pub fn fit_to_view(&self, width: f64, height: f64) -> Result<ViewTransform, ViewError> {
        let mut state = self.state.write();
        let settings = state.settings;
        let view = ViewTransform::fit(&state.toolpath.bounds, width, height, settings.fit_margin)?;
        let anchor = Point2::new(width / 2.0, height / 2.0);
        let view = view.clamped(settings.min_scale, settings.max_scale, anchor);
        state.view = view;
        state.viewport = (width, height);
        Ok(view)
    }

    pub fn zoom_in(&self) -> Result<ViewTransform, ViewError> {
        let step = self.state.read().settings.zoom_step;
        self.zoom_by(step)
    }

    pub fn zoom_out(&self) -> Result<ViewTransform, ViewError> {
        let step = self.state.read().settings.zoom_step;
        self.zoom_by(1.0 / step)
    }

    /// Zoom about the viewport centre, clamped to the scale limits
    pub fn zoom_by(&self, factor: f64) -> Result<ViewTransform, ViewError> {
        let mut state = self.state.write();
        let (width, height) = state.viewport;
        let anchor = Point2::new(width / 2.0, height / 2.0);
        let view = state
            .view
            .zoom_about(factor, anchor)?
            .clamped(state.settings.min_scale, state.settings.max_scale, anchor);
        state.view = view;
        Ok(view)
    }

    /// Pan by a screen-space delta
    pub fn pan(&self, dx: f64, dy: f64) -> ViewTransform {
        let mut state = self.state.write();
        state.view = state.view.pan_by(dx, dy);
        state.view
    }

    pub fn pan_left(&self) -> ViewTransform {
        let (dx, _) = self.pan_step();
        self.pan(-dx, 0.0)
    }

    pub fn pan_right(&self) -> ViewTransform {
        let (dx, _) = self.pan_step();
        self.pan(dx, 0.0)
    }

    pub fn pan_up(&self) -> ViewTransform {
        let (_, dy) = self.pan_step();
        self.pan(0.0, -dy)
    }

    pub fn pan_down(&self) -> ViewTransform {
        let (_, dy) = self.pan_step();
        self.pan(0.0, dy)
    }

    fn pan_step(&self) -> (f64, f64) {
        let state = self.state.read();
        let (width, height) = state.viewport;
        (
            width * state.settings.pan_fraction,
            height * state.settings.pan_fraction,
        )
    }

    pub fn toolpath_svg(&self) -> String {
        self.state.read().cache.toolpath_svg().to_string()
    }

    pub fn class_svg(&self, class: DisplayClass) -> String {
        self.state.read().cache.class_svg(class).to_string()
    }

    pub fn svg_document(
        &self,
        width: f64,
        height: f64,
        colour_for: impl Fn(DisplayClass) -> String,
    ) -> String {
        let state = self.state.read();
        state
            .cache
            .svg_document(width, height, state.settings.fit_margin, colour_for)
    }
}

fn content_hash(text: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_skips_identical_text() {
        let vis = Visualizer::default();
        assert!(vis.load("G1 X10 Y5\n"));
        assert!(!vis.load("G1 X10 Y5\n"));
        assert_eq!(vis.toolpath().segments.len(), 1);

        assert!(vis.load("G1 X1\nG1 X2\n"));
        assert_eq!(vis.toolpath().segments.len(), 2);
    }

    #[test]
    fn test_empty_program_loads() {
        let vis = Visualizer::default();
        assert!(vis.load(""));
        assert!(!vis.load(""));
        assert!(vis.bounds().is_empty());
        assert_eq!(vis.fit_to_view(100.0, 100.0), Err(ViewError::EmptyBounds));
    }

    #[test]
    fn test_newer_parse_wins() {
        let vis = Visualizer::default();
        let old = vis.begin_parse("G1 X1\n");
        let new = vis.begin_parse("G1 X1\nG1 X2\nG1 X3\n");

        let new_outcome = new.run();
        let old_outcome = old.run();
        assert!(vis.commit(new_outcome));
        assert!(!vis.commit(old_outcome));
        assert_eq!(vis.toolpath().segments.len(), 3);
    }

    #[test]
    fn test_stale_commit_before_newer_finishes() {
        let vis = Visualizer::default();
        let old = vis.begin_parse("G1 X1\n");
        let _pending = vis.begin_parse("G1 X2\n");
        assert!(!vis.commit(old.run()));
        assert!(vis.toolpath().is_empty());
    }

    #[test]
    fn test_set_options_forces_reparse() {
        let vis = Visualizer::default();
        assert!(vis.load("G0 X1 Y1\nG1 Z-1\n"));
        assert_eq!(vis.toolpath().segments.len(), 1);

        vis.set_options(ParseOptions {
            emit_plunge_segments: true,
            ..ParseOptions::default()
        });
        assert!(vis.load("G0 X1 Y1\nG1 Z-1\n"));
        assert_eq!(vis.toolpath().segments.len(), 2);
    }

    #[test]
    fn test_fit_zoom_and_pan() {
        let vis = Visualizer::default();
        vis.load("G1 X100 Y50\n");
        let view = vis.fit_to_view(800.0, 600.0).unwrap();
        assert!((view.scale() - 7.2).abs() < 1e-9);

        let zoomed = vis.zoom_in().unwrap();
        assert!((zoomed.scale() - 7.92).abs() < 1e-9);
        let centre = Point2::new(400.0, 300.0);
        let before = view.unproject(centre);
        let after = zoomed.unproject(centre);
        assert!((before.x - after.x).abs() < 1e-9);

        let panned = vis.pan_right();
        assert!((panned.translate().x - zoomed.translate().x - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let settings = ViewSettings {
            max_scale: 8.0,
            ..ViewSettings::default()
        };
        let vis = Visualizer::new(ParseOptions::default(), settings);
        vis.load("G1 X100 Y50\n");
        vis.fit_to_view(800.0, 600.0).unwrap();
        vis.zoom_in().unwrap();
        let view = vis.zoom_in().unwrap();
        assert_eq!(view.scale(), 8.0);
    }

    #[test]
    fn test_clear_allows_reload() {
        let vis = Visualizer::default();
        assert!(vis.load("G1 X1\n"));
        vis.clear();
        assert!(vis.load("G1 X1\n"));
        assert_eq!(vis.toolpath().segments.len(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let vis = Visualizer::default();
        let other = vis.clone();
        vis.load("G1 X1\n");
        assert_eq!(other.toolpath().segments.len(), 1);
        other.clear();
        assert!(vis.toolpath().is_empty());
    }
}
