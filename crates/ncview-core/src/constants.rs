//! Shared numeric constants

/// Default relative tolerance between the start and end radius of an I/J arc.
pub const ARC_RADIUS_TOLERANCE: f64 = 1e-3;

/// Absolute distance under which two points are treated as coincident.
pub const POINT_EPSILON: f64 = 1e-9;

/// Radii at or below this length are degenerate.
pub const MIN_ARC_RADIUS: f64 = 1e-9;

/// Fraction of the viewport left empty on each side by fit-to-view.
pub const VIEW_PADDING: f64 = 0.05;

/// Zoom limits applied by interactive consumers.
pub const MIN_VIEW_SCALE: f64 = 0.001;
pub const MAX_VIEW_SCALE: f64 = 10_000.0;

/// Multiplicative step for a single zoom in/out action.
pub const ZOOM_STEP: f64 = 1.1;

/// Fraction of the viewport moved by one pan action.
pub const PAN_FRACTION: f64 = 0.1;

/// Screen length covered by one tessellation step of an arc.
pub const ARC_PIXELS_PER_STEP: f64 = 5.0;

/// Lower bound on tessellation steps for any arc.
pub const MIN_ARC_STEPS: usize = 10;

/// Upper bound on tessellation steps for any arc.
pub const MAX_ARC_STEPS: usize = 4096;
