//! # NCView
//!
//! G-code interpretation and toolpath geometry for NC file viewers.
//!
//! ## Architecture
//!
//! NCView is organized as a workspace with multiple crates:
//!
//! 1. **ncview-core** - Points, motion kinds, parse options, error taxonomy
//! 2. **ncview-visualizer** - Tokenizer, modal state, arcs, segments, bounds, projection
//! 3. **ncview-settings** - Viewer configuration persisted as JSON or TOML
//! 4. **ncview** - Command-line front end that ties the crates together

pub use ncview_core::{
    ArcError, Error, GcodeError, MotionKind, NegativeRadiusMode, ParseOptions, Point2, Point3,
    Result, TessellationOptions, ViewError, ViewSettings,
};

pub use ncview_visualizer::{
    compute_bounds, depth_range, parse_gcode, parse_toolpath, BoundingBox, Diagnostic,
    DisplayClass, Segment, SegmentKind, Severity, Toolpath, ViewTransform, Visualizer,
};

pub use ncview_settings::{DisplaySettings, SettingsError, ViewerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Logs go to stderr so that JSON and SVG output on stdout stay clean.
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Stroke colour for a display class
pub fn class_colour(display: &DisplaySettings, class: DisplayClass) -> String {
    match class {
        DisplayClass::Rapid => display.rapid.clone(),
        DisplayClass::Safe => display.safe.clone(),
        DisplayClass::Cut => display.cut.clone(),
        DisplayClass::Arc => display.arc.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_colour_uses_settings() {
        let mut display = DisplaySettings::default();
        display.cut = "red".to_string();
        assert_eq!(class_colour(&display, DisplayClass::Cut), "red");
        assert_eq!(class_colour(&display, DisplayClass::Rapid), "gray");
    }

    #[test]
    fn test_build_metadata() {
        assert!(!VERSION.is_empty());
        assert!(!BUILD_DATE.is_empty());
    }
}
