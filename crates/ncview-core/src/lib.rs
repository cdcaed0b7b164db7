//! # NCView Core
//!
//! Core types, options, and errors for NCView.
//! Provides the geometric primitives, motion classification, parse options,
//! and the error taxonomy shared by the parser, the visualizer helpers, and
//! the settings layer.

pub mod constants;
pub mod data;
pub mod error;
pub mod options;

pub use data::{MotionKind, Point2, Point3};

pub use error::{ArcError, Error, GcodeError, Result, ViewError};

pub use options::{NegativeRadiusMode, ParseOptions, TessellationOptions, ViewSettings};
