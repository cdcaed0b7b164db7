//! NCView Settings Crate
//!
//! Handles viewer configuration: parse options, view limits, display colours,
//! and their persistence as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{DisplaySettings, ViewerConfig};
pub use error::{ConfigError, Result, SettingsError};
