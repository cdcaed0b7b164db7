//! Viewer configuration
//!
//! Aggregates parser options, view limits and display colours, and reads or
//! writes them as JSON or TOML depending on the file extension. Every section
//! is `#[serde(default)]`, so a file only needs the keys it changes.

use ncview_core::{ParseOptions, ViewSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, Result, SettingsError};

/// Stroke colours per display class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub rapid: String,
    pub safe: String,
    pub cut: String,
    pub arc: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            rapid: "gray".to_string(),
            safe: "blue".to_string(),
            cut: "green".to_string(),
            arc: "orange".to_string(),
        }
    }
}

/// File format selected by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> std::result::Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub parser: ParseOptions,
    pub view: ViewSettings,
    pub display: DisplaySettings,
}

impl ViewerConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<platform config dir>/ncview/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("ncview").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load the default config file, or defaults when it does not exist
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let parser = &self.parser;
        if !(parser.arc_radius_tolerance.is_finite() && parser.arc_radius_tolerance > 0.0) {
            return Err(ConfigError::out_of_range(
                "parser.arc_radius_tolerance",
                parser.arc_radius_tolerance,
            ));
        }

        let view = &self.view;
        if !(0.0..0.5).contains(&view.fit_margin) {
            return Err(ConfigError::out_of_range("view.fit_margin", view.fit_margin));
        }
        if !(view.min_scale.is_finite() && view.min_scale > 0.0) {
            return Err(ConfigError::out_of_range("view.min_scale", view.min_scale));
        }
        if !(view.max_scale.is_finite() && view.max_scale >= view.min_scale) {
            return Err(ConfigError::out_of_range("view.max_scale", view.max_scale));
        }
        if !(view.zoom_step.is_finite() && view.zoom_step > 1.0) {
            return Err(ConfigError::out_of_range("view.zoom_step", view.zoom_step));
        }
        if !(view.pan_fraction > 0.0 && view.pan_fraction <= 1.0) {
            return Err(ConfigError::out_of_range("view.pan_fraction", view.pan_fraction));
        }
        if !(view.arc_pixels_per_step.is_finite() && view.arc_pixels_per_step > 0.0) {
            return Err(ConfigError::out_of_range(
                "view.arc_pixels_per_step",
                view.arc_pixels_per_step,
            ));
        }
        if view.min_arc_steps == 0 {
            return Err(ConfigError::out_of_range("view.min_arc_steps", view.min_arc_steps));
        }
        if view.max_arc_steps < view.min_arc_steps {
            return Err(ConfigError::out_of_range("view.max_arc_steps", view.max_arc_steps));
        }

        for (key, colour) in [
            ("display.rapid", &self.display.rapid),
            ("display.safe", &self.display.safe),
            ("display.cut", &self.display.cut),
            ("display.arc", &self.display.arc),
        ] {
            if colour.trim().is_empty() {
                return Err(ConfigError::EmptyValue(key.to_string()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncview_core::NegativeRadiusMode;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.display.cut, "green");
        assert_eq!(config.view.fit_margin, 0.05);
    }

    #[test]
    fn test_partial_toml() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [parser]
            negative_radius = "near_side"

            [display]
            cut = "red"
            "#,
        )
        .unwrap();
        assert_eq!(config.parser.negative_radius, NegativeRadiusMode::NearSide);
        assert_eq!(config.display.cut, "red");
        assert_eq!(config.display.rapid, "gray");
        assert_eq!(config.view, ViewSettings::default());
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = ViewerConfig::new();
        config.view.fit_margin = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { ref key, .. }) if key == "view.fit_margin"
        ));

        let mut config = ViewerConfig::new();
        config.view.min_scale = 10.0;
        config.view.max_scale = 1.0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::new();
        config.parser.arc_radius_tolerance = 0.0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::new();
        config.display.arc = " ".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyValue("display.arc".to_string()))
        );
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/config.toml")),
            Ok(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")),
            Ok(ConfigFormat::Json)
        );
        assert!(ConfigFormat::from_path(Path::new("config.yaml")).is_err());
        assert!(ConfigFormat::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_default_path_layout() {
        if let Ok(path) = ViewerConfig::default_path() {
            assert!(path.ends_with("ncview/config.toml"));
        }
    }
}
