use crate::core::frame_scheduler::FrameCadence;
use crate::core::gesture_classifier::GestureConfig;
use crate::core::transform_mapper::MappingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tracking loop pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Tick source: host frame callback or a fixed-rate timer
    pub cadence: FrameCadence,
    /// Tick rate used by the fixed-rate cadence
    pub target_fps: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            cadence: FrameCadence::HostFrame,
            target_fps: 60,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gesture: GestureConfig,
    pub mapping: MappingConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid configuration value: {field} - {message}")]
    InvalidValue { field: String, message: String },
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

impl Config {
    /// Load configuration from `$GESTURE3D_CONFIG` or the default location,
    /// falling back to defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate configuration from a JSON file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gesture = &self.gesture;
        if !(gesture.pinch_threshold > 0.0 && gesture.pinch_threshold.is_finite()) {
            return Err(invalid(
                "gesture.pinch_threshold",
                format!("{}. Must be a positive number", gesture.pinch_threshold),
            ));
        }
        if !(gesture.pinch_falloff > 0.0 && gesture.pinch_falloff.is_finite()) {
            return Err(invalid(
                "gesture.pinch_falloff",
                format!("{}. Must be a positive number", gesture.pinch_falloff),
            ));
        }

        let mapping = &self.mapping;
        if !(mapping.smoothing_factor > 0.0 && mapping.smoothing_factor < 1.0) {
            return Err(invalid(
                "mapping.smoothing_factor",
                format!("{}. Must be between 0.0 and 1.0 (exclusive)", mapping.smoothing_factor),
            ));
        }
        if !mapping.vertical_gain.is_finite() || !mapping.horizontal_gain.is_finite() {
            return Err(invalid(
                "mapping.gain",
                "Rotation gains must be finite".to_string(),
            ));
        }
        if !(mapping.position_range > 0.0 && mapping.position_range.is_finite()) {
            return Err(invalid(
                "mapping.position_range",
                format!("{}. Must be a positive number", mapping.position_range),
            ));
        }
        if !(mapping.min_scale > 0.0 && mapping.min_scale < mapping.max_scale && mapping.max_scale.is_finite()) {
            return Err(invalid(
                "mapping.scale",
                format!(
                    "[{}, {}]. Bounds must be positive and min < max",
                    mapping.min_scale, mapping.max_scale
                ),
            ));
        }
        if let Some(fps) = mapping.reference_fps {
            if fps == 0 || fps > 240 {
                return Err(invalid(
                    "mapping.reference_fps",
                    format!("{}. Must be between 1 and 240", fps),
                ));
            }
        }

        let fps = self.tracking.target_fps;
        if fps == 0 || fps > 240 {
            return Err(invalid(
                "tracking.target_fps",
                format!("{}. Must be between 1 and 240", fps),
            ));
        }

        Ok(())
    }

    /// Get the configuration file path
    fn get_config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("GESTURE3D_CONFIG") {
            return Some(PathBuf::from(path));
        }

        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()?;

        let mut path = PathBuf::from(home);
        path.push(".gesture3d");
        path.push("config");
        path.push("settings.json");

        Some(path)
    }
}
