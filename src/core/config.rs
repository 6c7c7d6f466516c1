//! Navigation configuration
//!
//! Static values fixed at world load. Supports loading and saving in RON
//! (Rusty Object Notation) and JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::Connectivity;

/// Navigation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// World extent of one side of the square grid
    pub grid_size: f32,
    /// Cells per side
    pub divisions: u32,
    /// Agent walking speed in world units per second
    pub agent_speed: f32,
    /// Seconds an action takes once the agent arrives
    pub action_duration: f32,
    /// Distance under which a waypoint counts as reached
    pub arrival_epsilon: f32,
    /// Search neighbourhood
    pub connectivity: Connectivity,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            grid_size: 100.0,
            divisions: 100,
            agent_speed: 5.0,
            action_duration: 4.0,
            arrival_epsilon: 0.01,
            connectivity: Connectivity::Four,
        }
    }
}

impl NavConfig {
    /// Set grid extent and cell count
    #[must_use]
    pub fn with_grid(mut self, grid_size: f32, divisions: u32) -> Self {
        self.grid_size = grid_size;
        self.divisions = divisions;
        self
    }

    /// Set agent speed
    #[must_use]
    pub fn with_speed(mut self, agent_speed: f32) -> Self {
        self.agent_speed = agent_speed;
        self
    }

    /// Set action duration
    #[must_use]
    pub fn with_action_duration(mut self, seconds: f32) -> Self {
        self.action_duration = seconds;
        self
    }

    /// Set search connectivity
    #[must_use]
    pub fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Size of one cell in world units
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.grid_size / self.divisions.max(1) as f32
    }

    /// Check that every value is usable
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| -> Result<(), ConfigError> {
            Err(ConfigError::Invalid(msg.to_string()))
        };

        if !(self.grid_size.is_finite() && self.grid_size > 0.0) {
            return invalid("grid_size must be positive");
        }
        if self.divisions == 0 {
            return invalid("divisions must be at least 1");
        }
        if !(self.agent_speed.is_finite() && self.agent_speed > 0.0) {
            return invalid("agent_speed must be positive");
        }
        if !(self.action_duration.is_finite() && self.action_duration >= 0.0) {
            return invalid("action_duration must not be negative");
        }
        if !(self.arrival_epsilon.is_finite() && self.arrival_epsilon >= 0.0) {
            return invalid("arrival_epsilon must not be negative");
        }
        Ok(())
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load and validate a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// holds invalid values
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Parse and validate a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text does not parse or holds invalid values
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: NavConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load and validate a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// holds invalid values
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config: NavConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur loading or validating a config
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error
    Io(String),
    /// Serialization error
    Serialize(String),
    /// Deserialization error
    Deserialize(String),
    /// A value is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
            Self::Invalid(e) => write!(f, "Invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("tapnav_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = NavConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_size(), 1.0);
    }

    #[test]
    fn test_builder() {
        let config = NavConfig::default()
            .with_grid(20.0, 10)
            .with_speed(2.5)
            .with_action_duration(1.0)
            .with_connectivity(Connectivity::Eight);

        assert_eq!(config.cell_size(), 2.0);
        assert_eq!(config.agent_speed, 2.5);
        assert_eq!(config.connectivity, Connectivity::Eight);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(matches!(
            NavConfig::default().with_grid(10.0, 0).validate(),
            Err(ConfigError::Invalid(_))
        ));
        assert!(NavConfig::default().with_speed(0.0).validate().is_err());
        assert!(NavConfig::default().with_grid(-1.0, 4).validate().is_err());
        assert!(NavConfig::default().with_action_duration(-0.5).validate().is_err());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = NavConfig::from_ron_str("(agent_speed: 8.0, connectivity: Eight)").unwrap();

        assert_eq!(config.agent_speed, 8.0);
        assert_eq!(config.connectivity, Connectivity::Eight);
        assert_eq!(config.divisions, 100);
    }

    #[test]
    fn test_invalid_ron_is_rejected() {
        assert!(matches!(
            NavConfig::from_ron_str("(divisions: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            NavConfig::from_ron_str("(divisions: \"ten\")"),
            Err(ConfigError::Deserialize(_))
        ));
    }

    #[test]
    fn test_ron_file_roundtrip() {
        let path = temp_path("config.ron");
        let config = NavConfig::default().with_grid(32.0, 16).with_speed(3.0);

        config.save_ron(&path).unwrap();
        let loaded = NavConfig::load_ron(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_file_roundtrip() {
        let path = temp_path("config.json");
        let config = NavConfig::default().with_action_duration(2.0);

        config.save_json(&path).unwrap();
        let loaded = NavConfig::load_json(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            NavConfig::load_ron("/nonexistent/tapnav.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
