//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Panel mode control files
    #[serde(default)]
    pub modes: ModesConfig,

    /// D-Bus configuration
    #[serde(default)]
    pub dbus: DbusConfig,
}

/// Panel mode control file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesConfig {
    /// Sysfs attribute that selects the active panel mode
    #[serde(default = "default_mode_path")]
    pub mode_path: String,

    /// State file holding the persisted default mode code
    #[serde(default = "default_default_path")]
    pub default_path: String,
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            mode_path: default_mode_path(),
            default_path: default_default_path(),
        }
    }
}

/// D-Bus connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DbusConfig {
    /// Bus to register the service on
    #[serde(default)]
    pub bus: DbusBusType,
}

/// D-Bus bus type selection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbusBusType {
    /// Session bus (user session).
    Session,
    /// System bus (system-wide).
    System,
    /// Try session first, fall back to system.
    #[default]
    Auto,
}

// Default value functions
fn default_mode_path() -> String {
    imgtune_hw::MODE_PATH.to_string()
}

fn default_default_path() -> String {
    imgtune_hw::DEFAULT_MODE_PATH.to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.modes.mode_path, imgtune_hw::MODE_PATH);
        assert_eq!(config.modes.default_path, imgtune_hw::DEFAULT_MODE_PATH);
        assert!(matches!(config.dbus.bus, DbusBusType::Auto));
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r#"
            [modes]
            mode_path = "/tmp/screen_mode"
            default_path = "/tmp/default_display_mode"

            [dbus]
            bus = "system"
            "#,
        )
        .unwrap();
        assert_eq!(config.modes.mode_path, "/tmp/screen_mode");
        assert_eq!(config.modes.default_path, "/tmp/default_display_mode");
        assert!(matches!(config.dbus.bus, DbusBusType::System));
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let config: Config = toml::from_str(
            r#"
            [modes]
            mode_path = "/tmp/screen_mode"
            "#,
        )
        .unwrap();
        assert_eq!(config.modes.mode_path, "/tmp/screen_mode");
        assert_eq!(config.modes.default_path, imgtune_hw::DEFAULT_MODE_PATH);
    }
}
