//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Default session length and the duration choices offered by the CLI
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/studyflow/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes used when the caller does not specify a budget.
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    /// Budget choices offered when picking a session length.
    #[serde(default = "default_duration_options")]
    pub duration_options: Vec<u32>,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_minutes() -> u32 {
    60
}
fn default_duration_options() -> Vec<u32> {
    vec![30, 60, 90, 120, 180]
}
fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            duration_options: default_duration_options(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(ConfigError::DataDir)?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default file on first run.
    ///
    /// # Errors
    /// Returns an error if an existing config file cannot be parsed, or if
    /// the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, falling back to defaults on any failure.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "session.default_minutes" => Some(self.session.default_minutes.to_string()),
            "session.duration_options" => Some(
                self.session
                    .duration_options
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            "notifications.enabled" => Some(self.notifications.enabled.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-separated key. Does not persist; call
    /// [`Config::save`] afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "session.default_minutes" => {
                self.session.default_minutes = parse_minutes(key, value)?;
            }
            "session.duration_options" => {
                let options = value
                    .split(',')
                    .map(|part| parse_minutes(key, part.trim()))
                    .collect::<Result<Vec<_>, _>>()?;
                if options.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: "at least one duration required".to_string(),
                    });
                }
                self.session.duration_options = options;
            }
            "notifications.enabled" => {
                self.notifications.enabled =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: format!("cannot parse '{value}' as bool"),
                    })?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_minutes(key: &str, value: &str) -> Result<u32, ConfigError> {
    let minutes: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("cannot parse '{value}' as minutes"),
    })?;
    if minutes == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be positive".to_string(),
        });
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_duration_picker() {
        let cfg = Config::default();
        assert_eq!(cfg.session.default_minutes, 60);
        assert_eq!(cfg.session.duration_options, vec![30, 60, 90, 120, 180]);
        assert!(cfg.notifications.enabled);
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.session.default_minutes = 90;
        cfg.notifications.enabled = false;
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.session.default_minutes, 90);
        assert!(!parsed.notifications.enabled);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed: Config = toml::from_str("[session]\ndefault_minutes = 120\n").unwrap();
        assert_eq!(parsed.session.default_minutes, 120);
        assert_eq!(parsed.session.duration_options, vec![30, 60, 90, 120, 180]);
        assert!(parsed.notifications.enabled);
    }

    #[test]
    fn get_and_set_by_key() {
        let mut cfg = Config::default();
        assert_eq!(cfg.get("session.default_minutes").unwrap(), "60");
        assert_eq!(cfg.get("session.duration_options").unwrap(), "30,60,90,120,180");
        assert!(cfg.get("no.such.key").is_none());

        cfg.set("session.default_minutes", "45").unwrap();
        assert_eq!(cfg.session.default_minutes, 45);
        cfg.set("session.duration_options", "25, 50, 75").unwrap();
        assert_eq!(cfg.session.duration_options, vec![25, 50, 75]);
        cfg.set("notifications.enabled", "false").unwrap();
        assert!(!cfg.notifications.enabled);
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("session.default_minutes", "zero"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("session.default_minutes", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("made.up", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }
}
