//! User configuration and preferences

use crate::cli::is_valid_fraction;
use crate::domain::Polarity;
use crate::error::{Result, SwipeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    pub welcome_shown: bool,
    /// Which swipe direction deletes
    pub polarity: Polarity,
    /// Swipe threshold as a fraction of the screen width
    pub threshold_fraction: f64,
    /// Ask before applying each delete
    pub confirm_delete: bool,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            welcome_shown: false,
            polarity: Polarity::default(),
            threshold_fraction: 0.3,
            confirm_delete: true,
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/gswp/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gswp").join("config.json"))
    }

    /// Load config from the default location, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            SwipeError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SwipeError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            SwipeError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        if !is_valid_fraction(config.threshold_fraction) {
            return Err(SwipeError::ConfigError(format!(
                "threshold_fraction must be in (0, 1], got {}",
                config.threshold_fraction
            )));
        }

        Ok(config)
    }

    /// Records that the welcome dialog was seen in the default config file
    pub fn mark_welcome_shown() -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            SwipeError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::mark_welcome_shown_at(&path)
    }

    /// Sets `welcome_shown` in the file at `path`, keeping its other settings.
    ///
    /// A file that cannot be read or parsed is left untouched and the load
    /// error is returned.
    pub fn mark_welcome_shown_at(path: &Path) -> Result<()> {
        let mut config = Self::load_from(path)?;
        config.welcome_shown = true;
        config.save_to(path)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            SwipeError::ConfigError("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SwipeError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            SwipeError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            SwipeError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UserConfig::default();
        assert!(!config.welcome_shown);
        assert!(config.confirm_delete);
        assert_eq!(config.polarity, Polarity::RightIsDelete);
        assert_eq!(config.threshold_fraction, 0.3);
    }

    #[test]
    fn test_config_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = UserConfig {
            welcome_shown: true,
            polarity: Polarity::RightIsKeep,
            threshold_fraction: 0.5,
            confirm_delete: false,
        };

        config.save_to(&path).unwrap();
        let loaded = UserConfig::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = UserConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, UserConfig::default());
    }

    #[test]
    fn test_older_config_fills_new_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "welcome_shown": true }"#).unwrap();

        let loaded = UserConfig::load_from(&path).unwrap();

        assert!(loaded.welcome_shown);
        assert!(loaded.confirm_delete);
        assert_eq!(loaded.threshold_fraction, 0.3);
    }

    #[test]
    fn test_polarity_is_kebab_case() {
        let json = serde_json::to_string(&UserConfig {
            polarity: Polarity::RightIsKeep,
            ..Default::default()
        })
        .unwrap();
        assert!(json.contains("\"right-is-keep\""));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(SwipeError::ConfigError(_))));
    }

    #[test]
    fn test_mark_welcome_shown_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = UserConfig {
            polarity: Polarity::RightIsKeep,
            threshold_fraction: 0.45,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        UserConfig::mark_welcome_shown_at(&path).unwrap();

        let loaded = UserConfig::load_from(&path).unwrap();
        assert!(loaded.welcome_shown);
        assert_eq!(loaded.polarity, Polarity::RightIsKeep);
        assert_eq!(loaded.threshold_fraction, 0.45);
    }

    #[test]
    fn test_mark_welcome_shown_leaves_unreadable_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let original = r#"{ "polarity": "right-is-keep", "threshold_fraction": 7.0 }"#;
        fs::write(&path, original).unwrap();

        let result = UserConfig::mark_welcome_shown_at(&path);

        assert!(matches!(result, Err(SwipeError::ConfigError(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_mark_welcome_shown_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gswp").join("config.json");

        UserConfig::mark_welcome_shown_at(&path).unwrap();

        assert!(UserConfig::load_from(&path).unwrap().welcome_shown);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "threshold_fraction": 2.0 }"#).unwrap();

        let result = UserConfig::load_from(&path);
        assert!(matches!(result, Err(SwipeError::ConfigError(ref m)) if m.contains("threshold")));
    }
}
