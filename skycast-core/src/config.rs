use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Coordinates used by the `here` lookup, the CLI's stand-in for a browser
/// geolocation prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeatherMap API key.
    pub api_key: Option<String>,

    /// Optional default location for `skycast here`.
    pub location: Option<SavedLocation>,
}

impl Config {
    /// The configured API key, with a setup hint when it is missing.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No OpenWeatherMap API key configured.\n\
                 Hint: run `skycast configure` and enter your API key."
            )
        })
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Path to the JSON key-value store holding recent searches and cached
    /// responses.
    pub fn data_file_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.data_dir().join("store.json"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "skycast", "skycast-cli")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_with_a_hint_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No OpenWeatherMap API key configured"));
        assert!(err.to_string().contains("skycast configure"));
    }

    #[test]
    fn api_key_round_trips() {
        let cfg = Config {
            api_key: Some("KEY".to_string()),
            location: None,
        };

        assert_eq!(cfg.api_key().expect("key must exist"), "KEY");
    }

    #[test]
    fn toml_round_trip_preserves_the_location() {
        let cfg = Config {
            api_key: Some("KEY".to_string()),
            location: Some(SavedLocation {
                latitude: 50.45,
                longitude: 30.52,
            }),
        };

        let raw = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&raw).expect("parse");

        let loc = parsed.location.expect("location survives");
        assert_eq!(loc.latitude, 50.45);
        assert_eq!(loc.longitude, 30.52);
    }

    #[test]
    fn missing_fields_parse_as_defaults() {
        let parsed: Config = toml::from_str("").expect("empty config parses");
        assert!(parsed.api_key.is_none());
        assert!(parsed.location.is_none());
    }
}
