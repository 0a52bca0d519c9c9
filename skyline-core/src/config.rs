use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{cities, model::Coordinates};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Mumbai"
///
/// [home]
/// lat = 19.07
/// lon = 72.88
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// City selected before auto-detection runs.
    pub default_city: Option<String>,

    /// Position reported to auto-detection, if any.
    pub home: Option<Coordinates>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
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

        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skyline", "skyline")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the API key, preferring `env_override` over the stored value.
    pub fn resolve_api_key(&self, env_override: Option<String>) -> Result<String> {
        env_override
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: set {API_KEY_ENV} or run `skyline configure` and enter your API key."
                )
            })
    }

    /// API key from the process environment, then from the config file.
    pub fn api_key(&self) -> Result<String> {
        self.resolve_api_key(std::env::var(API_KEY_ENV).ok())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Store a default city; only cities from the allow-list are accepted.
    pub fn set_default_city(&mut self, city: &str) -> Result<()> {
        let canonical = cities::canonical(city).ok_or_else(|| {
            anyhow!(
                "Unsupported city '{city}'. Supported cities: {}.",
                cities::SUPPORTED_CITIES.join(", ")
            )
        })?;
        self.default_city = Some(canonical.to_string());
        Ok(())
    }

    /// Initial city selection. Falls back to the built-in default when the
    /// stored value is missing or not supported.
    pub fn initial_city(&self) -> &'static str {
        match self.default_city.as_deref() {
            Some(city) => cities::canonical(city).unwrap_or_else(|| {
                tracing::warn!(
                    city,
                    "Configured default city is not supported, using {}",
                    cities::DEFAULT_CITY
                );
                cities::DEFAULT_CITY
            }),
            None => cities::DEFAULT_CITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.resolve_api_key(None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains(API_KEY_ENV));
    }

    #[test]
    fn env_override_wins_over_stored_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("STORED".into());

        assert_eq!(cfg.resolve_api_key(None).unwrap(), "STORED");
        assert_eq!(cfg.resolve_api_key(Some("ENV".into())).unwrap(), "ENV");
        assert_eq!(cfg.resolve_api_key(Some("  ".into())).unwrap(), "STORED");
    }

    #[test]
    fn set_default_city_accepts_supported_only() {
        let mut cfg = Config::default();

        cfg.set_default_city("mumbai").expect("supported city");
        assert_eq!(cfg.default_city.as_deref(), Some("Mumbai"));
        assert_eq!(cfg.initial_city(), "Mumbai");

        let err = cfg.set_default_city("Paris").unwrap_err();
        assert!(err.to_string().contains("Unsupported city"));
        assert_eq!(cfg.default_city.as_deref(), Some("Mumbai"));
    }

    #[test]
    fn initial_city_falls_back_to_default() {
        let mut cfg = Config::default();
        assert_eq!(cfg.initial_city(), cities::DEFAULT_CITY);

        cfg.default_city = Some("Atlantis".into());
        assert_eq!(cfg.initial_city(), cities::DEFAULT_CITY);
    }

    #[test]
    fn parses_toml_with_home_position() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            default_city = "Chennai"

            [home]
            lat = 13.08
            lon = 80.27
            "#,
        )
        .expect("valid toml");

        assert_eq!(cfg.api_key.as_deref(), Some("KEY"));
        assert_eq!(cfg.initial_city(), "Chennai");
        assert_eq!(cfg.home, Some(Coordinates::new(13.08, 80.27)));
    }
}
