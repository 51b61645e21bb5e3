//! Application configuration, loaded from `~/.mapty/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::input::ValidationPolicy;
use crate::model::workout::Coords;

pub const DEFAULT_ZOOM: u8 = 13;
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Zoom level used when the map loads and when centring on a workout.
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }
}

/// Fixed position reported by the terminal host, which has no positioning
/// hardware of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeolocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeolocationConfig {
    pub fn coords(&self) -> Coords {
        Coords::new(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where workouts (and logs) are kept. Defaults to `~/.mapty`.
    pub data_dir: Option<PathBuf>,
    pub map: MapConfig,
    pub geolocation: Option<GeolocationConfig>,
    pub validation: ValidationPolicy,
}

impl AppConfig {
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir().map_err(|e| ConfigError::IoError(e.to_string())),
        }
    }
}

/// `~/.mapty`
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".mapty"))
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(default_data_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.map.zoom, 13);
        assert!(config.geolocation.is_none());
        assert!(!config.validation.require_positive_elevation);
    }

    #[test]
    fn test_parse_full_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
data_dir = "/tmp/mapty"

[map]
zoom = 10

[geolocation]
latitude = 51.5
longitude = -0.09

[validation]
require_positive_elevation = true
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/mapty")));
        assert_eq!(config.map.zoom, 10);
        assert_eq!(config.geolocation.unwrap().coords(), Coords::new(51.5, -0.09));
        assert!(config.validation.require_positive_elevation);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[validation]\nrequire_positive_elevation = true\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.map.zoom, DEFAULT_ZOOM);
        assert!(config.validation.require_positive_elevation);
    }

    #[test]
    fn test_bad_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[map]\nzoom = \"high\"\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));
    }
}
