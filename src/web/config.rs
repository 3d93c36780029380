use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::catalog::{Naming, Source};
use crate::preferences::Preferences;
use crate::tracker::{TrackerSettings, DEFAULT_TRAIL_LENGTH, DEFAULT_UPDATE_INTERVAL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub tracker: TrackerConfig,
    pub web: WebConfig,
    pub preferences: PreferencesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub primary: Source,
    pub bulk: Source,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary: Source::parse("iss.txt"),
            bulk: Source::parse("starlink.txt"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub update_interval: Duration,
    pub trail_length: usize,
    pub primary_id: String,
    pub primary_name: String,
    pub bulk_prefix: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let naming = Naming::default();
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            trail_length: DEFAULT_TRAIL_LENGTH,
            primary_id: naming.primary_id,
            primary_name: naming.primary_name,
            bulk_prefix: naming.bulk_prefix,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub bind: String,
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            static_dir: PathBuf::from("static"),
        }
    }
}

pub const DEFAULT_PREFERENCES_PATH: &str = "preferences.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// JSON file backing the preference store; `null` keeps it in memory
    pub path: Option<PathBuf>,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from(DEFAULT_PREFERENCES_PATH)),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim()).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if given, otherwise use the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tracker = &self.tracker;
        if tracker.update_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "tracker.update_interval must be positive".into(),
            ));
        }
        if tracker.trail_length == 0 {
            return Err(ConfigError::Invalid(
                "tracker.trail_length must be at least 1".into(),
            ));
        }
        if tracker.primary_id.trim().is_empty() || tracker.bulk_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "tracker.primary_id and tracker.bulk_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn naming(&self) -> Naming {
        Naming {
            primary_id: self.tracker.primary_id.clone(),
            primary_name: self.tracker.primary_name.clone(),
            bulk_prefix: self.tracker.bulk_prefix.clone(),
        }
    }

    /// Open the configured preference store. An unreadable store is replaced
    /// by an in-memory one so the map still comes up.
    pub fn open_preferences(&self) -> Preferences {
        let Some(path) = &self.preferences.path else {
            return Preferences::in_memory();
        };
        match Preferences::open(path) {
            Ok(preferences) => preferences,
            Err(e) => {
                log::warn!(
                    "Failed to open preferences {}: {}, using defaults",
                    path.display(),
                    e
                );
                Preferences::in_memory()
            }
        }
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            update_interval: self.tracker.update_interval,
            trail_length: self.tracker.trail_length,
            primary_id: self.tracker.primary_id.clone(),
        }
    }
}
