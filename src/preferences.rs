//! Persisted user preferences (speed unit, map theme).
//!
//! Stored as a flat JSON object of string values so the keys match the ones
//! the map page has always used.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;

pub const UNIT_KEY: &str = "speedUnit";
pub const THEME_KEY: &str = "theme";

const KMH_PER_MPH: f64 = 1.609;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Kmh,
    Mph,
}

impl SpeedUnit {
    pub fn convert_kmh(&self, speed_kmh: f64) -> f64 {
        match self {
            SpeedUnit::Kmh => speed_kmh,
            SpeedUnit::Mph => speed_kmh / KMH_PER_MPH,
        }
    }

    pub fn to_kmh(&self, speed: f64) -> f64 {
        match self {
            SpeedUnit::Kmh => speed,
            SpeedUnit::Mph => speed * KMH_PER_MPH,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeedUnit::Kmh => "Km/h",
            SpeedUnit::Mph => "Mph",
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Satellite,
}

impl Theme {
    /// light -> dark -> satellite -> light
    pub fn next(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Satellite,
            Theme::Satellite => Theme::Light,
        }
    }

    pub fn body_class(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            _ => "light",
        }
    }
}

pub struct Preferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Preferences {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, PreferenceError> {
        let values = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    pub fn unit(&self) -> SpeedUnit {
        self.parsed(UNIT_KEY)
    }

    pub fn theme(&self) -> Theme {
        self.parsed(THEME_KEY)
    }

    pub fn set_unit(&mut self, unit: SpeedUnit) -> Result<(), PreferenceError> {
        self.set(UNIT_KEY, unit.as_ref())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        self.set(THEME_KEY, theme.as_ref())
    }

    fn parsed<T: FromStr + Default>(&self, key: &str) -> T {
        self.values
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> Result<(), PreferenceError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, serde_json::to_string_pretty(&self.values)?)?;
        }
        Ok(())
    }
}
