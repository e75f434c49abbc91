use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, ops::RangeInclusive, path::Path, path::PathBuf};

use crate::model::{Coordinate, UnitPreference};

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Where the forecast is for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Shown in the title, e.g. "St. Louis, MO".
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA zone the source uses to cut days, e.g. "America/Chicago".
    pub timezone: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: "St. Louis, MO".to_string(),
            latitude: 38.627,
            longitude: -90.1994,
            timezone: "America/Chicago".to_string(),
        }
    }
}

impl LocationConfig {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate { latitude: self.latitude, longitude: self.longitude }
    }
}

/// Which daily precipitation series is requested and how it is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrecipitationKind {
    /// `precipitation_probability_max`, a percentage.
    #[default]
    Probability,
    /// `precipitation_sum`, an amount in inches.
    Sum,
}

impl PrecipitationKind {
    /// Key used both in the request field list and in the response `daily` object.
    pub fn field_name(self) -> &'static str {
        match self {
            PrecipitationKind::Probability => "precipitation_probability_max",
            PrecipitationKind::Sum => "precipitation_sum",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrecipitationKind::Probability => "probability",
            PrecipitationKind::Sum => "sum",
        }
    }

    pub const fn all() -> &'static [PrecipitationKind] {
        &[PrecipitationKind::Probability, PrecipitationKind::Sum]
    }
}

impl std::fmt::Display for PrecipitationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_unit = "celsius"
/// precipitation = "sum"
///
/// [location]
/// name = "Berlin"
/// latitude = 52.52
/// longitude = 13.41
/// timezone = "Europe/Berlin"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_unit: UnitPreference,
    pub precipitation: PrecipitationKind,
    /// Open-Meteo API root; the forecast endpoint is `{base_url}/forecast`.
    pub base_url: String,
    pub location: LocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_unit: UnitPreference::default(),
            precipitation: PrecipitationKind::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Reject coordinates off the globe and an empty timezone.
    pub fn validate(&self) -> Result<()> {
        let loc = &self.location;
        if !LATITUDE_RANGE.contains(&loc.latitude) {
            bail!("Invalid latitude {}: must be between -90 and 90", loc.latitude);
        }
        if !LONGITUDE_RANGE.contains(&loc.longitude) {
            bail!("Invalid longitude {}: must be between -180 and 180", loc.longitude);
        }
        if loc.timezone.trim().is_empty() {
            bail!("Timezone must not be empty (e.g. \"America/Chicago\")");
        }
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents).context("Failed to parse configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use St. Louis.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url.trim_end_matches('/'))
    }
}
