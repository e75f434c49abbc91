use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{Config, PrecipitationKind};

/// Longest horizon the forecast ever asks for.
pub const MAX_FORECAST_DAYS: u8 = 14;

/// A fixed point on the map, immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Temperature unit the user wants to see. Source data is always Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Fahrenheit,
    Celsius,
}

impl UnitPreference {
    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Fahrenheit => UnitPreference::Celsius,
            UnitPreference::Celsius => UnitPreference::Fahrenheit,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnitPreference::Fahrenheit => "°F",
            UnitPreference::Celsius => "°C",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitPreference::Fahrenheit => "fahrenheit",
            UnitPreference::Celsius => "celsius",
        }
    }
}

impl std::fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitPreference {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "fahrenheit" | "f" => Ok(UnitPreference::Fahrenheit),
            "celsius" | "c" => Ok(UnitPreference::Celsius),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: fahrenheit, celsius."
            )),
        }
    }
}

/// Everything needed to ask the source for a forecast. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub coordinate: Coordinate,
    pub timezone: String,
    pub precipitation: PrecipitationKind,
    horizon: u8,
}

impl ForecastRequest {
    pub fn new(
        coordinate: Coordinate,
        timezone: impl Into<String>,
        precipitation: PrecipitationKind,
        horizon: u8,
    ) -> Self {
        Self {
            coordinate,
            timezone: timezone.into(),
            precipitation,
            horizon: horizon.clamp(1, MAX_FORECAST_DAYS),
        }
    }

    /// The full 14-day request for the configured location.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.location.coordinate(),
            config.location.timezone.clone(),
            config.precipitation,
            MAX_FORECAST_DAYS,
        )
    }

    pub fn horizon(&self) -> u8 {
        self.horizon
    }

    /// Comma-joined `daily` field list; the precipitation key follows the chosen semantic.
    pub fn daily_fields(&self) -> String {
        format!(
            "temperature_2m_max,temperature_2m_min,{},weathercode",
            self.precipitation.field_name()
        )
    }

    /// Query string pairs, in the order the source documents them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.coordinate.latitude.to_string()),
            ("longitude", self.coordinate.longitude.to_string()),
            ("daily", self.daily_fields()),
            ("temperature_unit", "fahrenheit".to_string()),
            ("windspeed_unit", "mph".to_string()),
            ("timezone", self.timezone.clone()),
            ("forecast_days", self.horizon.to_string()),
        ]
    }
}

/// One day as reported by the source, still in source units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    /// Percentage or inches, depending on [`ForecastResult::precipitation`].
    pub precipitation: Option<f64>,
    pub condition_code: i32,
}

/// Chronological daily records exactly as the source ordered them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub precipitation: PrecipitationKind,
    pub days: Vec<DailyRecord>,
}

impl ForecastResult {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Lifecycle of the single fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Loading,
    Success(ForecastResult),
    Failure { reason: String },
}

impl FetchState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, FetchState::Loading)
    }
}
