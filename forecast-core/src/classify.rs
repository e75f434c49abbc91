//! WMO weather code classification.
//!
//! Codes fall into fixed, non-overlapping ranges that pick the icon
//! category. The description table is sparse: a code inside a range but
//! missing from the table keeps its category and reads "Unknown weather".

use serde::{Deserialize, Serialize};

pub const UNKNOWN_DESCRIPTION: &str = "Unknown weather";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCategory {
    ClearCloudy,
    FogDrizzle,
    Rain,
    SnowShowers,
    Thunderstorm,
    Unknown,
}

impl WeatherCategory {
    pub fn from_code(code: i32) -> Self {
        match code {
            0..=3 => Self::ClearCloudy,
            45..=57 => Self::FogDrizzle,
            61..=67 => Self::Rain,
            71..=86 => Self::SnowShowers,
            95..=99 => Self::Thunderstorm,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ClearCloudy => "Clear/Cloudy",
            Self::FogDrizzle => "Fog/Drizzle",
            Self::Rain => "Rain",
            Self::SnowShowers => "Snow/Showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::Unknown => "Unknown",
        }
    }

    /// Single-column terminal glyph for the card.
    pub fn icon(self) -> &'static str {
        match self {
            Self::ClearCloudy => "☼",
            Self::FogDrizzle => "≡",
            Self::Rain => "☂",
            Self::SnowShowers => "*",
            Self::Thunderstorm => "ϟ",
            Self::Unknown => "?",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: WeatherCategory,
    pub description: &'static str,
}

fn describe(code: i32) -> Option<&'static str> {
    let text = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Heavy drizzle",
        56 => "Light freezing drizzle",
        57 => "Heavy freezing drizzle",
        61 => "Light rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Light snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Light rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Light snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with light hail",
        99 => "Severe thunderstorm",
        _ => return None,
    };
    Some(text)
}

/// Total over every `i32`; never fails.
pub fn classify(code: i32) -> Classification {
    Classification {
        category: WeatherCategory::from_code(code),
        description: describe(code).unwrap_or(UNKNOWN_DESCRIPTION),
    }
}
