use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    classify::{WeatherCategory, classify},
    config::PrecipitationKind,
    model::{ForecastResult, UnitPreference},
};

/// One display-ready day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    /// "Mon"
    pub weekday_label: String,
    /// "January 1"
    pub date_label: String,
    pub high_temp: f64,
    pub low_temp: f64,
    pub unit: UnitPreference,
    pub precipitation: Option<f64>,
    pub precipitation_kind: PrecipitationKind,
    pub category: WeatherCategory,
    pub description: &'static str,
}

impl DayView {
    pub fn high_label(&self) -> String {
        format_temperature(self.high_temp, self.unit)
    }

    pub fn low_label(&self) -> String {
        format_temperature(self.low_temp, self.unit)
    }

    /// Percent for probabilities, inches for sums, "--" when the source sent null.
    pub fn precipitation_label(&self) -> String {
        match (self.precipitation, self.precipitation_kind) {
            (None, _) => "--".to_string(),
            (Some(p), PrecipitationKind::Probability) => format!("{p:.0}%"),
            (Some(p), PrecipitationKind::Sum) => format!("{p:.2} in"),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn fahrenheit_to_celsius(value_f: f64) -> f64 {
    round1((value_f - 32.0) * 5.0 / 9.0)
}

pub fn celsius_to_fahrenheit(value_c: f64) -> f64 {
    value_c * 9.0 / 5.0 + 32.0
}

/// Source values are Fahrenheit; only Celsius needs converting.
pub fn convert_temperature(value_f: f64, unit: UnitPreference) -> f64 {
    match unit {
        UnitPreference::Fahrenheit => value_f,
        UnitPreference::Celsius => fahrenheit_to_celsius(value_f),
    }
}

pub fn format_temperature(value: f64, unit: UnitPreference) -> String {
    // Rounding can leave -0.0, which would print as "-0".
    let value = if value == 0.0 { 0.0 } else { value };
    // Whole numbers print without a trailing ".0".
    if value.fract() == 0.0 {
        format!("{value:.0}{}", unit.symbol())
    } else {
        format!("{value:.1}{}", unit.symbol())
    }
}

/// Map every record to a [`DayView`], keeping length and order.
pub fn assemble(result: &ForecastResult, unit: UnitPreference) -> Vec<DayView> {
    result
        .days
        .iter()
        .map(|day| {
            let class = classify(day.condition_code);
            DayView {
                date: day.date,
                weekday_label: day.date.format("%a").to_string(),
                date_label: day.date.format("%B %-d").to_string(),
                high_temp: convert_temperature(day.temperature_max, unit),
                low_temp: convert_temperature(day.temperature_min, unit),
                unit,
                precipitation: day.precipitation,
                precipitation_kind: result.precipitation,
                category: class.category,
                description: class.description,
            }
        })
        .collect()
}
