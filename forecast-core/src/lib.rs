//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Location & display configuration
//! - The forecast source abstraction and its Open-Meteo implementation
//! - Weather code classification
//! - Mapping raw daily records to display-ready days
//! - The loading / ready / errored state of one forecast view
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod classify;
pub mod config;
pub mod model;
pub mod present;
pub mod provider;
pub mod view;

pub use classify::{Classification, WeatherCategory, classify};
pub use config::{
    Config, LATITUDE_RANGE, LONGITUDE_RANGE, LocationConfig, PrecipitationKind,
};
pub use model::{
    Coordinate, DailyRecord, FetchState, ForecastRequest, ForecastResult, MAX_FORECAST_DAYS,
    UnitPreference,
};
pub use present::{DayView, assemble};
pub use provider::{
    ForecastError, ForecastProvider, openmeteo::OpenMeteoProvider, provider_from_config,
};
pub use view::{ForecastView, Phase};
