use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

use crate::{Config, ForecastRequest, ForecastResult, provider::openmeteo::OpenMeteoProvider};

pub mod openmeteo;

/// Why a fetch did not produce a forecast.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Send failed: DNS, connect, TLS, or reading the body.
    #[error("Network error: {0}")]
    Transport(String),

    /// Source answered with a non-2xx status.
    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not the expected `daily` shape.
    #[error("Malformed forecast response: {0}")]
    Malformed(String),
}

impl ForecastError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ForecastError::Transport(_) | ForecastError::Status { .. })
    }

    /// Text for the error view. Never empty.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastError>;
}

/// Construct the forecast source described by the config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    config.validate()?;
    Ok(Box::new(OpenMeteoProvider::new(config.forecast_url())))
}
