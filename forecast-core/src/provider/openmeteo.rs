use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::PrecipitationKind,
    model::{DailyRecord, ForecastRequest, ForecastResult},
};

use super::{ForecastError, ForecastProvider};

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    url: String,
    http: Client,
}

impl OpenMeteoProvider {
    /// `url` is the full forecast endpoint, e.g. `https://api.open-meteo.com/v1/forecast`.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Option<Vec<String>>,
    temperature_2m_max: Option<Vec<f64>>,
    temperature_2m_min: Option<Vec<f64>>,
    precipitation_sum: Option<Vec<Option<f64>>>,
    precipitation_probability_max: Option<Vec<Option<f64>>>,
    weathercode: Option<Vec<i32>>,
}

fn required<'a, T>(field: &'a Option<Vec<T>>, name: &str) -> Result<&'a [T], ForecastError> {
    field
        .as_deref()
        .ok_or_else(|| ForecastError::Malformed(format!("daily.{name} is missing")))
}

fn check_len<T>(values: &[T], name: &str, expected: usize) -> Result<(), ForecastError> {
    if values.len() != expected {
        return Err(ForecastError::Malformed(format!(
            "daily.{name} has {} entries but daily.time has {expected}",
            values.len()
        )));
    }
    Ok(())
}

/// Turn a response body into records, refusing anything that would index out of range.
pub(crate) fn parse_forecast(
    body: &str,
    precipitation: PrecipitationKind,
) -> Result<ForecastResult, ForecastError> {
    let parsed: OmResponse = serde_json::from_str(body)
        .map_err(|e| ForecastError::Malformed(format!("invalid JSON: {e}")))?;

    let daily = parsed
        .daily
        .ok_or_else(|| ForecastError::Malformed("response has no `daily` object".to_string()))?;

    let time = required(&daily.time, "time")?;
    let max = required(&daily.temperature_2m_max, "temperature_2m_max")?;
    let min = required(&daily.temperature_2m_min, "temperature_2m_min")?;
    let codes = required(&daily.weathercode, "weathercode")?;
    let precip = match precipitation {
        PrecipitationKind::Probability => {
            required(&daily.precipitation_probability_max, precipitation.field_name())?
        }
        PrecipitationKind::Sum => required(&daily.precipitation_sum, precipitation.field_name())?,
    };

    let n = time.len();
    check_len(max, "temperature_2m_max", n)?;
    check_len(min, "temperature_2m_min", n)?;
    check_len(precip, precipitation.field_name(), n)?;
    check_len(codes, "weathercode", n)?;

    let days = time
        .iter()
        .zip(max)
        .zip(min)
        .zip(precip)
        .zip(codes)
        .map(|((((date, &hi), &lo), &p), &code)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                ForecastError::Malformed(format!("invalid date '{date}': {e}"))
            })?;
            Ok(DailyRecord {
                date,
                temperature_max: hi,
                temperature_min: lo,
                precipitation: p,
                condition_code: code,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(ForecastResult { precipitation, days })
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    #[instrument(skip(self, request), fields(
        lat = %request.coordinate.latitude,
        lon = %request.coordinate.longitude,
        days = request.horizon(),
    ))]
    async fn fetch(&self, request: &ForecastRequest) -> Result<ForecastResult, ForecastError> {
        debug!(url = %self.url, "Fetching daily forecast");

        let res = self
            .http
            .get(&self.url)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| {
                let reason = error_chain(e);
                warn!(error = %reason, "Forecast request could not be sent");
                ForecastError::Transport(reason)
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| {
                ForecastError::Transport(format!("failed to read body: {}", error_chain(e)))
            })?;

        if !status.is_success() {
            warn!(%status, "Forecast request rejected");
            return Err(ForecastError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let result = parse_forecast(&body, request.precipitation)?;
        info!(days = result.len(), "Forecast received");
        Ok(result)
    }
}

/// Top-level message plus every `source()` cause, e.g. "...: tcp connect error: Connection refused".
fn error_chain<E>(err: E) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    format!("{:#}", anyhow::Error::new(err))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
