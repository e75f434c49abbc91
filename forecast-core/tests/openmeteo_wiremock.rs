//! Forecast fetching against a mock Open-Meteo server.

use forecast_core::{
    Config, ForecastError, ForecastProvider, ForecastRequest, ForecastView, OpenMeteoProvider,
    Phase, PrecipitationKind, UnitPreference, WeatherCategory, assemble,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const DATES: [&str; 14] = [
    "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05", "2024-01-06",
    "2024-01-07", "2024-01-08", "2024-01-09", "2024-01-10", "2024-01-11", "2024-01-12",
    "2024-01-13", "2024-01-14",
];

fn fourteen_days(codes: usize) -> serde_json::Value {
    serde_json::json!({
        "latitude": 38.62,
        "longitude": -90.2,
        "timezone": "America/Chicago",
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°F",
            "temperature_2m_min": "°F",
            "precipitation_probability_max": "%",
            "weathercode": "wmo code"
        },
        "daily": {
            "time": DATES,
            "temperature_2m_max": vec![55.0; 14],
            "temperature_2m_min": vec![35.0; 14],
            "precipitation_probability_max": vec![15; 14],
            "weathercode": vec![3; codes]
        }
    })
}

fn config_for(server: &MockServer) -> Config {
    Config { base_url: server.uri(), ..Config::default() }
}

async fn mount(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn sends_the_documented_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "38.627"))
        .and(query_param("longitude", "-90.1994"))
        .and(query_param(
            "daily",
            "temperature_2m_max,temperature_2m_min,precipitation_probability_max,weathercode",
        ))
        .and(query_param("temperature_unit", "fahrenheit"))
        .and(query_param("windspeed_unit", "mph"))
        .and(query_param("timezone", "America/Chicago"))
        .and(query_param("forecast_days", "14"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fourteen_days(14)))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config_for(&server);
    let provider = OpenMeteoProvider::new(cfg.forecast_url());
    let result = provider
        .fetch(&ForecastRequest::from_config(&cfg))
        .await
        .expect("forecast should parse");

    assert_eq!(result.len(), 14);
    assert_eq!(result.days[0].date.to_string(), "2024-01-01");
    assert_eq!(result.days[13].date.to_string(), "2024-01-14");
}

#[tokio::test]
async fn sample_response_assembles_into_day_views() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": ["2024-01-01", "2024-01-02"],
                "temperature_2m_max": [50, 60],
                "temperature_2m_min": [30, 40],
                "precipitation_probability_max": [10, 20],
                "weathercode": [0, 61]
            }
        })),
    )
    .await;

    let cfg = config_for(&server);
    let provider = OpenMeteoProvider::new(cfg.forecast_url());
    let result = provider
        .fetch(&ForecastRequest::from_config(&cfg))
        .await
        .expect("forecast should parse");

    let views = assemble(&result, UnitPreference::Fahrenheit);
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].date.to_string(), "2024-01-01");
    assert_eq!(views[0].high_temp, 50.0);
    assert_eq!(views[0].low_temp, 30.0);
    assert_eq!(views[0].precipitation, Some(10.0));
    assert_eq!(views[0].category, WeatherCategory::ClearCloudy);
    assert_eq!(views[1].date.to_string(), "2024-01-02");
    assert_eq!(views[1].high_temp, 60.0);
    assert_eq!(views[1].low_temp, 40.0);
    assert_eq!(views[1].precipitation, Some(20.0));
    assert_eq!(views[1].category, WeatherCategory::Rain);
}

#[tokio::test]
async fn mismatched_array_lengths_fail_without_panicking() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(200).set_body_json(fourteen_days(10))).await;

    let cfg = config_for(&server);
    let provider = OpenMeteoProvider::new(cfg.forecast_url());
    let mut view = ForecastView::new(UnitPreference::Fahrenheit);
    view.load(&provider, &ForecastRequest::from_config(&cfg)).await;

    assert_eq!(view.phase(), Phase::Errored);
    let reason = view.failure_reason().expect("failure reason");
    assert!(reason.contains("weathercode"), "unexpected reason: {reason}");
}

#[tokio::test]
async fn missing_daily_is_malformed() {
    let server = MockServer::start().await;
    mount(
        &server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "latitude": 1.0 })),
    )
    .await;

    let cfg = config_for(&server);
    let provider = OpenMeteoProvider::new(cfg.forecast_url());
    let err = provider.fetch(&ForecastRequest::from_config(&cfg)).await.unwrap_err();

    assert!(matches!(err, ForecastError::Malformed(_)), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_a_transport_failure() {
    let server = MockServer::start().await;
    mount(&server, ResponseTemplate::new(500).set_body_string("Internal Server Error")).await;

    let cfg = config_for(&server);
    let provider = OpenMeteoProvider::new(cfg.forecast_url());
    let err = provider.fetch(&ForecastRequest::from_config(&cfg)).await.unwrap_err();

    assert!(err.is_transport());
    assert!(matches!(err, ForecastError::Status { status: 500, .. }), "got {err:?}");
    assert!(err.reason().contains("Internal Server Error"));
}

#[tokio::test]
async fn unreachable_host_reports_the_underlying_cause() {
    // Nothing listens on the discard port.
    let provider = OpenMeteoProvider::new("http://127.0.0.1:9/forecast");
    let mut view = ForecastView::new(UnitPreference::Fahrenheit);
    view.load(&provider, &ForecastRequest::from_config(&Config::default())).await;

    assert_eq!(view.phase(), Phase::Errored);
    let reason = view.failure_reason().expect("failure reason");
    assert!(!reason.trim().is_empty());
    assert!(reason.starts_with("Network error"));
    assert!(reason.contains("onnection refused"), "cause missing from reason: {reason}");
}

#[tokio::test]
async fn precipitation_sum_requests_and_parses_the_sum_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param(
            "daily",
            "temperature_2m_max,temperature_2m_min,precipitation_sum,weathercode",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": ["2024-06-01"],
                "temperature_2m_max": [88.5],
                "temperature_2m_min": [70.1],
                "precipitation_sum": [0.42],
                "weathercode": [95]
            }
        })))
        .mount(&server)
        .await;

    let mut cfg = config_for(&server);
    cfg.precipitation = PrecipitationKind::Sum;
    let provider = OpenMeteoProvider::new(cfg.forecast_url());
    let result = provider
        .fetch(&ForecastRequest::from_config(&cfg))
        .await
        .expect("forecast should parse");

    let views = assemble(&result, UnitPreference::Celsius);
    assert_eq!(views[0].precipitation_label(), "0.42 in");
    assert_eq!(views[0].category, WeatherCategory::Thunderstorm);
    assert_eq!(views[0].high_temp, 31.4);
}
