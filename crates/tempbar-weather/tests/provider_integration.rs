//! Integration tests for WeatherClient using wiremock.

use tempbar_weather::{Coordinates, TemperatureSource, WeatherClient, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_body(temperature: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "latitude": 55.75,
        "longitude": 37.625,
        "generationtime_ms": 0.02,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "current_units": { "time": "iso8601", "interval": "seconds", "temperature_2m": "°C" },
        "current": { "time": "2026-10-16T12:00", "interval": 900, "temperature_2m": temperature }
    })
}

#[tokio::test]
async fn test_current_temperature_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "55.7522"))
        .and(query_param("longitude", "37.6156"))
        .and(query_param("current", "temperature_2m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(21.34.into())))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url(&mock_server.uri()).unwrap();
    let celsius = client.current_temperature(55.7522, 37.6156).await.unwrap();

    assert_eq!(celsius, 21.34);
}

#[tokio::test]
async fn test_fetch_reading_through_trait() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body((-3.27).into())))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url(&mock_server.uri()).unwrap();
    let source: &dyn TemperatureSource = &client;
    let reading = source
        .fetch_reading(Coordinates::new(10.0, 37.6156))
        .await
        .unwrap();

    assert_eq!(reading.celsius, -3.27);
    assert_eq!(reading.location, Coordinates::new(10.0, 37.6156));
    assert_eq!(reading.status_text(), "Current temperature: -3.3°C");
}

#[tokio::test]
async fn test_out_of_range_coordinates_are_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "123"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Latitude must be in range of -90 to 90°. Given: 123.0."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url(&mock_server.uri()).unwrap();
    let err = client.current_temperature(123.0, 0.0).await.unwrap_err();

    match err {
        WeatherError::Network(e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(400)),
        other => panic!("expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url(&mock_server.uri()).unwrap();
    let err = client.current_temperature(55.7522, 37.6156).await.unwrap_err();

    assert!(err.is_network(), "{:?}", err);
}

#[tokio::test]
async fn test_empty_payload_is_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 55.75,
            "longitude": 37.625
        })))
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url(&mock_server.uri()).unwrap();
    let err = client.current_temperature(55.7522, 37.6156).await.unwrap_err();

    assert!(matches!(err, WeatherError::Provider(_)), "{:?}", err);
}

#[tokio::test]
async fn test_null_value_is_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(forecast_body(serde_json::Value::Null)),
        )
        .mount(&mock_server)
        .await;

    let client = WeatherClient::with_base_url(&mock_server.uri()).unwrap();
    let err = client.current_temperature(55.7522, 37.6156).await.unwrap_err();

    assert!(matches!(err, WeatherError::Provider(_)), "{:?}", err);
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    // Nothing listens on port 1
    let client = WeatherClient::with_base_url("http://127.0.0.1:1").unwrap();
    let err = client.current_temperature(55.7522, 37.6156).await.unwrap_err();

    assert!(err.is_network(), "{:?}", err);
}
