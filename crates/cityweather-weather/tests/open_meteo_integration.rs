//! Integration tests for the Open-Meteo clients using wiremock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use cityweather_weather::{
    Coordinates, OpenMeteoClient, TemperatureUnit, WeatherCondition, WeatherError, WeatherLookup,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, unit: TemperatureUnit) -> OpenMeteoClient {
    OpenMeteoClient::with_base_urls(&server.uri(), &server.uri(), Duration::from_secs(5), unit)
        .unwrap()
}

fn paris() -> serde_json::Value {
    serde_json::json!({
        "id": 2988507,
        "name": "Paris",
        "latitude": 48.85341,
        "longitude": 2.3488,
        "country": "France",
        "admin1": "Île-de-France"
    })
}

#[tokio::test]
async fn test_search_returns_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .and(query_param("count", "5"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                paris(),
                {
                    "id": 4717560,
                    "name": "Paris",
                    "latitude": 33.66094,
                    "longitude": -95.55551,
                    "country": "United States",
                    "admin1": "Texas"
                }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Celsius);
    let results = client.search("Paris", 5).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 2988507);
    assert_eq!(results[1].display_name(), "Paris, Texas");
}

#[tokio::test]
async fn test_search_without_results_field_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "generationtime_ms": 0.3 })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Celsius);
    assert!(client.search("Atlantis", 5).await.unwrap().is_empty());
    assert!(client.best_match("Atlantis").await.unwrap().is_none());
}

#[tokio::test]
async fn test_best_match_asks_for_one_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("count", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": [paris()] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Celsius);
    let best = client.best_match("Paris").await.unwrap().unwrap();
    assert_eq!(best.coordinates().label(), "48.85, 2.35");
}

#[tokio::test]
async fn test_blank_search_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Celsius);
    assert!(client.search("   ", 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Celsius);
    let err = client.search("Paris", 5).await.unwrap_err();
    assert!(matches!(
        err,
        WeatherError::Status {
            endpoint: "geocoding",
            status: 503
        }
    ));
}

#[tokio::test]
async fn test_current_conditions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 48.86,
            "longitude": 2.3399997,
            "current": {
                "time": "2026-10-19T12:00",
                "interval": 900,
                "temperature_2m": 15.2,
                "relative_humidity_2m": 72,
                "apparent_temperature": 13.9,
                "wind_speed_10m": 11.5,
                "weather_code": 3
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Celsius);
    let current = client.current(Coordinates::new(48.85, 2.35)).await.unwrap();

    assert_eq!(current.temperature, 15.2);
    assert_eq!(current.apparent_temperature, 13.9);
    assert_eq!(current.humidity, 72);
    assert_eq!(current.wind_speed, 11.5);
    assert_eq!(current.condition, WeatherCondition::Cloudy);
}

#[tokio::test]
async fn test_fahrenheit_is_requested() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current": { "temperature_2m": 59.4 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Fahrenheit);
    let current = client.current(Coordinates::new(48.85, 2.35)).await.unwrap();
    assert_eq!(current.temperature, 59.4);
    assert_eq!(current.unit, TemperatureUnit::Fahrenheit);
}

#[tokio::test]
async fn test_current_missing_block_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": false
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, TemperatureUnit::Celsius);
    let err = client.current(Coordinates::new(0.0, 0.0)).await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "current": { "temperature_2m": 1.0 } }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = OpenMeteoClient::with_base_urls(
        &server.uri(),
        &server.uri(),
        Duration::from_millis(50),
        TemperatureUnit::Celsius,
    )
    .unwrap();
    let err = client.current(Coordinates::new(0.0, 0.0)).await.unwrap_err();
    assert!(err.is_timeout());
}
