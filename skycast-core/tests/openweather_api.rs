//! Tests for the OpenWeatherMap client against a mock HTTP server.

use chrono::Datelike;
use skycast_core::client::{OpenWeatherClient, WeatherClient};
use skycast_core::error::FetchError;
use skycast_core::model::ConditionKind;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_base_url("TEST_KEY".to_string(), server.uri())
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "cod": 200,
        "name": "Paris",
        "dt": 1_696_161_600,
        "visibility": 10000,
        "sys": { "country": "FR" },
        "main": { "temp": 21.37, "feels_like": 20.9, "humidity": 60, "pressure": 1012 },
        "wind": { "speed": 5.1 },
        "weather": [ { "main": "Clouds", "description": "scattered clouds", "icon": "03d" } ]
    })
}

#[tokio::test]
async fn current_by_name_maps_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "paris"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;

    let conditions = client_for(&server)
        .current_by_name("paris")
        .await
        .expect("fetch succeeds");

    assert_eq!(conditions.city, "Paris");
    assert_eq!(conditions.country, "FR");
    assert_eq!(conditions.temperature_c, 21.37);
    assert_eq!(conditions.humidity_pct, 60);
    assert_eq!(conditions.pressure_hpa, 1012);
    assert_eq!(conditions.visibility_m, Some(10_000));
    assert_eq!(conditions.condition, ConditionKind::Clouds);
    assert_eq!(conditions.description, "scattered clouds");
    assert!(conditions.is_day);
    assert_eq!(conditions.observed_at.timestamp(), 1_696_161_600);
}

#[tokio::test]
async fn missing_visibility_reads_as_absent() {
    let server = MockServer::start().await;
    let mut body = current_body();
    body.as_object_mut().expect("object").remove("visibility");
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let conditions = client_for(&server)
        .current_by_name("paris")
        .await
        .expect("fetch succeeds");

    assert_eq!(conditions.visibility_m, None);
}

#[tokio::test]
async fn current_by_coords_sends_lat_and_lon() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "50.45"))
        .and(query_param("lon", "30.52"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&server)
        .await;

    let conditions = client_for(&server)
        .current_by_coords(50.45, 30.52)
        .await
        .expect("fetch succeeds");

    assert_eq!(conditions.city, "Paris");
}

#[tokio::test]
async fn upstream_rejection_surfaces_the_error_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .current_by_name("zzzznotacity")
        .await
        .unwrap_err();

    match err {
        FetchError::Api { message } => assert_eq!(message.as_deref(), Some("city not found")),
        other => panic!("expected an Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_rejection_without_a_message_is_still_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).current_by_name("paris").await.unwrap_err();

    match err {
        FetchError::Api { message } => assert_eq!(message, None),
        other => panic!("expected an Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Nothing listens on the discard port; the connection is refused.
    let client =
        OpenWeatherClient::with_base_url("TEST_KEY".to_string(), "http://127.0.0.1:9".to_string());

    let err = client.current_by_name("paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn malformed_success_body_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).current_by_name("paris").await.unwrap_err();

    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn forecast_samples_carry_the_location_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "kyiv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": "200",
            "city": { "name": "Kyiv", "country": "UA", "timezone": 10800 },
            "list": [
                {
                    // 2023-10-01 22:00 UTC, which is already Monday at UTC+3.
                    "dt": 1_696_197_600,
                    "main": { "temp": 12.5 },
                    "weather": [ { "main": "Rain", "description": "light rain", "icon": "10n" } ]
                }
            ]
        })))
        .mount(&server)
        .await;

    let samples = client_for(&server)
        .forecast_by_name("kyiv")
        .await
        .expect("fetch succeeds");

    assert_eq!(samples.len(), 1);
    let sample = &samples[0];
    assert_eq!(sample.temperature_c, 12.5);
    assert_eq!(sample.condition, ConditionKind::Rain);
    assert!(!sample.is_day);
    assert_eq!(sample.timestamp.offset().local_minus_utc(), 10_800);
    assert_eq!(
        sample.timestamp.weekday(),
        chrono::Weekday::Mon,
        "weekday must follow the location's clock, not UTC"
    );
}
