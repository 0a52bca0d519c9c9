//! Integration tests for the OpenWeather client and the dashboard using wiremock.

use std::sync::Arc;

use skyline_core::{
    Coordinates, Dashboard, FetchError, Load, OpenWeatherClient, ReverseGeocoder, WeatherSource,
    cities::MapCity, load_aqi_map,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mumbai_weather() -> serde_json::Value {
    serde_json::json!({
        "weather": [{ "main": "Clear" }],
        "main": { "temp": 30, "feels_like": 33 },
        "wind": { "speed": 10 },
        "coord": { "lat": 19.07, "lon": 72.88 }
    })
}

fn pollution(category: i64) -> serde_json::Value {
    serde_json::json!({
        "list": [{
            "main": { "aqi": category },
            "components": {
                "pm2_5": 41.27, "pm10": 60.0, "co": 310.4,
                "no2": 12.05, "o3": 48.9, "so2": 7.1
            }
        }]
    })
}

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_base_url("TEST_KEY".to_string(), server.uri())
}

#[tokio::test]
async fn fetch_weather_parses_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Mumbai"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mumbai_weather()))
        .mount(&server)
        .await;

    let weather = client(&server).fetch_weather("Mumbai").await.unwrap();

    assert_eq!(weather.condition, "Clear");
    assert_eq!(weather.temperature_c, 30.0);
    assert_eq!(weather.feels_like_c, 33.0);
    assert_eq!(weather.wind_speed, 10.0);
    assert_eq!(weather.coordinates, Coordinates::new(19.07, 72.88));
}

#[tokio::test]
async fn fetch_weather_404_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"{"cod":"404","message":"city not found"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server).fetch_weather("Atlantis").await.unwrap_err();

    assert!(err.is_status());
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn fetch_aqi_reads_category_and_components() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("lat", "19.07"))
        .and(query_param("lon", "72.88"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution(3)))
        .mount(&server)
        .await;

    let reading = client(&server)
        .fetch_aqi(Coordinates::new(19.07, 72.88))
        .await
        .unwrap();

    assert_eq!(reading.category, 3);
    assert_eq!(reading.components.pm2_5, Some(41.27));
    assert_eq!(reading.components.so2, Some(7.1));
}

#[tokio::test]
async fn fetch_aqi_empty_list_is_missing_field() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": [] })))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch_aqi(Coordinates::new(0.0, 0.0))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::MissingField { .. }));
}

#[tokio::test]
async fn forecast_takes_six_points_in_location_time() {
    let server = MockServer::start().await;

    let list: Vec<_> = (0..10)
        .map(|i| serde_json::json!({ "dt": i * 3 * 3600, "main": { "temp": 20.0 + i as f64 } }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Mumbai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": { "timezone": 19800 },
            "list": list
        })))
        .mount(&server)
        .await;

    let points = client(&server).fetch_forecast("Mumbai").await.unwrap();

    let labels: Vec<_> = points.iter().map(|p| p.time_label.as_str()).collect();
    assert_eq!(
        labels,
        ["5:30 AM", "8:30 AM", "11:30 AM", "2:30 PM", "5:30 PM", "8:30 PM"]
    );
    assert_eq!(points[5].temperature_c, 25.0);
}

#[tokio::test]
async fn reverse_geocode_empty_array_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let name = client(&server)
        .reverse_geocode(Coordinates::new(0.0, 0.0))
        .await
        .unwrap();
    assert_eq!(name, None);
}

#[tokio::test]
async fn reverse_and_direct_geocode_first_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Mumbai", "lat": 19.07, "lon": 72.88 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Chennai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Chennai", "lat": 13.08, "lon": 80.27 }
        ])))
        .mount(&server)
        .await;

    let client = client(&server);
    let name = client
        .reverse_geocode(Coordinates::new(19.07, 72.88))
        .await
        .unwrap();
    assert_eq!(name.as_deref(), Some("Mumbai"));

    let coords = client.geocode_city("Chennai").await.unwrap();
    assert_eq!(coords, Coordinates::new(13.08, 80.27));
}

#[tokio::test]
async fn aqi_map_skips_failures_and_invalid_levels() {
    let server = MockServer::start().await;

    for (lat, response) in [
        ("1", ResponseTemplate::new(200).set_body_json(pollution(1))),
        ("2", ResponseTemplate::new(500)),
        ("3", ResponseTemplate::new(200).set_body_json(pollution(0))),
        ("4", ResponseTemplate::new(200).set_body_json(pollution(4))),
    ] {
        Mock::given(method("GET"))
            .and(path("/data/2.5/air_pollution"))
            .and(query_param("lat", lat))
            .respond_with(response)
            .mount(&server)
            .await;
    }

    let cities = [
        MapCity {
            name: "One",
            coordinates: Coordinates::new(1.0, 0.0),
        },
        MapCity {
            name: "Two",
            coordinates: Coordinates::new(2.0, 0.0),
        },
        MapCity {
            name: "Three",
            coordinates: Coordinates::new(3.0, 0.0),
        },
        MapCity {
            name: "Four",
            coordinates: Coordinates::new(4.0, 0.0),
        },
    ];

    let map = load_aqi_map(&client(&server), &cities).await;

    let entries: Vec<_> = map.iter().map(|l| (l.name.as_str(), l.aqi)).collect();
    assert_eq!(entries, [("One", 50), ("Four", 200)]);
}

#[tokio::test]
async fn selecting_mumbai_renders_weather_and_aqi() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Mumbai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mumbai_weather()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution(3)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Mumbai"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": { "timezone": 19800 },
            "list": [{ "dt": 0, "main": { "temp": 28.5 } }]
        })))
        .mount(&server)
        .await;

    // Delhi is not mocked: its requests answer 404 and are stale anyway.
    let mut dashboard = Dashboard::new(Arc::new(client(&server)), "Delhi");
    dashboard.start();
    dashboard.select_city("Mumbai");
    dashboard.settle().await;

    let view = dashboard.view();
    assert_eq!(view.city, "Mumbai");
    assert_eq!(view.temperature, "30°C");
    assert_eq!(view.condition, "Clear");
    assert_eq!(view.aqi.label, "Moderate 😐");
    assert_eq!(view.pollutants[0].value, "41.3");

    let forecast = view.forecast.expect("forecast loaded");
    assert_eq!(forecast[0].time_label, "5:30 AM");
}

#[tokio::test]
async fn weather_404_keeps_aqi_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pollution(1)))
        .expect(0)
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(Arc::new(client(&server)), "Delhi");
    dashboard.start();
    dashboard.settle().await;

    assert_eq!(dashboard.state().weather(), &Load::Unavailable);
    assert!(dashboard.state().reading().is_pending());

    let view = dashboard.view();
    assert_eq!(view.temperature, "–");
    assert!(!view.aqi.is_known());
}
