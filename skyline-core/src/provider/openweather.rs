use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::FetchError,
    forecast::{FORECAST_POINTS, local_time_label},
    model::{AqiReading, Coordinates, ForecastPoint, Pollutants, WeatherSnapshot},
};

use super::{ReverseGeocoder, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(endpoint, %url, "OpenWeather request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Request { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse { endpoint, source })
    }

    /// Direct geocoding: first match for a city name.
    pub async fn geocode_city(&self, city: &str) -> Result<Coordinates, FetchError> {
        let places: Vec<OwGeoPlace> = self
            .get_json(
                "geocode",
                "/geo/1.0/direct",
                &[("q", city.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        places
            .first()
            .map(|p| Coordinates::new(p.lat, p.lon))
            .ok_or(FetchError::MissingField {
                endpoint: "geocode",
                field: "[0]",
            })
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    weather: Vec<OwWeather>,
    main: OwMain,
    wind: OwWind,
    coord: OwCoord,
}

#[derive(Debug, Deserialize)]
struct OwAqiIndex {
    aqi: i64,
}

#[derive(Debug, Default, Deserialize)]
struct OwComponents {
    pm2_5: Option<f64>,
    pm10: Option<f64>,
    co: Option<f64>,
    no2: Option<f64>,
    o3: Option<f64>,
    so2: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwPollutionEntry {
    main: OwAqiIndex,
    #[serde(default)]
    components: OwComponents,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    list: Vec<OwPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastCity {
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwForecastCity,
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoPlace {
    name: Option<String>,
    lat: f64,
    lon: f64,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "weather",
                "/data/2.5/weather",
                &[("q", city.to_string()), ("units", "metric".to_string())],
            )
            .await?;

        let condition = parsed
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(WeatherSnapshot {
            condition,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            wind_speed: parsed.wind.speed,
            coordinates: Coordinates::new(parsed.coord.lat, parsed.coord.lon),
        })
    }

    async fn fetch_aqi(&self, coordinates: Coordinates) -> Result<AqiReading, FetchError> {
        let parsed: OwPollutionResponse = self
            .get_json(
                "air_pollution",
                "/data/2.5/air_pollution",
                &[
                    ("lat", coordinates.lat.to_string()),
                    ("lon", coordinates.lon.to_string()),
                ],
            )
            .await?;

        let entry = parsed
            .list
            .into_iter()
            .next()
            .ok_or(FetchError::MissingField {
                endpoint: "air_pollution",
                field: "list[0]",
            })?;

        let c = entry.components;
        Ok(AqiReading {
            category: entry.main.aqi,
            components: Pollutants {
                pm2_5: c.pm2_5,
                pm10: c.pm10,
                co: c.co,
                no2: c.no2,
                o3: c.o3,
                so2: c.so2,
            },
        })
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, FetchError> {
        let parsed: OwForecastResponse = self
            .get_json(
                "forecast",
                "/data/2.5/forecast",
                &[("q", city.to_string()), ("units", "metric".to_string())],
            )
            .await?;

        let offset = parsed.city.timezone;
        parsed
            .list
            .iter()
            .take(FORECAST_POINTS)
            .map(|entry| {
                local_time_label(entry.dt, offset)
                    .map(|time_label| ForecastPoint {
                        time_label,
                        temperature_c: entry.main.temp,
                    })
                    .ok_or(FetchError::MissingField {
                        endpoint: "forecast",
                        field: "valid dt/city.timezone",
                    })
            })
            .collect()
    }
}

#[async_trait]
impl ReverseGeocoder for OpenWeatherClient {
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<String>, FetchError> {
        let places: Vec<OwGeoPlace> = self
            .get_json(
                "reverse_geocode",
                "/geo/1.0/reverse",
                &[
                    ("lat", coordinates.lat.to_string()),
                    ("lon", coordinates.lon.to_string()),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(places.into_iter().next().and_then(|p| p.name))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenWeatherClient::with_base_url("KEY".into(), "http://localhost:1234/");
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn pollution_components_may_be_missing() {
        let parsed: OwPollutionResponse =
            serde_json::from_str(r#"{"list":[{"main":{"aqi":2}}]}"#).expect("valid json");
        assert_eq!(parsed.list[0].main.aqi, 2);
        assert!(parsed.list[0].components.pm2_5.is_none());
    }
}
