use crate::{
    Config,
    error::FetchError,
    model::{AqiReading, Coordinates, ForecastPoint, WeatherSnapshot},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Source of per-city weather, air quality and forecast data.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;

    async fn fetch_aqi(&self, coordinates: Coordinates) -> Result<AqiReading, FetchError>;

    /// At most [`crate::forecast::FORECAST_POINTS`] points, chronological.
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, FetchError>;
}

/// Resolves coordinates to a place name. `Ok(None)` means "no match".
#[async_trait]
pub trait ReverseGeocoder: Send + Sync + Debug {
    async fn reverse_geocode(&self, coordinates: Coordinates)
    -> Result<Option<String>, FetchError>;
}

#[async_trait]
impl<T: WeatherSource + ?Sized> WeatherSource for Arc<T> {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        (**self).fetch_weather(city).await
    }

    async fn fetch_aqi(&self, coordinates: Coordinates) -> Result<AqiReading, FetchError> {
        (**self).fetch_aqi(coordinates).await
    }

    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, FetchError> {
        (**self).fetch_forecast(city).await
    }
}

#[async_trait]
impl<T: ReverseGeocoder + ?Sized> ReverseGeocoder for Arc<T> {
    async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Option<String>, FetchError> {
        (**self).reverse_geocode(coordinates).await
    }
}

/// Construct the OpenWeather client from config and the process environment.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key()?;
    Ok(OpenWeatherClient::new(api_key))
}
