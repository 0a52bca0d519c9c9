//! Core library for the `skyline` dashboard.
//!
//! This crate defines:
//! - AQI normalization onto a numeric index and descriptive tiers
//! - The OpenWeather client behind the `WeatherSource` abstraction
//! - City auto-detection and the multi-city AQI map
//! - The dashboard state controller and its derived view
//! - Configuration & credentials handling
//!
//! It is used by `skyline-cli`, but can also be reused by other front ends.

pub mod aqi;
pub mod aqi_map;
pub mod cities;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod view;

pub use aqi::{AqiCategory, HealthLevel, NormalizedAqi, ScaleTier, normalize};
pub use aqi_map::load_aqi_map;
pub use config::Config;
pub use dashboard::{Dashboard, DashboardState, Load};
pub use error::{FetchError, GeolocationError, InvalidAqiCategory};
pub use geolocation::{FixedPosition, GeolocationResolver, NoPosition, PositionSource};
pub use model::{AqiLocation, AqiReading, Coordinates, ForecastPoint, Pollutants, WeatherSnapshot};
pub use provider::{ReverseGeocoder, WeatherSource, openweather::OpenWeatherClient};
pub use view::DashboardView;
