use serde::{Deserialize, Serialize};

use crate::aqi::{self, NormalizedAqi};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Current conditions for one city. Replaced wholesale on every city change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub condition: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub wind_speed: f64,
    pub coordinates: Coordinates,
}

/// Pollutant concentrations. Any of them may be absent from a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiReading {
    /// Raw vendor category; validity is decided by [`aqi::normalize`].
    pub category: i64,
    pub components: Pollutants,
}

impl AqiReading {
    pub fn normalized(&self) -> NormalizedAqi {
        aqi::normalize(self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 12-hour clock label in the location's own timezone, e.g. "5:30 AM".
    pub time_label: String,
    pub temperature_c: f64,
}

/// One city on the AQI map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiLocation {
    pub name: String,
    pub coordinates: Coordinates,
    pub aqi: u16,
}
