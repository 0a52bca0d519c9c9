//! AQI snapshot for a fixed set of cities, shown on the map.

use thiserror::Error;

use crate::{
    aqi::AqiCategory,
    cities::MapCity,
    error::{FetchError, InvalidAqiCategory},
    model::AqiLocation,
    provider::WeatherSource,
};

/// Why a city was left off the map.
#[derive(Debug, Error)]
enum SkipReason {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    InvalidCategory(#[from] InvalidAqiCategory),
}

/// Fetch AQI for each city one after another, in the given order.
///
/// Cities whose fetch fails or whose category is outside 1..=5 are dropped;
/// the remaining entries keep their relative order.
pub async fn load_aqi_map<S>(source: &S, cities: &[MapCity]) -> Vec<AqiLocation>
where
    S: WeatherSource + ?Sized,
{
    let mut locations = Vec::with_capacity(cities.len());

    for city in cities {
        match fetch_location(source, city).await {
            Ok(location) => locations.push(location),
            Err(SkipReason::Fetch(err)) => {
                tracing::error!(city = city.name, error = %err, "Failed to fetch AQI");
            }
            Err(SkipReason::InvalidCategory(err)) => {
                tracing::warn!(city = city.name, category = err.0, "Invalid AQI level");
            }
        }
    }

    tracing::debug!(
        fetched = locations.len(),
        requested = cities.len(),
        "Loaded AQI map"
    );
    locations
}

async fn fetch_location<S>(source: &S, city: &MapCity) -> Result<AqiLocation, SkipReason>
where
    S: WeatherSource + ?Sized,
{
    let reading = source.fetch_aqi(city.coordinates).await?;
    let category = AqiCategory::try_from(reading.category)?;

    Ok(AqiLocation {
        name: city.name.to_string(),
        coordinates: city.coordinates,
        aqi: category.map_index(),
    })
}
