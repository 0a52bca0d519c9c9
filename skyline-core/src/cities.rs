use crate::model::Coordinates;

/// Cities offered in the selector and accepted from auto-detection.
pub const SUPPORTED_CITIES: &[&str] = &[
    "Delhi",
    "Mumbai",
    "Bengaluru",
    "Kolkata",
    "Chennai",
    "Meerut",
    "Ghaziabad",
    "Noida",
    "Jhansi",
    "Islamabad",
];

pub const DEFAULT_CITY: &str = "Delhi";

pub fn is_supported(city: &str) -> bool {
    SUPPORTED_CITIES.contains(&city)
}

/// Case-insensitive lookup returning the canonical spelling.
pub fn canonical(city: &str) -> Option<&'static str> {
    let city = city.trim();
    SUPPORTED_CITIES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(city))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCity {
    pub name: &'static str,
    pub coordinates: Coordinates,
}

const fn map_city(name: &'static str, lat: f64, lon: f64) -> MapCity {
    MapCity {
        name,
        coordinates: Coordinates::new(lat, lon),
    }
}

/// Fixed set plotted on the AQI map, fetched in this order.
pub const MAP_CITIES: &[MapCity] = &[
    map_city("Moradabad", 28.83, 78.77),
    map_city("Delhi", 28.61, 77.23),
    map_city("Lucknow", 26.84, 80.94),
    map_city("Kanpur", 26.45, 80.34),
    map_city("Mumbai", 19.076, 72.8777),
    map_city("Bangalore", 12.9716, 77.5946),
    map_city("Chennai", 13.0827, 80.2707),
    map_city("Kolkata", 22.5726, 88.3639),
    map_city("Hyderabad", 17.385, 78.4867),
    map_city("Pune", 18.5204, 73.8567),
    map_city("Jaipur", 26.9124, 75.7873),
];
