//! Presentation values derived from [`DashboardState`] on every render.

use crate::{
    aqi::{self, HealthLevel, NormalizedAqi},
    dashboard::{DashboardState, Load},
    model::{ForecastPoint, Pollutants},
};

pub const LOADING: &str = "Loading…";
/// Placeholder for a value that is missing or failed to load.
pub const DASH: &str = "–";

#[derive(Debug, Clone, PartialEq)]
pub struct PollutantRow {
    pub label: &'static str,
    pub unit: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub city: String,
    pub condition: String,
    pub temperature: String,
    pub feels_like: String,
    pub wind: String,
    pub aqi: NormalizedAqi,
    pub health: Option<HealthLevel>,
    pub pollutants: Vec<PollutantRow>,
    pub forecast: Option<Vec<ForecastPoint>>,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let weather = state.weather();
        let placeholder = match weather {
            Load::Pending => "…",
            _ => DASH,
        };

        let (condition, temperature, feels_like, wind) = match weather.ready() {
            Some(w) => (
                w.condition.clone(),
                format!("{}°C", w.temperature_c),
                format!("{}°", w.feels_like_c),
                format!("{} m/s", w.wind_speed),
            ),
            None => (
                (if weather.is_pending() { LOADING } else { DASH }).to_string(),
                placeholder.to_string(),
                format!("{placeholder}°"),
                placeholder.to_string(),
            ),
        };

        let reading = state.reading().ready();
        let aqi = aqi::normalize_opt(reading.map(|r| r.category));
        let health = aqi
            .is_known()
            .then(|| HealthLevel::from_index(aqi.index.into()));
        let pollutants = pollutant_rows(reading.map(|r| &r.components));

        Self {
            city: state.selected_city().to_string(),
            condition,
            temperature,
            feels_like,
            wind,
            aqi,
            health,
            pollutants,
            forecast: state.forecast().ready().cloned(),
        }
    }
}

/// One decimal place, or a dash when the value is absent.
pub fn format_pollutant(value: Option<f64>) -> String {
    value.map_or_else(|| DASH.to_string(), |v| format!("{v:.1}"))
}

pub fn pollutant_rows(components: Option<&Pollutants>) -> Vec<PollutantRow> {
    let get = |f: fn(&Pollutants) -> Option<f64>| components.and_then(f);
    let row = |label, unit, value| PollutantRow {
        label,
        unit,
        value: format_pollutant(value),
    };

    vec![
        row("PM2.5", "µg/m³", get(|p| p.pm2_5)),
        row("PM10", "µg/m³", get(|p| p.pm10)),
        row("CO", "ppb", get(|p| p.co)),
        row("NO₂", "ppb", get(|p| p.no2)),
        row("O₃", "ppb", get(|p| p.o3)),
        row("SO₂", "ppb", get(|p| p.so2)),
    ]
}
