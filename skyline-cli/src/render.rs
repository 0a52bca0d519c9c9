use std::fmt::Display;

use skyline_core::{
    AqiLocation, HealthLevel, NormalizedAqi, ScaleTier,
    view::{DashboardView, PollutantRow},
};

/// Append one line of output.
fn line(out: &mut String, text: impl Display) {
    out.push_str(&text.to_string());
    out.push('\n');
}

pub fn dashboard(view: &DashboardView) -> String {
    let mut out = String::new();
    let today = chrono::Local::now().format("%A, %-d %b %Y");

    line(&mut out, format_args!("📍 {}", view.city));
    line(&mut out, &view.condition);
    line(&mut out, format_args!("{}  ({today})", view.temperature));
    line(&mut out, "");
    line(&mut out, "Air Conditions");
    line(&mut out, format_args!("  Real Feel  {}", view.feels_like));
    line(&mut out, format_args!("  Wind       {}", view.wind));
    line(&mut out, format_args!("  AQI        {}", view.aqi.label));

    if let Some(health) = view.health {
        line(&mut out, "");
        line(
            &mut out,
            format_args!("Air Quality Index {} ({})", view.aqi.index, health.label()),
        );
        line(&mut out, format_args!("  {}", health.description()));
    }
    out.push_str(&pollutant_table(&view.pollutants));

    line(&mut out, "");
    line(&mut out, "Forecast");
    match &view.forecast {
        Some(points) if !points.is_empty() => {
            for p in points {
                line(
                    &mut out,
                    format_args!("  {:>8}  {}°C", p.time_label, p.temperature_c),
                );
            }
        }
        Some(_) => line(&mut out, "  –"),
        None => line(&mut out, "  Loading…"),
    }
    out
}

pub fn pollutants(
    city: &str,
    aqi: &NormalizedAqi,
    health: Option<HealthLevel>,
    rows: &[PollutantRow],
) -> String {
    let mut out = String::new();
    line(&mut out, format_args!("Major Air Pollutants: {city}"));
    match health {
        Some(level) => {
            line(
                &mut out,
                format_args!("Air Quality Index (AQI) {} - {}", aqi.index, level.label()),
            );
            line(&mut out, format_args!("  {}", level.description()));
        }
        None => line(&mut out, "Air Quality Index (AQI) …"),
    }
    out.push_str(&pollutant_table(rows));
    out
}

fn pollutant_table(rows: &[PollutantRow]) -> String {
    let mut out = String::new();
    for row in rows {
        line(
            &mut out,
            format_args!("  {:<6} {:>8} {}", row.label, row.value, row.unit),
        );
    }
    out
}

pub fn aqi_map(locations: &[AqiLocation]) -> String {
    if locations.is_empty() {
        return "No AQI data available.\n".to_string();
    }

    let mut out = String::new();
    for loc in locations {
        let tier = ScaleTier::from_index(loc.aqi.into());
        line(
            &mut out,
            format_args!(
                "{:<10} ({:>7.3}, {:>7.3})  AQI: {:>3} ({}, {})",
                loc.name,
                loc.coordinates.lat,
                loc.coordinates.lon,
                loc.aqi,
                tier.label(),
                tier.color()
            ),
        );
    }
    out
}
