use chrono::{DateTime, FixedOffset, Utc};

/// Number of forecast points shown on the chart.
pub const FORECAST_POINTS: usize = 6;

/// Format a unix timestamp as a 12-hour label in the location's timezone.
///
/// `utc_offset_secs` is the provider's `city.timezone` field. The host's local
/// offset is never consulted. Returns `None` for out-of-range inputs.
pub fn local_time_label(dt: i64, utc_offset_secs: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(utc_offset_secs)?;
    let utc = DateTime::<Utc>::from_timestamp(dt, 0)?;
    Some(utc.with_timezone(&offset).format("%-I:%M %p").to_string())
}
