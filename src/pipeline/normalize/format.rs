//! Display formatting for weather readings

use chrono::{DateTime, Duration, Utc};

use crate::common::constants::PLACEHOLDER;

/// Western Indonesia Time, UTC+7
const WIB_OFFSET_HOURS: i64 = 7;

/// Round to an integer and append `suffix`; absent or non-finite readings
/// become the placeholder dash.
pub fn rounded(value: Option<f64>, suffix: &str) -> String {
    match value.filter(|v| v.is_finite()) {
        // `as` saturates, and turns -0.0 into 0
        Some(v) => format!("{}{}", v.round() as i64, suffix),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn temperature(value: Option<f64>) -> String {
    rounded(value, "°C")
}

pub fn humidity(value: Option<f64>) -> String {
    rounded(value, "%")
}

pub fn pressure(value: Option<f64>) -> String {
    rounded(value, " hPa")
}

pub fn wind_speed(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.1} m/s", v),
        None => PLACEHOLDER.to_string(),
    }
}

/// Provider observation time (Unix seconds), or `now` when absent or zero
pub fn observation_time(dt: Option<i64>, now: DateTime<Utc>) -> DateTime<Utc> {
    dt.filter(|&secs| secs != 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(now)
}

/// Indonesian locale date-time in WIB, e.g. `18/10/2026, 14.05.09`
pub fn local_timestamp(at: DateTime<Utc>) -> String {
    (at + Duration::hours(WIB_OFFSET_HOURS))
        .format("%-d/%-m/%Y, %H.%M.%S")
        .to_string()
}
