use crate::error::{RenderError, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a timestamp-like display value: `now`, `today`, a numeric epoch
/// value (fractional seconds allowed), or an ISO-8601 timestamp.
///
/// Anything else errors; a value that reaches the views in an unrecognized
/// shape is a data bug, not an environmental condition.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Local>> {
    if value == "now" {
        return Ok(Local::now());
    }
    if value == "today" {
        if let Some(midnight) = Local::now().date_naive().and_hms_opt(0, 0, 0) {
            if let Some(dt) = Local.from_local_datetime(&midnight).earliest() {
                return Ok(dt);
            }
        }
    }
    if let Ok(epoch) = value.parse::<f64>() {
        let secs = epoch.trunc() as i64;
        let nanos = (epoch.fract().abs() * 1e9) as u32;
        if let Some(dt) = Local.timestamp_opt(secs, nanos).earliest() {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Local));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
            if let Some(dt) = Local.from_local_datetime(&naive).earliest() {
                return Ok(dt);
            }
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            if let Some(dt) = Local.from_local_datetime(&midnight).earliest() {
                return Ok(dt);
            }
        }
    }
    Err(RenderError::InvalidTimestamp {
        value: value.to_string(),
    }
    .into())
}

/// Format a timestamp-like value for display. `iso8601` and `rfc3339`
/// render an ISO-8601 string, `http` an RFC 7231 HTTP-date; any other
/// selector is treated as a strftime pattern.
pub fn strftime(value: &str, format: &str) -> Result<String> {
    let dt = parse_timestamp(value)?;
    Ok(match format {
        "iso8601" | "rfc3339" => dt.to_rfc3339(),
        "http" => dt
            .with_timezone(&Utc)
            .format("%a, %d %b %Y %H:%M:%S GMT")
            .to_string(),
        pattern => dt.format(pattern).to_string(),
    })
}
