//! Pure validators turning raw request strings into typed values.
//!
//! Every function here is side-effect free apart from a `warn!` on rejection.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::SkycastError;
use crate::types::weather::TemperatureUnit;

pub const DEFAULT_FORECAST_DAYS: u8 = 3;
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Trimmed, non-empty location string.
pub fn validate_location(raw: Option<&str>) -> Result<String, SkycastError> {
    match raw.map(str::trim) {
        Some(loc) if !loc.is_empty() => Ok(loc.to_string()),
        _ => {
            warn!(location = ?raw, "invalid location");
            Err(SkycastError::invalid("Location must be a non-empty string."))
        }
    }
}

/// Forecast day count in `1..=14`; absent or blank yields the default of 3.
pub fn validate_days(raw: Option<&str>) -> Result<u8, SkycastError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_FORECAST_DAYS);
    };
    let days = raw.parse::<i64>().map_err(|_| {
        warn!(days = %raw, "non-numeric days");
        SkycastError::invalid("Days must be an integer.")
    })?;
    if !(1..=i64::from(MAX_FORECAST_DAYS)).contains(&days) {
        warn!(days, "days out of range");
        return Err(SkycastError::invalid(format!(
            "Days must be between 1 and {MAX_FORECAST_DAYS}."
        )));
    }
    Ok(days as u8)
}

/// Optional `YYYY-MM-DD` date. Blank counts as absent.
pub fn validate_date(raw: Option<&str>) -> Result<Option<NaiveDate>, SkycastError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            warn!(date = %raw, "invalid date format");
            SkycastError::invalid("Date must be in the format 'YYYY-MM-DD'.")
        })
}

/// Both fields must be non-empty. Existence is not checked here.
pub fn validate_credentials(
    username: Option<&str>,
    password: Option<&str>,
) -> Result<(String, String), SkycastError> {
    let username = username.map(str::trim).unwrap_or_default();
    let password = password.unwrap_or_default();
    if username.is_empty() || password.is_empty() {
        warn!("missing username or password");
        return Err(SkycastError::invalid("Username and password are required."));
    }
    Ok((username.to_string(), password.to_string()))
}

/// Strictly positive integer id.
pub fn validate_id(raw: &str) -> Result<i64, SkycastError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            warn!(user_id = %raw, "invalid id");
            Err(SkycastError::invalid("User id must be a positive integer."))
        }
    }
}

/// `C`/`F` (case-insensitive); absent or blank means Celsius.
pub fn validate_unit(raw: Option<&str>) -> Result<TemperatureUnit, SkycastError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(TemperatureUnit::Celsius),
        Some(u) if u.eq_ignore_ascii_case("c") => Ok(TemperatureUnit::Celsius),
        Some(u) if u.eq_ignore_ascii_case("f") => Ok(TemperatureUnit::Fahrenheit),
        Some(u) => {
            warn!(unit = %u, "invalid temperature unit");
            Err(SkycastError::invalid(
                "Unit must be 'C' for Celsius or 'F' for Fahrenheit.",
            ))
        }
    }
}
