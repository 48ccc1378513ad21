//! Reshapes provider payloads into the fixed response shapes.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SkycastError;
use crate::types::weather::{
    AstronomyInfo, CurrentWeather, DailyForecast, ForecastWeather, MarineConditions,
    TemperatureUnit, TimezoneInfo, WeatherEndpoint, WeatherQuery, WeatherResult,
};
use crate::types::weatherapi::{
    AstronomyPayload, CurrentPayload, ForecastPayload, MarinePayload, TimezonePayload,
    UpstreamPayload,
};

/// Validate `body` against the shape `endpoint` promises, then reshape it.
pub fn normalize(
    endpoint: WeatherEndpoint,
    query: &WeatherQuery,
    body: Value,
) -> Result<WeatherResult, SkycastError> {
    let payload = UpstreamPayload::parse(endpoint, body).map_err(|e| {
        warn!(%endpoint, error = %e, "unexpected provider payload");
        SkycastError::upstream(format!(
            "Weather provider returned an unexpected {endpoint} payload."
        ))
    })?;

    Ok(match payload {
        UpstreamPayload::Current(p) => WeatherResult::Current(normalize_current(p, query.unit)),
        UpstreamPayload::Forecast(p) => {
            WeatherResult::Forecast(normalize_forecast(p, query.days, query.unit)?)
        }
        UpstreamPayload::Timezone(p) => WeatherResult::Timezone(normalize_timezone(p)?),
        UpstreamPayload::Astronomy(p) => WeatherResult::Astronomy(normalize_astronomy(p)),
        UpstreamPayload::Marine(p) => WeatherResult::Marine(normalize_marine(p)?),
    })
}

pub fn normalize_current(payload: CurrentPayload, unit: TemperatureUnit) -> CurrentWeather {
    let temperature = match unit {
        TemperatureUnit::Celsius => payload.current.temp_c,
        TemperatureUnit::Fahrenheit => payload.current.temp_f,
    };
    CurrentWeather {
        location: payload.location.name,
        temperature,
        condition: payload.current.condition.text,
    }
}

/// Exactly `days` entries in date order. Extra provider days are dropped; a
/// short list is padded by carrying the last day forward onto the following
/// dates. No days at all is an upstream failure.
pub fn normalize_forecast(
    payload: ForecastPayload,
    days: u8,
    unit: TemperatureUnit,
) -> Result<ForecastWeather, SkycastError> {
    let mut forecasts = payload
        .forecast
        .forecastday
        .into_iter()
        .map(|fd| {
            let date = NaiveDate::parse_from_str(&fd.date, "%Y-%m-%d").map_err(|_| {
                SkycastError::upstream(format!(
                    "Weather provider returned an invalid forecast date '{}'.",
                    fd.date
                ))
            })?;
            let temperature = match unit {
                TemperatureUnit::Celsius => fd.day.avgtemp_c,
                TemperatureUnit::Fahrenheit => fd.day.avgtemp_f,
            };
            Ok(DailyForecast {
                date,
                temperature,
                condition: fd.day.condition.text,
            })
        })
        .collect::<Result<Vec<_>, SkycastError>>()?;

    if forecasts.is_empty() {
        return Err(SkycastError::upstream(
            "Weather provider returned no forecast days.",
        ));
    }

    forecasts.sort_by_key(|f| f.date);
    let available = forecasts.len();
    forecasts.truncate(usize::from(days));
    while forecasts.len() < usize::from(days) {
        let Some(last) = forecasts.last().cloned() else {
            break;
        };
        let Some(date) = last.date.succ_opt() else {
            break;
        };
        forecasts.push(DailyForecast { date, ..last });
    }
    debug!(available, requested = days, "forecast normalized");

    Ok(ForecastWeather {
        location: payload.location.name,
        forecasts,
    })
}

pub fn normalize_timezone(payload: TimezonePayload) -> Result<TimezoneInfo, SkycastError> {
    let loc = payload.location;
    let timezone = loc
        .tz_id
        .ok_or_else(|| SkycastError::upstream("Weather provider returned no timezone."))?;
    Ok(TimezoneInfo {
        location: loc.name,
        timezone,
        local_time: loc
            .localtime
            .ok_or_else(|| SkycastError::upstream("Weather provider returned no local time."))?,
    })
}

pub fn normalize_astronomy(payload: AstronomyPayload) -> AstronomyInfo {
    AstronomyInfo {
        location: payload.location.name,
        sunrise: payload.astronomy.astro.sunrise,
        sunset: payload.astronomy.astro.sunset,
    }
}

/// Picks the hourly reading closest to the location's local time.
pub fn normalize_marine(payload: MarinePayload) -> Result<MarineConditions, SkycastError> {
    let location = payload.location.name;
    let unavailable =
        || SkycastError::upstream(format!("Marine data unavailable for location '{location}'."));

    let hours: Vec<_> = payload
        .forecast
        .into_iter()
        .flat_map(|f| f.forecastday)
        .flat_map(|d| d.hour)
        .collect();

    let target = payload
        .location
        .localtime_epoch
        .or_else(|| hours.first().map(|h| h.time_epoch))
        .ok_or_else(unavailable)?;

    let closest = hours
        .iter()
        .min_by_key(|h| h.time_epoch.abs_diff(target))
        .ok_or_else(unavailable)?;

    match (closest.sig_ht_mt, closest.water_temp_c) {
        (Some(wave_height), Some(sea_temperature)) => Ok(MarineConditions {
            location,
            wave_height,
            sea_temperature,
        }),
        _ => Err(unavailable()),
    }
}
