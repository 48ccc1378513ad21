//! Payload shapes returned by the weather provider, one per endpoint.
//!
//! Only the fields the normalizer reads are declared; anything else the
//! provider sends is ignored.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::weather::WeatherEndpoint;

#[derive(Debug, Deserialize)]
pub struct WaLocation {
    pub name: String,
    #[serde(default)]
    pub tz_id: Option<String>,
    #[serde(default)]
    pub localtime_epoch: Option<i64>,
    #[serde(default)]
    pub localtime: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WaCondition {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct WaCurrent {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: WaCondition,
}

#[derive(Debug, Deserialize)]
pub struct CurrentPayload {
    pub location: WaLocation,
    pub current: WaCurrent,
}

#[derive(Debug, Deserialize)]
pub struct WaDay {
    pub avgtemp_c: f64,
    pub avgtemp_f: f64,
    pub condition: WaCondition,
}

#[derive(Debug, Deserialize)]
pub struct WaForecastDay {
    pub date: String,
    pub day: WaDay,
}

#[derive(Debug, Deserialize)]
pub struct WaForecast {
    pub forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPayload {
    pub location: WaLocation,
    pub forecast: WaForecast,
}

#[derive(Debug, Deserialize)]
pub struct TimezonePayload {
    pub location: WaLocation,
}

#[derive(Debug, Deserialize)]
pub struct WaAstro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Deserialize)]
pub struct WaAstronomy {
    pub astro: WaAstro,
}

#[derive(Debug, Deserialize)]
pub struct AstronomyPayload {
    pub location: WaLocation,
    pub astronomy: WaAstronomy,
}

/// Marine fields are optional: inland locations come back without them.
#[derive(Debug, Deserialize)]
pub struct WaMarineHour {
    pub time_epoch: i64,
    #[serde(default)]
    pub sig_ht_mt: Option<f64>,
    #[serde(default)]
    pub water_temp_c: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WaMarineDay {
    #[serde(default)]
    pub hour: Vec<WaMarineHour>,
}

#[derive(Debug, Deserialize)]
pub struct WaMarineForecast {
    #[serde(default)]
    pub forecastday: Vec<WaMarineDay>,
}

#[derive(Debug, Deserialize)]
pub struct MarinePayload {
    pub location: WaLocation,
    #[serde(default)]
    pub forecast: Option<WaMarineForecast>,
}

/// Error envelope: `{"error": {"code": 1006, "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct WaErrorEnvelope {
    pub error: WaErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct WaErrorBody {
    pub message: String,
}

/// A provider response, checked against the shape its endpoint promises.
#[derive(Debug)]
pub enum UpstreamPayload {
    Current(CurrentPayload),
    Forecast(ForecastPayload),
    Timezone(TimezonePayload),
    Astronomy(AstronomyPayload),
    Marine(MarinePayload),
}

impl UpstreamPayload {
    pub fn parse(endpoint: WeatherEndpoint, body: Value) -> Result<Self, serde_json::Error> {
        Ok(match endpoint {
            WeatherEndpoint::Current => Self::Current(from_value(body)?),
            WeatherEndpoint::Forecast => Self::Forecast(from_value(body)?),
            WeatherEndpoint::Timezone => Self::Timezone(from_value(body)?),
            WeatherEndpoint::Astronomy => Self::Astronomy(from_value(body)?),
            WeatherEndpoint::Marine => Self::Marine(from_value(body)?),
        })
    }
}

fn from_value<T: DeserializeOwned>(body: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_tags_payload_by_endpoint() {
        let body = json!({
            "location": {"name": "Boston", "tz_id": "America/New_York", "localtime": "2024-12-10 9:00"}
        });
        let payload = UpstreamPayload::parse(WeatherEndpoint::Timezone, body).unwrap();
        assert!(matches!(payload, UpstreamPayload::Timezone(_)));
    }

    #[test]
    fn parse_rejects_missing_substructure() {
        let body = json!({"location": {"name": "Boston"}});
        assert!(UpstreamPayload::parse(WeatherEndpoint::Current, body).is_err());
    }

    #[test]
    fn error_envelope_decodes() {
        let env: WaErrorEnvelope = serde_json::from_value(json!({
            "error": {"code": 1006, "message": "No matching location found."}
        }))
        .unwrap();
        assert_eq!(env.error.message, "No matching location found.");
    }
}
