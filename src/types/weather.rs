use chrono::NaiveDate;
use serde::Serialize;

/// Which provider endpoint a request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherEndpoint {
    Current,
    Forecast,
    Timezone,
    Astronomy,
    Marine,
}

impl WeatherEndpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherEndpoint::Current => "current",
            WeatherEndpoint::Forecast => "forecast",
            WeatherEndpoint::Timezone => "timezone",
            WeatherEndpoint::Astronomy => "astronomy",
            WeatherEndpoint::Marine => "marine",
        }
    }

    /// Path segment on the provider, relative to the configured base URL.
    pub fn file(&self) -> &'static str {
        match self {
            WeatherEndpoint::Current => "current.json",
            WeatherEndpoint::Forecast => "forecast.json",
            WeatherEndpoint::Timezone => "timezone.json",
            WeatherEndpoint::Astronomy => "astronomy.json",
            WeatherEndpoint::Marine => "marine.json",
        }
    }
}

impl std::fmt::Display for WeatherEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Validated, per-request weather lookup. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub location: String,
    pub days: u8,
    pub date: Option<NaiveDate>,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWeather {
    pub location: String,
    pub temperature: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature: f64,
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastWeather {
    pub location: String,
    pub forecasts: Vec<DailyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimezoneInfo {
    pub location: String,
    pub timezone: String,
    pub local_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstronomyInfo {
    pub location: String,
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarineConditions {
    pub location: String,
    pub wave_height: f64,
    pub sea_temperature: f64,
}

/// Normalized response, one shape per endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherResult {
    Current(CurrentWeather),
    Forecast(ForecastWeather),
    Timezone(TimezoneInfo),
    Astronomy(AstronomyInfo),
    Marine(MarineConditions),
}
