pub mod weather_api;

pub use weather_api::WeatherApiClient;
