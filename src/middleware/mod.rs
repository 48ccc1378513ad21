pub mod request;
pub mod validate;

pub use request::{JsonBody, WeatherRequest};
