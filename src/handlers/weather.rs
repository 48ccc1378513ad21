use axum::{Json, extract::State};

use crate::error::SkycastError;
use crate::middleware::WeatherRequest;
use crate::router::AppState;
use crate::service::normalize;
use crate::types::weather::{WeatherEndpoint, WeatherResult};

async fn lookup(
    state: &AppState,
    endpoint: WeatherEndpoint,
    WeatherRequest(query): WeatherRequest,
) -> Result<Json<WeatherResult>, SkycastError> {
    let body = state.weather.fetch(endpoint, &query).await?;
    Ok(Json(normalize(endpoint, &query, body)?))
}

/// GET /api/weather/current
pub async fn current(
    State(state): State<AppState>,
    req: WeatherRequest,
) -> Result<Json<WeatherResult>, SkycastError> {
    lookup(&state, WeatherEndpoint::Current, req).await
}

/// GET /api/weather/forecast
pub async fn forecast(
    State(state): State<AppState>,
    req: WeatherRequest,
) -> Result<Json<WeatherResult>, SkycastError> {
    lookup(&state, WeatherEndpoint::Forecast, req).await
}

/// GET /api/weather/timezone
pub async fn timezone(
    State(state): State<AppState>,
    req: WeatherRequest,
) -> Result<Json<WeatherResult>, SkycastError> {
    lookup(&state, WeatherEndpoint::Timezone, req).await
}

/// GET /api/weather/astronomy
pub async fn astronomy(
    State(state): State<AppState>,
    req: WeatherRequest,
) -> Result<Json<WeatherResult>, SkycastError> {
    lookup(&state, WeatherEndpoint::Astronomy, req).await
}

/// GET /api/weather/marine
pub async fn marine(
    State(state): State<AppState>,
    req: WeatherRequest,
) -> Result<Json<WeatherResult>, SkycastError> {
    lookup(&state, WeatherEndpoint::Marine, req).await
}
