use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::SkycastError;
use crate::middleware::validate::{
    validate_date, validate_days, validate_id, validate_location, validate_unit,
};
use crate::router::AppState;
use crate::types::weather::WeatherQuery;

/// `Json<T>` whose rejections render as a 400 `{"error": ...}` body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = SkycastError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(v)) => Ok(JsonBody(v)),
            Err(rejection) => {
                warn!(error = %rejection.body_text(), "rejected json body");
                Err(SkycastError::invalid(format!(
                    "Invalid request body: {}",
                    rejection.body_text()
                )))
            }
        }
    }
}

/// Query string as received, before any validation.
#[derive(Debug, Default, Deserialize)]
pub struct RawWeatherParams {
    pub location: Option<String>,
    pub user_id: Option<String>,
    pub days: Option<String>,
    pub date: Option<String>,
    pub unit: Option<String>,
}

/// Validated weather lookup. An explicit `location` always wins; `user_id`
/// is consulted only when `location` is absent from the query string.
pub struct WeatherRequest(pub WeatherQuery);

impl FromRequestParts<AppState> for WeatherRequest {
    type Rejection = SkycastError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawWeatherParams>::try_from_uri(&parts.uri)
            .map_err(|e| SkycastError::invalid(e.body_text()))?;

        let days = validate_days(raw.days.as_deref())?;
        let date = validate_date(raw.date.as_deref())?;
        let unit = validate_unit(raw.unit.as_deref())?;

        let location = match (raw.location.as_deref(), raw.user_id.as_deref()) {
            (None, Some(user_id)) => {
                let id = validate_id(user_id)?;
                let stored = state.users.get_location(id).await?;
                validate_location(Some(stored.as_str()))?
            }
            (location, _) => validate_location(location)?,
        };

        Ok(WeatherRequest(WeatherQuery {
            location,
            days,
            date,
            unit,
        }))
    }
}
