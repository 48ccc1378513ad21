use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum SkycastError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Upstream request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SkycastError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            SkycastError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            SkycastError::Conflict(_) => StatusCode::CONFLICT,
            SkycastError::NotFound(_) => StatusCode::NOT_FOUND,
            SkycastError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SkycastError::Upstream(_) | SkycastError::UpstreamTransport(_) => {
                StatusCode::BAD_GATEWAY
            }
            SkycastError::Database(_) | SkycastError::Hashing(_) | SkycastError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for SkycastError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match &self {
            SkycastError::Database(_) | SkycastError::Hashing(_) | SkycastError::Config(_) => {
                error!(error = %self, "internal error");
                "An internal server error occurred.".to_string()
            }
            SkycastError::UpstreamTransport(_) => {
                error!(error = %self, "weather provider unreachable");
                "Weather provider is unavailable.".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Body of every non-2xx response.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn renders_error_body_with_taxonomy_status() {
        let resp = SkycastError::Conflict("User with username 'alice' already exists".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "User with username 'alice' already exists");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let resp = SkycastError::Database(SqlxError::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "An internal server error occurred.");
    }

    #[test]
    fn upstream_maps_to_bad_gateway() {
        assert_eq!(
            SkycastError::upstream("marine data unavailable").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            SkycastError::invalid("Location must be a non-empty string.").status(),
            StatusCode::BAD_REQUEST
        );
    }
}
